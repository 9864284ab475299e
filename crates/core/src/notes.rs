//! Unified notes feed and patient search.

use crate::dates::parse_wire_date;
use crate::records::PatientSummary;
use chrono::NaiveDate;
use serde_json::Value;
use std::cmp::Reverse;

const DATE_FIELDS: [&str; 6] = [
    "dateSubmitted",
    "date",
    "intakeDate",
    "createdAt",
    "updatedAt",
    "submittedAt",
];

const PATIENT_FIELDS: [&str; 3] = ["patient", "client", "patientDto"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Soap,
    SelfAssessment,
    Intake,
}

impl NoteKind {
    pub const ALL: [NoteKind; 3] = [NoteKind::Soap, NoteKind::SelfAssessment, NoteKind::Intake];

    pub fn label(self) -> &'static str {
        match self {
            NoteKind::Soap => "SOAP Note",
            NoteKind::SelfAssessment => "Self Assessment",
            NoteKind::Intake => "Intake Form",
        }
    }

    /// Collection path listing this kind.
    pub fn endpoint(self) -> &'static str {
        match self {
            NoteKind::Soap => "/soap-notes",
            NoteKind::SelfAssessment => "/self-assessments",
            NoteKind::Intake => "/intakes",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: Option<u64>,
    pub kind: NoteKind,
    pub patient_name: String,
    pub date: Option<NaiveDate>,
}

impl NoteSummary {
    pub fn from_row(kind: NoteKind, row: &Value) -> Self {
        let patient = PATIENT_FIELDS
            .iter()
            .find_map(|f| row.get(*f).filter(|v| v.is_object()));
        let name_part = |field: &str| {
            patient
                .and_then(|p| p.get(field))
                .and_then(Value::as_str)
                .unwrap_or_default()
        };
        let patient_name = format!("{} {}", name_part("firstName"), name_part("lastName"))
            .trim()
            .to_string();

        let date = DATE_FIELDS
            .iter()
            .find_map(|f| row.get(*f).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .and_then(|s| parse_wire_date(s).ok());

        Self {
            id: row.get("id").and_then(Value::as_u64),
            kind,
            patient_name: if patient_name.is_empty() {
                "Unknown patient".to_string()
            } else {
                patient_name
            },
            date,
        }
    }

    pub fn from_rows(kind: NoteKind, rows: &[Value]) -> Vec<Self> {
        rows.iter().map(|row| Self::from_row(kind, row)).collect()
    }
}

/// Concatenates the feeds and sorts newest first; undated notes go last.
pub fn merge_newest_first(feeds: impl IntoIterator<Item = Vec<NoteSummary>>) -> Vec<NoteSummary> {
    let mut all: Vec<NoteSummary> = feeds.into_iter().flatten().collect();
    all.sort_by_key(|n| (n.date.is_none(), Reverse(n.date)));
    all
}

/// Notes whose patient name or kind label contains `query`, limited to `kinds` (empty = all).
pub fn filter_notes<'a>(
    notes: &'a [NoteSummary],
    query: &str,
    kinds: &[NoteKind],
) -> Vec<&'a NoteSummary> {
    let q = query.trim().to_lowercase();
    notes
        .iter()
        .filter(|n| kinds.is_empty() || kinds.contains(&n.kind))
        .filter(|n| {
            n.patient_name.to_lowercase().contains(&q) || n.kind.label().to_lowercase().contains(&q)
        })
        .collect()
}

/// Case-insensitive substring match on `"first last"`.
pub fn search_patients<'a>(patients: &'a [PatientSummary], query: &str) -> Vec<&'a PatientSummary> {
    let q = query.trim().to_lowercase();
    patients
        .iter()
        .filter(|p| p.full_name().to_lowercase().contains(&q))
        .collect()
}
