//! SOAP note form and intake autofill.

use crate::checkbox::CheckboxGroup;
use crate::constants::{MAX_NOTE_LEN, SOAP_ACTIVITY_LEVELS};
use crate::dates::{age_on, parse_wire_date, parse_ymd};
use crate::error::{FormError, FormResult};
use crate::form::{AssembleContext, FormDefinition};
use crate::form_state::FormState;
use crate::normalize::text_field;
use crate::records::IntakeRecord;
use crate::validation::{parse_id, ValidationErrors, Validator};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

pub mod fields {
    pub const PATIENT_ID: &str = "patientId";
    pub const THERAPIST_ID: &str = "therapistId";
    pub const DATE_OF_SESSION: &str = "dateOfSession";
    pub const TIME_OF_SESSION: &str = "timeOfSession";
    pub const SESSION_LENGTH: &str = "sessionLength";
    pub const TYPE_OF_SESSION: &str = "typeOfSession";
    pub const AGE: &str = "age";
    pub const ACTIVITY_LEVEL: &str = "activityLevel";
    pub const CONDITIONS: &str = "conditions";
    pub const MEDICATIONS: &str = "medications";
    pub const GOALS: &str = "goals";
    pub const DIET: &str = "diet";
    pub const HISTORY_OF_CONDITIONS: &str = "historyOfConditions";
    pub const QUICK_NOTES: &str = "quickNotes";
    pub const ACTIVE_STATUS: &str = "activeStatus";
    pub const SUBJECTIVE: &str = "subjective";
    pub const OBJECTIVE: &str = "objective";
    pub const ASSESSMENT: &str = "assessment";
    pub const PLAN: &str = "plan";
}

use fields::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoapNotePayload {
    pub patient_id: u64,
    pub therapist_id: u64,
    pub date_of_session: NaiveDate,
    /// `HH:MM`
    pub time_of_session: String,
    pub session_length: String,
    pub type_of_session: String,
    pub conditions: String,
    pub medications: String,
    pub goals: String,
    pub diet: String,
    pub activity_level: String,
    pub history_of_conditions: String,
    pub quick_notes: String,
    pub age: u32,
    pub active_status: bool,
    pub snotes: String,
    pub onotes: String,
    pub anotes: String,
    pub pnotes: String,
}

#[derive(Clone, Debug, Default)]
pub struct SoapForm;

impl SoapForm {
    pub fn new() -> Self {
        Self
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

impl FormDefinition for SoapForm {
    type Payload = SoapNotePayload;

    const ENDPOINT: &'static str = "/soap-notes";
    const NAME: &'static str = "soap note";

    fn groups(&self) -> &[CheckboxGroup] {
        &[]
    }

    fn validate(&self, state: &FormState, ctx: &AssembleContext) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(state);
        v.selected_id(PATIENT_ID, "Please pick a patient from the list.")
            .required(DATE_OF_SESSION, "Date of session is required")
            .date(DATE_OF_SESSION)
            .required(TIME_OF_SESSION, "Time of session is required")
            .integer_in_range(AGE, 0, 150, "Age must be 0 or more")
            .one_of(ACTIVITY_LEVEL, SOAP_ACTIVITY_LEVELS, "Pick High, Medium or Low")
            .max_len(QUICK_NOTES, MAX_NOTE_LEN);

        if parse_id(state, THERAPIST_ID).or(ctx.therapist_id).is_none() {
            v.push(THERAPIST_ID, "Therapist is required");
        }
        if let Some(time) = state.text_trimmed(TIME_OF_SESSION) {
            if parse_time(time).is_none() {
                v.push(TIME_OF_SESSION, "Use a HH:MM time");
            }
        }
        v.finish()
    }

    fn build(&self, state: &FormState, ctx: &AssembleContext) -> FormResult<SoapNotePayload> {
        let patient_id = parse_id(state, PATIENT_ID)
            .ok_or_else(|| FormError::InvalidInput("patient is required".into()))?;
        let therapist_id = parse_id(state, THERAPIST_ID)
            .or(ctx.therapist_id)
            .ok_or_else(|| FormError::InvalidInput("therapist is required".into()))?;
        let date_of_session = parse_ymd(state.text_trimmed(DATE_OF_SESSION).unwrap_or_default())?;
        let time_of_session = state
            .text_trimmed(TIME_OF_SESSION)
            .and_then(parse_time)
            .map(|t| t.format("%H:%M").to_string())
            .ok_or_else(|| FormError::InvalidInput("time of session is required".into()))?;

        Ok(SoapNotePayload {
            patient_id,
            therapist_id,
            date_of_session,
            time_of_session,
            session_length: text_field(state, SESSION_LENGTH),
            type_of_session: text_field(state, TYPE_OF_SESSION),
            conditions: text_field(state, CONDITIONS),
            medications: text_field(state, MEDICATIONS),
            goals: text_field(state, GOALS),
            diet: text_field(state, DIET),
            activity_level: text_field(state, ACTIVITY_LEVEL),
            history_of_conditions: text_field(state, HISTORY_OF_CONDITIONS),
            quick_notes: text_field(state, QUICK_NOTES),
            age: state
                .text_trimmed(AGE)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            active_status: state.text_trimmed(ACTIVE_STATUS) != Some("false"),
            snotes: text_field(state, SUBJECTIVE),
            onotes: text_field(state, OBJECTIVE),
            anotes: text_field(state, ASSESSMENT),
            pnotes: text_field(state, PLAN),
        })
    }
}

/// Values copied into a SOAP note from the patient's intake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoapAutofill {
    /// Patient the intake was fetched for.
    pub patient_id: u64,
    pub age: Option<u32>,
    pub activity_level: Option<String>,
    pub medications: String,
    pub goals: String,
    pub history_of_conditions: String,
}

impl SoapAutofill {
    pub fn from_intake(patient_id: u64, intake: &IntakeRecord, today: NaiveDate) -> Self {
        let age = intake
            .patient
            .as_ref()
            .and_then(|p| p.date_of_birth.as_deref())
            .and_then(|dob| parse_wire_date(dob).ok())
            .and_then(|dob| age_on(dob, today).ok());

        // Intake levels use a different scale; only carry over values the SOAP form offers.
        let activity_level = intake
            .activity_level
            .as_deref()
            .map(|level| level.trim().to_ascii_uppercase())
            .filter(|level| SOAP_ACTIVITY_LEVELS.contains(&level.as_str()));

        let history = intake.health_history.clone().unwrap_or_default();

        Self {
            patient_id,
            age,
            activity_level,
            medications: history.medications_list.unwrap_or_default(),
            goals: intake.yoga_goals.join(", "),
            history_of_conditions: history.additional_notes.unwrap_or_default(),
        }
    }

    /// Writes the autofill into `state`.
    ///
    /// Returns `false` and leaves `state` untouched when the form's selected patient is no longer
    /// the one this autofill was fetched for.
    pub fn apply(&self, state: &mut FormState) -> bool {
        if parse_id(state, PATIENT_ID) != Some(self.patient_id) {
            tracing::debug!(patient_id = self.patient_id, "discarding stale autofill");
            return false;
        }
        match self.age {
            Some(age) => state.set_text(AGE, age.to_string()),
            None => state.clear_text(AGE),
        }
        match &self.activity_level {
            Some(level) => state.set_text(ACTIVITY_LEVEL, level.as_str()),
            None => state.clear_text(ACTIVITY_LEVEL),
        }
        state.set_text(MEDICATIONS, self.medications.as_str());
        state.set_text(GOALS, self.goals.as_str());
        state.set_text(HISTORY_OF_CONDITIONS, self.history_of_conditions.as_str());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{IntakeHealthHistory, IntakePatient};

    fn ctx() -> AssembleContext {
        AssembleContext::new(parse_ymd("2025-06-14").unwrap())
    }

    fn filled() -> FormState {
        let mut state = SoapForm::new().mount();
        state.set_text(PATIENT_ID, "12");
        state.set_text(THERAPIST_ID, "3");
        state.set_text(DATE_OF_SESSION, "2025-06-10");
        state.set_text(TIME_OF_SESSION, "09:30");
        state.set_text(SUBJECTIVE, "Tight shoulders");
        state
    }

    fn intake(dob: &str) -> IntakeRecord {
        IntakeRecord {
            patient: Some(IntakePatient {
                id: Some(12),
                first_name: "Sarah".into(),
                last_name: "Williams".into(),
                date_of_birth: Some(dob.into()),
            }),
            activity_level: Some("Medium".into()),
            yoga_goals: vec!["Improve fitness".into(), "Other".into()],
            health_history: Some(IntakeHealthHistory {
                medications_list: Some("Ibuprofen".into()),
                additional_notes: Some("Knee surgery 2019".into()),
                other_conditions_explanation: None,
            }),
            ..IntakeRecord::default()
        }
    }

    #[test]
    fn assembles_soap_sections() {
        let payload = SoapForm::new().assemble(&filled(), &ctx()).unwrap();
        assert_eq!(payload.patient_id, 12);
        assert_eq!(payload.therapist_id, 3);
        assert_eq!(payload.time_of_session, "09:30");
        assert_eq!(payload.snotes, "Tight shoulders");
        assert_eq!(payload.pnotes, "");
        assert_eq!(payload.age, 0);
        assert!(payload.active_status);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["dateOfSession"], "2025-06-10");
        assert_eq!(value["historyOfConditions"], "");
    }

    #[test]
    fn therapist_falls_back_to_session() {
        let mut state = filled();
        state.clear_text(THERAPIST_ID);
        assert!(SoapForm::new().assemble(&state, &ctx()).is_err());

        let payload = SoapForm::new()
            .assemble(&state, &ctx().with_therapist(Some(9)))
            .unwrap();
        assert_eq!(payload.therapist_id, 9);
    }

    #[test]
    fn missing_patient_is_rejected() {
        let mut state = filled();
        state.set_text(PATIENT_ID, "");
        let errors = SoapForm::new().validate(&state, &ctx()).unwrap_err();
        assert_eq!(
            errors.message_for(PATIENT_ID),
            Some("Please pick a patient from the list.")
        );
    }

    #[test]
    fn autofill_uses_calendar_age() {
        let today = parse_ymd("2025-06-14").unwrap();
        let fill = SoapAutofill::from_intake(12, &intake("2000-06-15"), today);
        assert_eq!(fill.age, Some(24));
        assert_eq!(fill.activity_level.as_deref(), Some("MEDIUM"));
        assert_eq!(fill.goals, "Improve fitness, Other");

        let next_day = parse_ymd("2025-06-15").unwrap();
        let fill = SoapAutofill::from_intake(12, &intake("2000-06-15T00:00:00Z"), next_day);
        assert_eq!(fill.age, Some(25));
    }

    #[test]
    fn stale_autofill_is_discarded() {
        let today = parse_ymd("2025-06-14").unwrap();
        let fill = SoapAutofill::from_intake(12, &intake("2000-06-15"), today);

        let mut state = filled();
        state.set_text(PATIENT_ID, "13");
        assert!(!fill.apply(&mut state));
        assert_eq!(state.text(MEDICATIONS), None);

        state.set_text(PATIENT_ID, "12");
        assert!(fill.apply(&mut state));
        assert_eq!(state.text(AGE), Some("24"));
        assert_eq!(state.text(MEDICATIONS), Some("Ibuprofen"));
        assert_eq!(state.text(HISTORY_OF_CONDITIONS), Some("Knee surgery 2019"));
    }

    #[test]
    fn unknown_intake_activity_level_is_not_copied() {
        let today = parse_ymd("2025-06-14").unwrap();
        let mut record = intake("2000-06-15");
        record.activity_level = Some("Somewhat active".into());
        let fill = SoapAutofill::from_intake(12, &record, today);
        assert_eq!(fill.activity_level, None);
    }
}
