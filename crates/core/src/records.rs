//! Records returned by the backend.
//!
//! Deserialisation is lenient: fields the backend may omit or send as `null` default rather than
//! failing the whole response.

use crate::session::Role;
use serde::{Deserialize, Deserializer, Serialize};

/// Spring-style page envelope.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

impl<T> Page<T> {
    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientSummary {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub cell_phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl PatientSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Entry of `GET /therapists/active`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TherapistOption {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TherapistRecord {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
    pub active_status: bool,
}

impl TherapistRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// `GET /auth/me`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Reply body for updates and deletes.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SimpleResponse {
    pub message: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakePatient {
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeHealthHistory {
    pub medications_list: Option<String>,
    pub additional_notes: Option<String>,
    pub other_conditions_explanation: Option<String>,
}

/// `GET /intakes/{id}` and `GET /intakes/patient/{id}`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeRecord {
    pub id: Option<u64>,
    pub patient: Option<IntakePatient>,
    pub intake_date: Option<String>,
    pub activity_level: Option<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub yoga_goals: Vec<String>,
    pub health_history: Option<IntakeHealthHistory>,
}

/// Older intakes stored goals as one comma-joined string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Goals {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Goals>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Goals::List(list)) => list,
        Some(Goals::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_tolerates_missing_metadata() {
        let page: Page<PatientSummary> =
            serde_json::from_str(r#"{"content":[{"id":7,"firstName":"Ann","lastName":"Lee"}]}"#)
                .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].full_name(), "Ann Lee");
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn intake_goals_accept_string_or_list() {
        let listed: IntakeRecord =
            serde_json::from_str(r#"{"yogaGoals":["Improve fitness","Other"]}"#).unwrap();
        assert_eq!(listed.yoga_goals, vec!["Improve fitness", "Other"]);

        let joined: IntakeRecord =
            serde_json::from_str(r#"{"yogaGoals":"Improve fitness, Other"}"#).unwrap();
        assert_eq!(joined.yoga_goals, vec!["Improve fitness", "Other"]);

        let null: IntakeRecord = serde_json::from_str(r#"{"yogaGoals":null}"#).unwrap();
        assert!(null.yoga_goals.is_empty());
    }

    #[test]
    fn login_response_uses_wire_roles() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"token":"abc","role":"SENIOR"}"#).unwrap();
        assert_eq!(resp.role, Role::Senior);
    }
}
