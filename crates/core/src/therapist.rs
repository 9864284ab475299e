//! Therapist account edits and registration.

use crate::checkbox::CheckboxGroup;
use crate::constants::MAX_NAME_LEN;
use crate::error::{FormError, FormResult};
use crate::form::{AssembleContext, FormDefinition};
use crate::form_state::FormState;
use crate::normalize::text_field;
use crate::records::TherapistRecord;
use crate::session::Role;
use crate::validation::{ValidationErrors, Validator};
use serde::Serialize;

/// Body of `PUT /therapists/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapistUpdatePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Editable copy of a therapist record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TherapistEdit {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Blank keeps the current password.
    pub password: String,
    pub role: Role,
}

impl TherapistEdit {
    pub fn from_record(record: &TherapistRecord) -> Self {
        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone().unwrap_or_default(),
            phone_number: record.phone_number.clone().unwrap_or_default(),
            password: String::new(),
            role: record.role.unwrap_or_default(),
        }
    }

    /// Update body as sent by `editor`.
    ///
    /// A blank password is left out, and so is the role unless the editor is an admin.
    pub fn payload(&self, editor: Option<Role>) -> TherapistUpdatePayload {
        TherapistUpdatePayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            role: (editor == Some(Role::Admin)).then_some(self.role),
        }
    }
}

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

pub mod fields {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
}

use fields::*;

/// Admin-only account creation.
#[derive(Clone, Debug, Default)]
pub struct RegisterForm;

impl FormDefinition for RegisterForm {
    type Payload = RegisterPayload;

    const ENDPOINT: &'static str = "/auth/register";
    const NAME: &'static str = "therapist registration";

    fn groups(&self) -> &[CheckboxGroup] {
        &[]
    }

    fn validate(&self, state: &FormState, _ctx: &AssembleContext) -> Result<(), ValidationErrors> {
        let mut v = Validator::new(state);
        v.required(USERNAME, "Username is required")
            .required(PASSWORD, "Password is required")
            .max_len(FIRST_NAME, MAX_NAME_LEN)
            .max_len(LAST_NAME, MAX_NAME_LEN)
            .email(EMAIL);
        if let Some(role) = state.text_trimmed(ROLE) {
            if role.parse::<Role>().is_err() {
                v.push(ROLE, "Pick Admin, Senior Therapist or Therapist");
            }
        }
        v.finish()
    }

    fn build(&self, state: &FormState, _ctx: &AssembleContext) -> FormResult<RegisterPayload> {
        let role = match state.text_trimmed(ROLE) {
            Some(role) => role.parse::<Role>().map_err(FormError::InvalidInput)?,
            None => Role::Junior,
        };
        Ok(RegisterPayload {
            username: text_field(state, USERNAME).trim().to_string(),
            password: text_field(state, PASSWORD),
            first_name: text_field(state, FIRST_NAME),
            last_name: text_field(state, LAST_NAME),
            email: text_field(state, EMAIL).trim().to_string(),
            role,
        })
    }
}
