//! Form input validation.
//!
//! Rules are checked against a [`FormState`] before any payload is assembled. All violations are
//! collected so the user sees every problem at once, and a form with violations is never
//! submitted.

use crate::dates::parse_ymd;
use crate::form_state::FormState;
use chrono::NaiveDate;
use pies_types::{PhoneNumber, TextError, ZipCode};
use std::fmt;

/// One failed rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every rule that failed for a form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// First message reported for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.message.as_str())
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "validation failed: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Chained rule checker over one form state.
pub struct Validator<'a> {
    state: &'a FormState,
    errors: ValidationErrors,
}

impl<'a> Validator<'a> {
    pub fn new(state: &'a FormState) -> Self {
        Self {
            state,
            errors: ValidationErrors::default(),
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(field, message);
        self
    }

    pub fn required(&mut self, field: &str, message: &str) -> &mut Self {
        if self.state.text_trimmed(field).is_none() {
            self.errors.push(field, message);
        }
        self
    }

    /// Length in chars must not exceed `max`.
    pub fn max_len(&mut self, field: &str, max: usize) -> &mut Self {
        if let Some(value) = self.state.text(field) {
            if value.chars().count() > max {
                self.errors.push(field, format!("Max {max} characters"));
            }
        }
        self
    }

    /// When present, the value must look like `local@domain`.
    pub fn email(&mut self, field: &str) -> &mut Self {
        if let Some(value) = self.state.text_trimmed(field) {
            let ok = match value.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty()
                        && !domain.is_empty()
                        && !domain.contains('@')
                        && !value.contains(char::is_whitespace)
                }
                None => false,
            };
            if !ok {
                self.errors.push(field, "Enter a valid email address");
            }
        }
        self
    }

    /// When present, the value must be one of `allowed`.
    pub fn one_of(&mut self, field: &str, allowed: &[&str], message: &str) -> &mut Self {
        if let Some(value) = self.state.text_trimmed(field) {
            if !allowed.contains(&value) {
                self.errors.push(field, message);
            }
        }
        self
    }

    pub fn zip_code(&mut self, field: &str) -> &mut Self {
        match self.state.text(field).map(ZipCode::from_input) {
            None | Some(Err(TextError::Empty)) => {
                self.errors.push(field, "Zip code is required");
            }
            Some(Err(_)) => {
                self.errors.push(field, "Use exactly 5 digits");
            }
            Some(Ok(_)) => {}
        }
        self
    }

    /// A ten-digit phone number; blank is allowed unless `required` is set.
    pub fn phone(&mut self, field: &str, required: Option<&str>) -> &mut Self {
        match self.state.text(field).map(PhoneNumber::from_input) {
            None | Some(Err(TextError::Empty)) => {
                if let Some(message) = required {
                    self.errors.push(field, message);
                }
            }
            Some(Err(_)) => {
                self.errors.push(field, "Format: (555) 555-5555");
            }
            Some(Ok(_)) => {}
        }
        self
    }

    /// When present, the value must be a `YYYY-MM-DD` date no later than `latest`.
    pub fn date_not_after(&mut self, field: &str, latest: NaiveDate, message: &str) -> &mut Self {
        if let Some(value) = self.state.text_trimmed(field) {
            match parse_ymd(value) {
                Ok(date) if date > latest => {
                    self.errors.push(field, message);
                }
                Ok(_) => {}
                Err(_) => {
                    self.errors.push(field, "Use a YYYY-MM-DD date");
                }
            }
        }
        self
    }

    /// When present, the value must be a `YYYY-MM-DD` date.
    pub fn date(&mut self, field: &str) -> &mut Self {
        if let Some(value) = self.state.text_trimmed(field) {
            if parse_ymd(value).is_err() {
                self.errors.push(field, "Use a YYYY-MM-DD date");
            }
        }
        self
    }

    /// When present, the value must be an integer within `min..=max`.
    pub fn integer_in_range(&mut self, field: &str, min: i64, max: i64, message: &str) -> &mut Self {
        if let Some(value) = self.state.text_trimmed(field) {
            match value.parse::<i64>() {
                Ok(n) if (min..=max).contains(&n) => {}
                _ => {
                    self.errors.push(field, message);
                }
            }
        }
        self
    }

    /// A selected record id: present and a positive integer.
    pub fn selected_id(&mut self, field: &str, message: &str) -> &mut Self {
        if parse_id(self.state, field).is_none() {
            self.errors.push(field, message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        let errors = std::mem::take(&mut self.errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Reads a positive integer id from `field`.
pub fn parse_id(state: &FormState, field: &str) -> Option<u64> {
    state
        .text_trimmed(field)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, &str)]) -> FormState {
        let mut s = FormState::new();
        for (k, v) in pairs {
            s.set_text(k, *v);
        }
        s
    }

    #[test]
    fn collects_every_violation() {
        let s = state(&[("firstName", "   "), ("city", "x".repeat(101).as_str())]);
        let err = Validator::new(&s)
            .required("firstName", "First name is required")
            .required("lastName", "Last name is required")
            .max_len("city", 100)
            .finish()
            .expect_err("three violations");
        assert_eq!(err.violations().len(), 3);
        assert_eq!(err.message_for("city"), Some("Max 100 characters"));
        assert!(err.to_string().contains("lastName: Last name is required"));
    }

    #[test]
    fn zip_code_rules() {
        let ok = state(&[("zipCode", "12345-")]);
        assert!(Validator::new(&ok).zip_code("zipCode").finish().is_ok());

        let short = state(&[("zipCode", "123")]);
        let err = Validator::new(&short).zip_code("zipCode").finish().unwrap_err();
        assert_eq!(err.message_for("zipCode"), Some("Use exactly 5 digits"));

        let missing = FormState::new();
        let err = Validator::new(&missing).zip_code("zipCode").finish().unwrap_err();
        assert_eq!(err.message_for("zipCode"), Some("Zip code is required"));
    }

    #[test]
    fn optional_phone_may_be_blank_but_not_partial() {
        let blank = state(&[("homePhone", "")]);
        assert!(Validator::new(&blank).phone("homePhone", None).finish().is_ok());

        let partial = state(&[("homePhone", "(555) 55")]);
        let err = Validator::new(&partial)
            .phone("homePhone", None)
            .finish()
            .unwrap_err();
        assert_eq!(err.message_for("homePhone"), Some("Format: (555) 555-5555"));
    }

    #[test]
    fn future_dates_are_rejected() {
        let today = parse_ymd("2025-06-14").unwrap();
        let s = state(&[("dob", "2025-06-15")]);
        let err = Validator::new(&s)
            .date_not_after("dob", today, "DOB cannot be in the future")
            .finish()
            .unwrap_err();
        assert_eq!(err.message_for("dob"), Some("DOB cannot be in the future"));
    }

    #[test]
    fn range_and_ids() {
        let s = state(&[("stressLevel", "11"), ("therapistId", "0")]);
        let err = Validator::new(&s)
            .integer_in_range("stressLevel", 1, 10, "Pick 1-10")
            .selected_id("therapistId", "Therapist is required")
            .finish()
            .unwrap_err();
        assert_eq!(err.violations().len(), 2);
        assert_eq!(parse_id(&state(&[("patientId", " 42 ")]), "patientId"), Some(42));
    }
}
