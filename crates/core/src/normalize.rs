//! Value normalisation between form input and wire payloads.

use crate::error::{FormError, FormResult};
use crate::form_state::FormState;
use chrono::NaiveDate;
use pies_types::{NonEmptyText, PhoneNumber};

/// Ten-digit phone as sent on the wire, `""` when blank.
///
/// Input is read through [`PhoneNumber::from_input`], so anything past the tenth digit is
/// dropped the same way the phone input mask drops it.
pub fn phone_field(state: &FormState, field: &str) -> String {
    state
        .text(field)
        .and_then(|v| PhoneNumber::from_input(v).ok())
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Required text, trimmed. Only fails for state that skipped validation.
pub fn required_text(state: &FormState, field: &str) -> FormResult<NonEmptyText> {
    NonEmptyText::new(state.text(field).unwrap_or_default())
        .map_err(|e| FormError::InvalidInput(format!("{field}: {e}")))
}

/// Optional text trimmed, `""` when unset.
pub fn trimmed_field(state: &FormState, field: &str) -> String {
    state.text_trimmed(field).unwrap_or_default().to_string()
}

/// Optional free text sent as an explicit string, `""` when unset.
pub fn text_field(state: &FormState, field: &str) -> String {
    state.text_or_empty(field)
}

/// Optional choice sent as `null` when unset or blank.
pub fn choice_field(state: &FormState, field: &str) -> Option<String> {
    state.text_trimmed(field).map(str::to_string)
}

/// Optional `YYYY-MM-DD` date sent as `null` when unset or unparseable.
pub fn date_field(state: &FormState, field: &str) -> Option<NaiveDate> {
    state
        .text_trimmed(field)
        .and_then(|v| crate::dates::parse_ymd(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_capped_at_ten_digits() {
        let mut state = FormState::new();
        state.set_text("cellPhone", "(555) 555-123499");
        state.set_text("homePhone", "  ");
        assert_eq!(phone_field(&state, "cellPhone"), "5555551234");
        assert_eq!(phone_field(&state, "homePhone"), "");
        assert_eq!(phone_field(&state, "workPhone"), "");
    }

    #[test]
    fn required_text_is_trimmed() {
        let mut state = FormState::new();
        state.set_text("firstName", "  Sarah ");
        state.set_text("lastName", "   ");
        assert_eq!(required_text(&state, "firstName").unwrap().as_str(), "Sarah");
        assert!(matches!(
            required_text(&state, "lastName"),
            Err(FormError::InvalidInput(_))
        ));
    }

    #[test]
    fn optional_fields_are_never_absent() {
        let mut state = FormState::new();
        state.set_text("yogaFrequency", "  ");
        state.set_text("city", " Springfield ");
        assert_eq!(text_field(&state, "referredBy"), "");
        assert_eq!(trimmed_field(&state, "city"), "Springfield");
        assert_eq!(trimmed_field(&state, "yogaFrequency"), "");
        assert_eq!(choice_field(&state, "yogaFrequency"), None);
        assert_eq!(date_field(&state, "pregnancyEdd"), None);
    }
}
