//! Validated value types shared by the PIES crates.
//!
//! Each type enforces its invariant at construction so downstream code never sees a malformed
//! value. Contact numbers and zip codes are stored digits-only; any display formatting is a
//! presentation concern and never part of the stored value.

/// Why typed input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("value is blank")]
    Empty,
    #[error("expected {expected} digits, found {found}")]
    DigitCount { expected: usize, found: usize },
}

/// Strips every non-digit character from `input`.
///
/// `"(555) 555-1234"` becomes `"5555551234"`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Required free text, trimmed, with at least one visible character.
///
/// Used for names the backend rejects when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// A ten-digit North American phone number stored digits-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const DIGITS: usize = 10;

    /// Parses typed input the way the phone input mask does: keep digits, cap at ten, then
    /// require exactly ten.
    pub fn from_input(input: &str) -> Result<Self, TextError> {
        let digits: String = digits_only(input).chars().take(Self::DIGITS).collect();
        if digits.is_empty() {
            return Err(TextError::Empty);
        }
        if digits.len() != Self::DIGITS {
            return Err(TextError::DigitCount {
                expected: Self::DIGITS,
                found: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(555) 555-1234` rendering for display only.
    pub fn display(&self) -> String {
        format!("({}) {}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for PhoneNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// A five-digit US zip code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipCode(String);

impl ZipCode {
    pub const DIGITS: usize = 5;

    /// Keeps digits, truncates to five, and requires exactly five.
    ///
    /// `"12345-"` and `"12345-6789"` both yield `12345`; `"1234"` is rejected.
    pub fn from_input(input: &str) -> Result<Self, TextError> {
        let digits: String = digits_only(input).chars().take(Self::DIGITS).collect();
        if digits.is_empty() {
            return Err(TextError::Empty);
        }
        if digits.len() != Self::DIGITS {
            return Err(TextError::DigitCount {
                expected: Self::DIGITS,
                found: digits.len(),
            });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ZipCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_and_rejects_blank() {
        let name = NonEmptyText::new("  Sarah ").unwrap();
        assert_eq!(name.as_str(), "Sarah");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Sarah\"");
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new("\t\n"), Err(TextError::Empty));
    }

    #[test]
    fn phone_number_keeps_digits_only() {
        let phone = PhoneNumber::from_input("(555) 555-1234").unwrap();
        assert_eq!(phone.as_str(), "5555551234");
        assert_eq!(phone.display(), "(555) 555-1234");
        assert_eq!(
            serde_json::to_string(&phone).unwrap(),
            "\"5555551234\""
        );
    }

    #[test]
    fn phone_number_rejects_short_input() {
        assert_eq!(
            PhoneNumber::from_input("555-12"),
            Err(TextError::DigitCount {
                expected: 10,
                found: 5
            })
        );
        assert_eq!(PhoneNumber::from_input("() -"), Err(TextError::Empty));
    }

    #[test]
    fn zip_code_truncates_to_five_digits() {
        assert_eq!(ZipCode::from_input("12345-").unwrap().as_str(), "12345");
        assert_eq!(ZipCode::from_input("12345-6789").unwrap().as_str(), "12345");
        assert!(matches!(
            ZipCode::from_input("1234"),
            Err(TextError::DigitCount { found: 4, .. })
        ));
    }
}
