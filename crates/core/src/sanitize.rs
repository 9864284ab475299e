//! Field-key sanitizer.
//!
//! Option labels are free text ("Asthma / Short breath"); bound field names must be plain
//! identifiers. The same function is used when a checkbox is registered and when its state is
//! read back, so both sides always agree on the key.

/// Replaces every character that is not ASCII alphanumeric with `_`.
///
/// One `_` is emitted per replaced `char`, so the mapping is length-preserving in chars and
/// idempotent: `sanitize_key(&sanitize_key(x)) == sanitize_key(x)`.
pub fn sanitize_key(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// True when `key` is already in sanitized form.
pub fn is_sanitized(key: &str) -> bool {
    key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_punctuation_and_spaces() {
        assert_eq!(sanitize_key("Asthma / Short breath"), "Asthma___Short_breath");
        assert_eq!(sanitize_key("Vinyasa/Flow"), "Vinyasa_Flow");
        assert_eq!(sanitize_key("Asana (postures)"), "Asana__postures_");
    }

    #[test]
    fn is_idempotent_and_stable() {
        for label in ["Bikram/Hot", "Third‑Eye", "Non‑judgement", "Yin", "", "a.b.c"] {
            let once = sanitize_key(label);
            assert_eq!(sanitize_key(&once), once);
            assert_eq!(sanitize_key(label), once);
            assert!(is_sanitized(&once));
        }
    }

    #[test]
    fn non_ascii_characters_become_underscores() {
        // U+2011 non-breaking hyphen
        assert_eq!(sanitize_key("Three‑Part"), "Three_Part");
    }

    #[test]
    fn keeps_camel_case_keys_unchanged() {
        assert_eq!(sanitize_key("heartConditions"), "heartConditions");
    }
}
