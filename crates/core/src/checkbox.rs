//! Checkbox group binder.
//!
//! A [`CheckboxGroup`] declares a titled set of checkboxes under one namespace. Binding it
//! registers every `<namespace>.<key>` path with the form state, and reading it back goes through
//! [`crate::extract::extract_selections`] with the same resolved keys.

use crate::error::{FormError, FormResult};
use crate::extract::extract_selections;
use crate::form_state::{FieldRegistry, FormState};
use crate::options::{OptionSet, OptionSpec, ResolvedOption};
use crate::sanitize::is_sanitized;
use std::fmt::Write as _;

/// A checkbox bound to a field path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundCheckbox {
    pub path: String,
    pub label: String,
    pub key: String,
}

/// A titled, namespaced group of checkboxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckboxGroup {
    title: String,
    name_prefix: String,
    options: OptionSet,
}

impl CheckboxGroup {
    /// Creates a group after resolving its options.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidInput` if `name_prefix` is empty or not a plain identifier,
    /// and `FormError::DuplicateOptionKey` if two options share a key.
    pub fn new(
        title: impl Into<String>,
        name_prefix: impl Into<String>,
        specs: &[OptionSpec],
    ) -> FormResult<Self> {
        let name_prefix = name_prefix.into();
        if name_prefix.is_empty() || !is_sanitized(&name_prefix) {
            return Err(FormError::InvalidInput(format!(
                "checkbox group prefix {name_prefix:?} must be a non-empty identifier"
            )));
        }
        let options = OptionSet::resolve(&name_prefix, specs)?;
        Ok(Self {
            title: title.into(),
            name_prefix,
            options,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn field_path(&self, option: &ResolvedOption) -> String {
        format!("{}.{}", self.name_prefix, option.key)
    }

    /// Registers every checkbox and returns them in declaration order.
    pub fn bind<R: FieldRegistry>(&self, registry: &mut R) -> Vec<BoundCheckbox> {
        self.options
            .iter()
            .map(|option| {
                registry.register_checkbox(&self.name_prefix, &option.key);
                BoundCheckbox {
                    path: self.field_path(option),
                    label: option.label.clone(),
                    key: option.key.clone(),
                }
            })
            .collect()
    }

    /// Labels currently checked in `state`, in declaration order.
    pub fn selected(&self, state: &FormState) -> Vec<String> {
        extract_selections(state.group(&self.name_prefix), &self.options)
    }

    /// Plain-text rendering of the fieldset.
    pub fn render(&self, state: &FormState) -> String {
        let group = state.group(&self.name_prefix);
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        for option in self.options.iter() {
            let mark = if group.is_some_and(|g| g.is_checked(&option.key)) {
                'x'
            } else {
                ' '
            };
            let _ = writeln!(
                out,
                "  [{mark}] {}  ({})",
                option.label,
                self.field_path(option)
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles() -> CheckboxGroup {
        CheckboxGroup::new(
            "Styles",
            "styles",
            &[
                OptionSpec::label("Yin"),
                OptionSpec::label("Hatha"),
                OptionSpec::label("Vinyasa/Flow"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn binds_in_declaration_order() {
        let mut state = FormState::new();
        let bound = styles().bind(&mut state);
        let paths: Vec<_> = bound.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["styles.Yin", "styles.Hatha", "styles.Vinyasa_Flow"]);
        assert_eq!(state.group("styles").unwrap().keys().count(), 3);
        assert!(state.is_pristine());
    }

    #[test]
    fn empty_group_binds_nothing() {
        let group = CheckboxGroup::new("Nothing", "nothing", &[]).unwrap();
        let mut state = FormState::new();
        assert!(group.bind(&mut state).is_empty());
        assert_eq!(group.render(&state), "Nothing\n");
    }

    #[test]
    fn bound_path_round_trips_through_state() {
        let group = styles();
        let mut state = FormState::new();
        let bound = group.bind(&mut state);
        state.set_checked(&bound[2].path, true).unwrap();
        assert_eq!(group.selected(&state), vec!["Vinyasa/Flow".to_string()]);
    }

    #[test]
    fn render_marks_checked_options() {
        let group = styles();
        let mut state = FormState::new();
        state.set_checked("styles.Hatha", true).unwrap();
        let text = group.render(&state);
        assert!(text.contains("[x] Hatha  (styles.Hatha)"));
        assert!(text.contains("[ ] Yin  (styles.Yin)"));
    }

    #[test]
    fn rejects_dotted_prefix() {
        let err = CheckboxGroup::new("Bad", "a.b", &[]).expect_err("dotted prefix");
        assert!(matches!(err, FormError::InvalidInput(_)));
    }
}
