//! Per-instance form state.
//!
//! A [`FormState`] holds the text fields and checkbox groups of one form instance. It is created
//! when a form is mounted, mutated field by field, and reset after a successful submission. It is
//! never shared between form instances.
//!
//! Form files on disk use the same shape a browser form library hands to its submit handler:
//!
//! ```yaml
//! firstName: Sarah
//! therapistId: 3
//! physicalHistory:
//!   asthma: true
//! ```

use crate::error::{FormError, FormResult};
use crate::sanitize::sanitize_key;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Checked state of one checkbox namespace, keyed by sanitized option key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldGroup {
    checked: BTreeMap<String, bool>,
}

impl FieldGroup {
    pub fn is_checked(&self, key: &str) -> bool {
        self.checked.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: &str, checked: bool) {
        self.checked.insert(key.to_string(), checked);
    }

    /// Adds `key` as unchecked unless it is already present.
    pub fn register(&mut self, key: &str) {
        self.checked.entry(key.to_string()).or_insert(false);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.checked.keys().map(String::as_str)
    }

    pub fn checked_keys(&self) -> impl Iterator<Item = &str> {
        self.checked
            .iter()
            .filter(|(_, on)| **on)
            .map(|(k, _)| k.as_str())
    }
}

/// Anything that bound fields can be registered against.
pub trait FieldRegistry {
    /// Registers a checkbox at `group.key` with an unchecked default.
    fn register_checkbox(&mut self, group: &str, key: &str);
}

/// Field values of one form instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    text: BTreeMap<String, String>,
    groups: BTreeMap<String, FieldGroup>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text value, `None` when the field was never set.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    /// Text value trimmed, with blank treated as absent.
    pub fn text_trimmed(&self, name: &str) -> Option<&str> {
        self.text(name).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Text value or `""`, never absent.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.text.insert(name.to_string(), value.into());
    }

    pub fn clear_text(&mut self, name: &str) {
        self.text.remove(name);
    }

    pub fn group(&self, prefix: &str) -> Option<&FieldGroup> {
        self.groups.get(prefix)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &FieldGroup)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets the checkbox bound at `path` (`"<group>.<key>"`).
    ///
    /// The key part is sanitized, so `"styles.Vinyasa/Flow"` and `"styles.Vinyasa_Flow"` address
    /// the same checkbox.
    pub fn set_checked(&mut self, path: &str, checked: bool) -> FormResult<()> {
        let (group, key) = split_path(path)?;
        self.groups
            .entry(group.to_string())
            .or_default()
            .set(&sanitize_key(key), checked);
        Ok(())
    }

    pub fn is_checked(&self, path: &str) -> FormResult<bool> {
        let (group, key) = split_path(path)?;
        Ok(self
            .groups
            .get(group)
            .is_some_and(|g| g.is_checked(&sanitize_key(key))))
    }

    /// Clears every value.
    pub fn reset(&mut self) {
        self.text.clear();
        self.groups.clear();
    }

    /// True when no text is set and no checkbox is checked.
    pub fn is_pristine(&self) -> bool {
        self.text.values().all(|v| v.is_empty())
            && self.groups.values().all(|g| g.checked_keys().next().is_none())
    }

    /// Overlays `other` on top of `self`: text replaces, checkbox state merges.
    pub fn merge(&mut self, other: FormState) {
        self.text.extend(other.text);
        for (name, group) in other.groups {
            let target = self.groups.entry(name).or_default();
            for (key, on) in group.checked {
                target.set(&key, on);
            }
        }
    }

    /// Parses form data from JSON text.
    pub fn from_json_str(input: &str) -> FormResult<Self> {
        let de = &mut serde_json::Deserializer::from_str(input);
        let raw: BTreeMap<String, RawValue> =
            serde_path_to_error::deserialize(de).map_err(|e| FormError::FormStateParse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;
        Ok(Self::from_raw(raw))
    }

    /// Parses form data from YAML text.
    pub fn from_yaml_str(input: &str) -> FormResult<Self> {
        let de = serde_yaml::Deserializer::from_str(input);
        let raw: BTreeMap<String, RawValue> =
            serde_path_to_error::deserialize(de).map_err(|e| FormError::FormStateParse {
                path: e.path().to_string(),
                message: e.inner().to_string(),
            })?;
        Ok(Self::from_raw(raw))
    }

    /// Reads a `.json`, `.yaml` or `.yml` form file.
    pub fn from_path(path: &Path) -> FormResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(FormError::FileRead)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            other => Err(FormError::UnsupportedFormFile(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    fn from_raw(raw: BTreeMap<String, RawValue>) -> Self {
        let mut state = Self::new();
        for (name, value) in raw {
            match value {
                RawValue::Null => {}
                RawValue::Flag(b) => state.set_text(&name, b.to_string()),
                RawValue::Integer(n) => state.set_text(&name, n.to_string()),
                RawValue::Float(n) => state.set_text(&name, n.to_string()),
                RawValue::Text(s) => state.set_text(&name, s),
                RawValue::Group(entries) => {
                    let group = state.groups.entry(name).or_default();
                    for (key, on) in entries {
                        group.set(&sanitize_key(&key), on.unwrap_or(false));
                    }
                }
            }
        }
        state
    }
}

impl FieldRegistry for FormState {
    fn register_checkbox(&mut self, group: &str, key: &str) {
        self.groups.entry(group.to_string()).or_default().register(key);
    }
}

fn split_path(path: &str) -> FormResult<(&str, &str)> {
    match path.split_once('.') {
        Some((group, key)) if !group.is_empty() && !key.is_empty() => Ok((group, key)),
        _ => Err(FormError::InvalidFieldPath(path.to_string())),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null,
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Group(BTreeMap<String, Option<bool>>),
}
