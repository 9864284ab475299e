//! Checkbox options and their resolution into canonical `{label, key}` records.
//!
//! An option arrives either as a bare label or as an explicit `{label, key}` pair. Both shapes
//! are resolved exactly once, by [`OptionSet::resolve`], and nothing downstream looks at the raw
//! shape again.

use crate::error::{FormError, FormResult};
use crate::sanitize::sanitize_key;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// One option as declared by a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    /// Label with an explicit field key.
    Keyed {
        label: Cow<'static, str>,
        key: Cow<'static, str>,
    },
    /// Bare label; the key is derived by sanitizing it.
    Label(Cow<'static, str>),
}

impl OptionSpec {
    pub const fn label(label: &'static str) -> Self {
        Self::Label(Cow::Borrowed(label))
    }

    pub const fn keyed(label: &'static str, key: &'static str) -> Self {
        Self::Keyed {
            label: Cow::Borrowed(label),
            key: Cow::Borrowed(key),
        }
    }

    fn resolve(&self) -> ResolvedOption {
        match self {
            Self::Label(label) => ResolvedOption {
                label: label.to_string(),
                key: sanitize_key(label),
            },
            Self::Keyed { label, key } => ResolvedOption {
                label: label.to_string(),
                key: sanitize_key(key),
            },
        }
    }
}

impl From<&'static str> for OptionSpec {
    fn from(label: &'static str) -> Self {
        Self::label(label)
    }
}

/// Canonical option record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOption {
    pub label: String,
    pub key: String,
}

/// Resolved options of one group, in declaration order, with unique keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: Vec<ResolvedOption>,
}

impl OptionSet {
    /// Resolves `specs` for the group named `group`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DuplicateOptionKey`] if two options resolve to the same key, for
    /// example `"Bikram/Hot"` and `"Bikram Hot"`.
    pub fn resolve(group: &str, specs: &[OptionSpec]) -> FormResult<Self> {
        let mut seen: HashMap<String, String> = HashMap::with_capacity(specs.len());
        let mut options = Vec::with_capacity(specs.len());

        for spec in specs {
            let resolved = spec.resolve();
            if let Some(first) = seen.get(&resolved.key) {
                return Err(FormError::DuplicateOptionKey {
                    group: group.to_string(),
                    key: resolved.key,
                    first: first.clone(),
                    second: resolved.label,
                });
            }
            seen.insert(resolved.key.clone(), resolved.label.clone());
            options.push(resolved);
        }

        Ok(Self { options })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedOption> {
        self.options.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.key.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }

    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
