//! Option selection extractor.

use crate::form_state::FieldGroup;
use crate::options::OptionSet;

/// Returns the labels of `options` whose key is checked in `group`.
///
/// Output follows the order of `options`, not the order boxes were ticked. Keys present in
/// `group` that no current option owns are ignored, so state left over from a different option
/// set never shows up as a selection.
pub fn extract_selections(group: Option<&FieldGroup>, options: &OptionSet) -> Vec<String> {
    let Some(group) = group else {
        return Vec::new();
    };
    options
        .iter()
        .filter(|option| group.is_checked(&option.key))
        .map(|option| option.label.clone())
        .collect()
}
