//! Unanswered-question counting for draft completeness annotations.

use crate::filter::FilteredManifest;
use crate::Answers;

/// Whether a stored value counts as an answer. Nulls, empty strings and
/// empty arrays do not.
fn is_answered(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
        Some(serde_json::Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Count unanswered questions among the visible leaves of a filtered
/// manifest, split into (required, optional).
pub fn count_unanswered_questions(
    filtered: &FilteredManifest,
    answers: &Answers,
) -> (usize, usize) {
    let mut required = 0;
    let mut optional = 0;
    for question in filtered.leaf_questions() {
        if !is_answered(answers.get(&question.id)) {
            if question.optional {
                optional += 1;
            } else {
                required += 1;
            }
        }
    }
    (required, optional)
}
