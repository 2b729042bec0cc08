//! Section-scoped form data extraction and change detection.
//!
//! Declarations are stored whole, but edited one section at a time: posted
//! answers are restricted to the section being edited, compared against the
//! stored mapping, and merged only when something actually changed.

use crate::manifest::Section;
use crate::Answers;

impl Section {
    /// Extract the posted answers that belong to this section. Keys outside
    /// the section's question ids (nested multiquestion ids included) are
    /// dropped; absent keys stay absent rather than becoming nulls.
    pub fn get_data(&self, posted: &Answers) -> Answers {
        let ids = self.answer_ids();
        posted
            .iter()
            .filter(|(key, _)| ids.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Whether persisting `new` over `old` would change anything for this
    /// section's answers.
    pub fn has_changes_to_save(&self, old: &Answers, new: &Answers) -> bool {
        new.iter().any(|(key, value)| old.get(key) != Some(value))
    }
}
