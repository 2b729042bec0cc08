//! Content manifest engine
//!
//! Frameworks describe their declaration and service-edit question sets as
//! "manifests": ordered sections of questions, where questions can depend on
//! the answers to earlier questions and can nest sub-questions
//! (multiquestions). This crate loads manifests from disk and provides a
//! pure filter from `(manifest, answers)` to the visible subset, plus
//! section-scoped form extraction, change detection, and unanswered-question
//! counting.

pub mod filter;
pub mod forms;
pub mod loader;
pub mod manifest;
pub mod summary;

pub use filter::FilteredManifest;
pub use loader::{ContentError, ContentLoader};
pub use manifest::{Dependency, Manifest, Question, QuestionType, Section};
pub use summary::count_unanswered_questions;

/// Question-id -> answer mapping, as stored on declarations and drafts.
pub type Answers = std::collections::BTreeMap<String, serde_json::Value>;
