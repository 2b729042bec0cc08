//! Manifest schema types.

use serde::{Deserialize, Serialize};

use crate::filter::FilteredManifest;
use crate::Answers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Boolean,
    Radios,
    Checkboxes,
    List,
    Number,
    Upload,
    Multiquestion,
}

/// A visibility dependency: the question is shown only while the answer to
/// `on` is one of the `being` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub on: String,
    pub being: Vec<serde_json::Value>,
}

impl Dependency {
    pub fn satisfied_by(&self, answers: &Answers) -> bool {
        match answers.get(&self.on) {
            Some(value) => self.being.contains(value),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub name: String,
    pub number: u32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub depends: Vec<Dependency>,
    /// Sub-questions for `Multiquestion`; empty otherwise.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Question {
    pub fn is_multiquestion(&self) -> bool {
        self.question_type == QuestionType::Multiquestion
    }

    /// Whether this question is visible given the current answers.
    pub fn visible(&self, answers: &Answers) -> bool {
        self.depends.iter().all(|dep| dep.satisfied_by(answers))
    }

    /// The leaf question ids this question contributes answers under:
    /// the question's own id, or the nested ids for a multiquestion.
    pub fn answer_ids(&self) -> Vec<&str> {
        if self.is_multiquestion() {
            self.questions.iter().map(|q| q.id.as_str()).collect()
        } else {
            vec![self.id.as_str()]
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    /// All answer ids posted against this section, nested ids included.
    pub fn answer_ids(&self) -> Vec<&str> {
        self.questions.iter().flat_map(|q| q.answer_ids()).collect()
    }
}

/// A framework's full question schema for one manifest kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub sections: Vec<Section>,
}

impl Manifest {
    /// Filter the manifest against current answers: keep only questions
    /// whose dependencies are satisfied, and drop sections left empty.
    /// Pure; the manifest itself is untouched.
    pub fn filter(&self, answers: &Answers) -> FilteredManifest {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let questions: Vec<Question> = section
                    .questions
                    .iter()
                    .filter(|q| q.visible(answers))
                    .cloned()
                    .collect();
                if questions.is_empty() {
                    None
                } else {
                    Some(Section {
                        slug: section.slug.clone(),
                        name: section.name.clone(),
                        questions,
                    })
                }
            })
            .collect();
        FilteredManifest { sections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn question(id: &str, number: u32) -> Question {
        Question {
            id: id.to_string(),
            name: id.to_string(),
            number,
            question_type: QuestionType::Text,
            optional: false,
            depends: vec![],
            questions: vec![],
        }
    }

    #[test]
    fn test_dependency_satisfied() {
        let dep = Dependency {
            on: "tradingStatus".to_string(),
            being: vec![json!("limited company"), json!("llp")],
        };
        let mut answers = Answers::new();
        assert!(!dep.satisfied_by(&answers));
        answers.insert("tradingStatus".to_string(), json!("llp"));
        assert!(dep.satisfied_by(&answers));
        answers.insert("tradingStatus".to_string(), json!("sole trader"));
        assert!(!dep.satisfied_by(&answers));
    }

    #[test]
    fn test_filter_hides_unmet_dependencies() {
        let mut dependent = question("vatNumber", 2);
        dependent.depends = vec![Dependency {
            on: "vatRegistered".to_string(),
            being: vec![json!(true)],
        }];
        let manifest = Manifest {
            sections: vec![Section {
                slug: "registration".to_string(),
                name: "Registration".to_string(),
                questions: vec![question("vatRegistered", 1), dependent],
            }],
        };

        let hidden = manifest.filter(&Answers::new());
        assert_eq!(hidden.sections[0].questions.len(), 1);

        let mut answers = Answers::new();
        answers.insert("vatRegistered".to_string(), json!(true));
        let shown = manifest.filter(&answers);
        assert_eq!(shown.sections[0].questions.len(), 2);
    }

    #[test]
    fn test_filter_drops_empty_sections() {
        let mut q = question("onlyQuestion", 1);
        q.depends = vec![Dependency {
            on: "never".to_string(),
            being: vec![json!(true)],
        }];
        let manifest = Manifest {
            sections: vec![Section {
                slug: "conditional".to_string(),
                name: "Conditional".to_string(),
                questions: vec![q],
            }],
        };
        let filtered = manifest.filter(&Answers::new());
        assert!(filtered.sections.is_empty());
    }

    #[test]
    fn test_multiquestion_answer_ids() {
        let mut parent = question("companyDetails", 1);
        parent.question_type = QuestionType::Multiquestion;
        parent.questions = vec![question("companyName", 2), question("companyNumber", 3)];
        assert_eq!(parent.answer_ids(), vec!["companyName", "companyNumber"]);
    }
}
