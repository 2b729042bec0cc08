//! The visible subset of a manifest for a given set of answers.

use std::collections::BTreeMap;

use crate::manifest::{Question, Section};

/// Output of `Manifest::filter`: only the sections and questions applicable
/// given the current answers.
#[derive(Debug, Clone)]
pub struct FilteredManifest {
    pub sections: Vec<Section>,
}

impl FilteredManifest {
    pub fn get_section(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    /// Flat question-id -> question lookup across all visible sections,
    /// ordered by question number. Multiquestions are expanded so their
    /// nested questions are addressable by id as well.
    pub fn question_index(&self) -> BTreeMap<String, Question> {
        let mut ordered: Vec<&Question> = self
            .sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .collect();
        ordered.sort_by_key(|q| q.number);

        let mut index = BTreeMap::new();
        for question in ordered {
            index.insert(question.id.clone(), question.clone());
            if question.is_multiquestion() {
                for nested in &question.questions {
                    index.insert(nested.id.clone(), nested.clone());
                }
            }
        }
        index
    }

    /// All visible leaf questions (multiquestions expanded).
    pub fn leaf_questions(&self) -> Vec<&Question> {
        self.sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .flat_map(|q| {
                if q.is_multiquestion() {
                    q.questions.iter().collect::<Vec<_>>()
                } else {
                    vec![q]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, QuestionType};
    use crate::Answers;

    fn sample() -> FilteredManifest {
        let manifest: Manifest = serde_json::from_value(serde_json::json!({
            "sections": [
                {
                    "slug": "organisation",
                    "name": "Your organisation",
                    "questions": [
                        {
                            "id": "companyDetails",
                            "name": "Company details",
                            "number": 2,
                            "type": "multiquestion",
                            "questions": [
                                {"id": "companyName", "name": "Name", "number": 3, "type": "text"},
                                {"id": "companyNumber", "name": "Number", "number": 4, "type": "text"}
                            ]
                        },
                        {"id": "tradingStatus", "name": "Trading status", "number": 1, "type": "radios"}
                    ]
                }
            ]
        }))
        .expect("manifest");
        manifest.filter(&Answers::new())
    }

    #[test]
    fn test_get_section() {
        let filtered = sample();
        assert!(filtered.get_section("organisation").is_some());
        assert!(filtered.get_section("missing").is_none());
    }

    #[test]
    fn test_question_index_expands_multiquestions() {
        let index = sample().question_index();
        assert!(index.contains_key("companyDetails"));
        assert!(index.contains_key("companyName"));
        assert!(index.contains_key("companyNumber"));
        assert!(index.contains_key("tradingStatus"));
    }

    #[test]
    fn test_leaf_questions_expand_nested() {
        let filtered = sample();
        let leaves = filtered.leaf_questions();
        assert_eq!(leaves.len(), 3);
        assert!(leaves
            .iter()
            .all(|q| q.question_type != QuestionType::Multiquestion));
    }
}
