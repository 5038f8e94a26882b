use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub question_type: QuizQuestionType,
    /// Option keys are unique within a question.
    pub options: Vec<QuizOption>,
    /// Always > 0. A correct answer earns the full value, anything else 0.
    pub points: f64,
    pub order: i16,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizOption {
    /// Stable key the student's selection refers to.
    pub key: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuizQuestionType {
    /// Exactly one correct option.
    Single,
    /// One or more correct options; all must be selected, nothing else.
    Multi,
}

impl QuizQuestion {
    pub fn correct_keys(&self) -> BTreeSet<&str> {
        self.options
            .iter()
            .filter(|opt| opt.correct)
            .map(|opt| opt.key.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_question() -> QuizQuestion {
        QuizQuestion {
            id: "q-1".to_string(),
            prompt: "Which planet is closest to the sun?".to_string(),
            question_type: QuizQuestionType::Single,
            options: vec![
                QuizOption {
                    key: "a".to_string(),
                    text: "Mercury".to_string(),
                    correct: true,
                },
                QuizOption {
                    key: "b".to_string(),
                    text: "Venus".to_string(),
                    correct: false,
                },
            ],
            points: 5.0,
            order: 1,
        }
    }

    #[test]
    fn quiz_question_type_round_trip_serialization() {
        for variant in [QuizQuestionType::Single, QuizQuestionType::Multi] {
            let json = serde_json::to_string(&variant).expect("variant should serialize");
            let parsed: QuizQuestionType =
                serde_json::from_str(&json).expect("variant should deserialize");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn quiz_question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuizQuestionType>("\"essay\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn correct_keys_collects_only_correct_options() {
        let question = single_question();
        let keys = question.correct_keys();

        assert_eq!(keys.len(), 1);
        assert!(keys.contains("a"));
    }
}
