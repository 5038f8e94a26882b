use std::collections::{BTreeMap, BTreeSet};

use crate::models::domain::Quiz;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreSummary {
    pub raw_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    /// None when the quiz defines no passing score.
    pub passed: Option<bool>,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores a finalized response set against the quiz. A question is
    /// correct iff the selected key set exactly equals its correct key set,
    /// order-independent; full points or nothing. Unanswered questions score
    /// 0, the same as wrong answers.
    pub fn score(quiz: &Quiz, responses: &BTreeMap<String, Vec<String>>) -> ScoreSummary {
        let mut raw_score = 0.0;

        for question in &quiz.questions {
            let correct = question.correct_keys();
            if correct.is_empty() {
                // Unanswerable authoring mistake; never award credit for it.
                log::warn!(
                    "question {} has no correct options, scoring it 0",
                    question.id
                );
                continue;
            }

            let selected: BTreeSet<&str> = responses
                .get(&question.id)
                .map(|keys| keys.iter().map(String::as_str).collect())
                .unwrap_or_default();

            if selected == correct {
                raw_score += question.points;
            }
        }

        let percentage = if quiz.max_score > 0.0 {
            raw_score / quiz.max_score * 100.0
        } else {
            0.0
        };

        ScoreSummary {
            raw_score,
            max_score: quiz.max_score,
            percentage,
            passed: quiz.passing_score.map(|required| raw_score >= required),
        }
    }
}
