use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row per (attempt, question); overwritten in place on every change.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResponse {
    pub attempt_id: String,
    pub question_id: String,
    /// Ordered-set semantics: single element for single-select, the full
    /// current selection for multi-select. Last write wins.
    pub selected_keys: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

impl QuizResponse {
    pub fn new(attempt_id: &str, question_id: &str, selected_keys: Vec<String>) -> Self {
        QuizResponse {
            attempt_id: attempt_id.to_string(),
            question_id: question_id.to_string(),
            selected_keys,
            recorded_at: Utc::now(),
        }
    }
}
