use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::QuizQuestion;

/// A quiz as the engine reads it. Authoring owns these documents; the engine
/// never writes them.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// None means the quiz is untimed and attempts never auto-expire.
    pub time_limit_minutes: Option<u32>,
    /// Always >= 1.
    pub max_attempts: u32,
    pub max_score: f64,
    /// None means pass/fail is not applicable to this quiz.
    pub passing_score: Option<f64>,
    /// None on either side means no constraint on that side.
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn is_timed(&self) -> bool {
        self.time_limit_minutes.is_some()
    }
}
