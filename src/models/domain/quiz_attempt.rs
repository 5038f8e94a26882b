use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub student_id: String,
    pub quiz_id: String,
    /// 1-based, monotonically increasing per (student, quiz).
    pub attempt_number: i32,
    pub status: AttemptStatus,
    /// Set once on creation, immutable afterwards.
    pub started_at: DateTime<Utc>,
    /// Set exactly once, on the terminal transition.
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub passed: Option<bool>,
}

/// Serialized snake_case so repository filters can match on the raw string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
    Timeout,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "in_progress",
            AttemptStatus::Completed => "completed",
            AttemptStatus::Timeout => "timeout",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptStatus::Completed | AttemptStatus::Timeout)
    }
}

impl QuizAttempt {
    pub fn start(student_id: &str, quiz_id: &str, attempt_number: i32) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            quiz_id: quiz_id.to_string(),
            attempt_number,
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            submitted_at: None,
            score: None,
            passed: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_creates_open_attempt_without_result_fields() {
        let attempt = QuizAttempt::start("student-1", "quiz-1", 1);

        assert_eq!(attempt.status, AttemptStatus::InProgress);
        assert!(!attempt.is_terminal());
        assert!(attempt.submitted_at.is_none());
        assert!(attempt.score.is_none());
        assert!(attempt.passed.is_none());
        assert_eq!(attempt.attempt_number, 1);
    }

    #[test]
    fn status_serializes_to_snake_case_strings() {
        assert_eq!(
            serde_json::to_string(&AttemptStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&AttemptStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&AttemptStatus::Timeout).unwrap(),
            "\"timeout\""
        );
    }

    #[test]
    fn as_str_matches_serde_representation() {
        for status in [
            AttemptStatus::InProgress,
            AttemptStatus::Completed,
            AttemptStatus::Timeout,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn terminal_statuses_are_completed_and_timeout() {
        assert!(!AttemptStatus::InProgress.is_terminal());
        assert!(AttemptStatus::Completed.is_terminal());
        assert!(AttemptStatus::Timeout.is_terminal());
    }
}
