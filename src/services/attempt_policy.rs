use chrono::{DateTime, Utc};

use crate::models::domain::{Quiz, QuizAttempt};
use crate::services::availability::{AvailabilityStatus, AvailabilityWindowEvaluator};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attemptability {
    pub can_attempt: bool,
    /// Human-readable reason when `can_attempt` is false.
    pub reason: Option<String>,
    pub remaining_attempts: u32,
}

pub struct AttemptPolicyEnforcer;

impl AttemptPolicyEnforcer {
    /// Decides whether a new attempt may start, given the student's full
    /// attempt history for this quiz. Only terminal attempts consume a slot;
    /// an open attempt is handled by resume-on-start, not counted here.
    /// Availability is part of the verdict, not left to the caller.
    pub fn evaluate(quiz: &Quiz, history: &[QuizAttempt], now: DateTime<Utc>) -> Attemptability {
        let terminal_count = history.iter().filter(|a| a.is_terminal()).count() as u32;
        let remaining_attempts = quiz.max_attempts.saturating_sub(terminal_count);

        let availability =
            AvailabilityWindowEvaluator::evaluate(quiz.available_from, quiz.available_to, now);
        if availability.status != AvailabilityStatus::Active {
            return Attemptability {
                can_attempt: false,
                reason: Some("quiz not currently available".to_string()),
                remaining_attempts,
            };
        }

        if remaining_attempts == 0 {
            return Attemptability {
                can_attempt: false,
                reason: Some("maximum attempts reached".to_string()),
                remaining_attempts,
            };
        }

        Attemptability {
            can_attempt: true,
            reason: None,
            remaining_attempts,
        }
    }
}
