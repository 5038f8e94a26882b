use chrono::{DateTime, Utc};

use crate::models::domain::{Quiz, QuizAttempt};

/// Displayed countdown enters the warning band at five minutes remaining.
pub const WARNING_THRESHOLD_SECONDS: i64 = 300;
/// Critical band at one minute remaining.
pub const CRITICAL_THRESHOLD_SECONDS: i64 = 60;
/// Buffer past the nominal deadline before the attempt is force-closed.
/// Absorbs end-of-timer submission latency; not shown in the countdown.
pub const SUBMISSION_GRACE_SECONDS: i64 = 300;

/// Snapshot of the countdown at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemainingTime {
    /// Display seconds, clamped at 0. None means the attempt is untimed.
    pub seconds: Option<i64>,
    pub is_warning: bool,
    pub is_critical: bool,
    pub is_expired: bool,
}

impl RemainingTime {
    pub fn inert() -> Self {
        RemainingTime {
            seconds: None,
            is_warning: false,
            is_critical: false,
            is_expired: false,
        }
    }
}

/// Pure countdown derived from the attempt start and the quiz time limit.
/// With no time limit the clock is inert and never expires.
#[derive(Clone, Copy, Debug)]
pub struct DeadlineClock {
    started_at: DateTime<Utc>,
    time_limit_minutes: Option<u32>,
}

impl DeadlineClock {
    pub fn new(started_at: DateTime<Utc>, time_limit_minutes: Option<u32>) -> Self {
        Self {
            started_at,
            time_limit_minutes,
        }
    }

    pub fn for_attempt(attempt: &QuizAttempt, quiz: &Quiz) -> Self {
        Self::new(attempt.started_at, quiz.time_limit_minutes)
    }

    pub fn is_inert(&self) -> bool {
        self.time_limit_minutes.is_none()
    }

    pub fn status(&self, now: DateTime<Utc>) -> RemainingTime {
        let Some(limit_minutes) = self.time_limit_minutes else {
            return RemainingTime::inert();
        };

        let limit_seconds = i64::from(limit_minutes) * 60;
        let elapsed = (now - self.started_at).num_seconds();
        let remaining = limit_seconds - elapsed;

        RemainingTime {
            seconds: Some(remaining.max(0)),
            is_warning: remaining <= WARNING_THRESHOLD_SECONDS,
            is_critical: remaining <= CRITICAL_THRESHOLD_SECONDS,
            is_expired: elapsed >= limit_seconds + SUBMISSION_GRACE_SECONDS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeadlineEvent {
    Warning,
    Critical,
    Expired,
}

/// Latches each threshold on first observation so its notification fires
/// exactly once per attempt, however often the clock is polled.
#[derive(Debug, Default)]
pub struct ThresholdLatch {
    warned: bool,
    critical: bool,
    expired: bool,
}

impl ThresholdLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events newly crossed by this observation, in severity
    /// order.
    pub fn observe(&mut self, status: RemainingTime) -> Vec<DeadlineEvent> {
        let mut events = Vec::new();

        if status.is_warning && !self.warned {
            self.warned = true;
            events.push(DeadlineEvent::Warning);
        }
        if status.is_critical && !self.critical {
            self.critical = true;
            events.push(DeadlineEvent::Critical);
        }
        if status.is_expired && !self.expired {
            self.expired = true;
            events.push(DeadlineEvent::Expired);
        }

        events
    }
}
