use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::models::domain::{Quiz, QuizAttempt};
use crate::services::deadline_clock::{DeadlineClock, RemainingTime};
use crate::services::response_recorder::ResponseRecorder;

/// Handle on one open attempt, passed between the lifecycle manager and its
/// caller. Owns the recorder, the countdown clock, and the slot for the
/// ticker task. There is no ambient state: everything the view needs travels
/// through this value.
pub struct AttemptSession {
    quiz: Quiz,
    attempt: QuizAttempt,
    recorder: Arc<ResponseRecorder>,
    clock: DeadlineClock,
    ticker_handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl AttemptSession {
    pub(crate) fn new(quiz: Quiz, attempt: QuizAttempt, recorder: Arc<ResponseRecorder>) -> Self {
        let clock = DeadlineClock::for_attempt(&attempt, &quiz);
        Self {
            quiz,
            attempt,
            recorder,
            clock,
            ticker_handle: Arc::new(RwLock::new(None)),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn attempt(&self) -> &QuizAttempt {
        &self.attempt
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt.id
    }

    pub fn recorder(&self) -> &Arc<ResponseRecorder> {
        &self.recorder
    }

    pub fn clock(&self) -> DeadlineClock {
        self.clock
    }

    pub fn remaining_time(&self, now: DateTime<Utc>) -> RemainingTime {
        self.clock.status(now)
    }

    /// Records the full current selection for a question; best-effort, never
    /// fails the caller. No-op once the attempt is terminal.
    pub async fn record(&self, question_id: &str, selected_keys: Vec<String>) {
        self.recorder.record(question_id, selected_keys).await;
    }

    pub(crate) async fn set_ticker(&self, handle: JoinHandle<()>) {
        let mut slot = self.ticker_handle.write().await;
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    /// Cancels the ticker task. Must be called when the attempt reaches a
    /// terminal state or the controlling view is torn down; the task also
    /// stops itself once the attempt is no longer in progress.
    pub async fn stop_ticker(&self) {
        let mut slot = self.ticker_handle.write().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    pub async fn has_ticker(&self) -> bool {
        self.ticker_handle.read().await.is_some()
    }
}
