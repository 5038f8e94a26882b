use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{AttemptStatus, Quiz, QuizAttempt};
use crate::repositories::{QuizAttemptRepository, QuizRepository, QuizResponseRepository};
use crate::services::attempt_policy::{AttemptPolicyEnforcer, Attemptability};
use crate::services::deadline_clock::{DeadlineEvent, ThresholdLatch};
use crate::services::response_recorder::ResponseRecorder;
use crate::services::scoring::ScoringEngine;
use crate::services::session::AttemptSession;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Orchestrates the attempt state machine. Sole writer of attempt status:
/// every path out of `in_progress` funnels through `finalize`, guarded so
/// that racing manual and timeout submissions apply exactly one transition.
pub struct AttemptLifecycleManager {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    responses: Arc<dyn QuizResponseRepository>,
    /// Attempt ids with a submission currently in flight.
    in_flight: Mutex<HashSet<String>>,
}

impl AttemptLifecycleManager {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        responses: Arc<dyn QuizResponseRepository>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            responses,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Resumes the student's open attempt for the quiz if one exists,
    /// otherwise starts a new one subject to policy. Concurrent starts for
    /// the same pair are serialized by the repository's uniqueness
    /// constraint; the loser resumes the winner's attempt.
    pub async fn start_or_resume(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<AttemptSession> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        if let Some(open) = self.attempts.find_in_progress(student_id, quiz_id).await? {
            log::info!(
                "resuming attempt {} (number {}) for student {} on quiz {}",
                open.id,
                open.attempt_number,
                student_id,
                quiz_id
            );
            return self.open_session(quiz, open, true).await;
        }

        let history = self
            .attempts
            .list_by_student_and_quiz(student_id, quiz_id)
            .await?;
        let verdict = AttemptPolicyEnforcer::evaluate(&quiz, &history, Utc::now());
        if !verdict.can_attempt {
            let reason = verdict
                .reason
                .unwrap_or_else(|| "attempt not permitted".to_string());
            return Err(AppError::PolicyViolation(reason));
        }

        let terminal_count = history.iter().filter(|a| a.is_terminal()).count() as i32;
        let attempt = QuizAttempt::start(student_id, quiz_id, terminal_count + 1);

        match self.attempts.create(attempt).await {
            Ok(created) => {
                log::info!(
                    "started attempt {} (number {}) for student {} on quiz {}",
                    created.id,
                    created.attempt_number,
                    student_id,
                    quiz_id
                );
                self.open_session(quiz, created, false).await
            }
            Err(AppError::AlreadyExists(_)) => {
                // Lost a concurrent start race; the winner's attempt is the
                // one to resume.
                let open = self
                    .attempts
                    .find_in_progress(student_id, quiz_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::InternalError(format!(
                            "open attempt for student '{}' on quiz '{}' vanished after create conflict",
                            student_id, quiz_id
                        ))
                    })?;
                log::info!(
                    "start race lost for student {} on quiz {}; resuming attempt {}",
                    student_id,
                    quiz_id,
                    open.id
                );
                self.open_session(quiz, open, true).await
            }
            Err(err) => Err(err),
        }
    }

    async fn open_session(
        &self,
        quiz: Quiz,
        attempt: QuizAttempt,
        resumed: bool,
    ) -> AppResult<AttemptSession> {
        let recorder = Arc::new(ResponseRecorder::new(
            attempt.id.clone(),
            Arc::clone(&self.responses),
        ));
        if resumed {
            recorder.hydrate().await?;
        }
        Ok(AttemptSession::new(quiz, attempt, recorder))
    }

    /// Spawns the 1-second ticker for a timed session and returns the
    /// channel its threshold events arrive on. For untimed quizzes nothing
    /// is spawned and the channel stays silent. The task needs no UI: it
    /// keeps the attempt id and recorder, so auto-submit still lands after
    /// the view is gone. Cancel via `session.stop_ticker()`; the task also
    /// ends itself once the attempt is terminal.
    pub async fn attach_clock(
        self: &Arc<Self>,
        session: &AttemptSession,
    ) -> mpsc::UnboundedReceiver<DeadlineEvent> {
        let (events, receiver) = mpsc::unbounded_channel();

        let clock = session.clock();
        if clock.is_inert() {
            return receiver;
        }

        let manager = Arc::clone(self);
        let recorder = Arc::clone(session.recorder());
        let attempt_id = session.attempt_id().to_string();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            let mut latch = ThresholdLatch::new();

            loop {
                interval.tick().await;

                if recorder.is_sealed() {
                    break;
                }

                let status = clock.status(Utc::now());
                for event in latch.observe(status) {
                    let _ = events.send(event);
                }

                if status.is_expired {
                    match manager.auto_submit(&attempt_id, &recorder).await {
                        Ok(_) => break,
                        Err(err) if err.is_benign_race() => break,
                        Err(err) => {
                            // Retried on the next tick; the expiry is never
                            // silently abandoned.
                            log::warn!(
                                "auto-submit failed for attempt {}: {}; retrying",
                                attempt_id,
                                err
                            );
                        }
                    }
                }
            }
        });

        session.set_ticker(handle).await;
        receiver
    }

    /// Manual submission. On success the attempt is `completed` and the
    /// session's ticker is stopped. A failure leaves the attempt in
    /// progress with all locally held responses intact, so the caller can
    /// retry without data loss.
    pub async fn submit(&self, session: &AttemptSession) -> AppResult<QuizAttempt> {
        let attempt = self
            .finalize(
                session.attempt_id(),
                AttemptStatus::Completed,
                session.recorder(),
            )
            .await?;
        session.stop_ticker().await;
        Ok(attempt)
    }

    /// Timeout submission, triggered only by the deadline ticker. Identical
    /// to manual submit except the terminal status is `timeout`.
    pub async fn auto_submit(
        &self,
        attempt_id: &str,
        recorder: &ResponseRecorder,
    ) -> AppResult<QuizAttempt> {
        self.finalize(attempt_id, AttemptStatus::Timeout, recorder)
            .await
    }

    /// Read-only view for list pages: whether a new attempt may start and
    /// how many slots remain.
    pub async fn attemptability(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Attemptability> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;
        let history = self
            .attempts
            .list_by_student_and_quiz(student_id, quiz_id)
            .await?;
        Ok(AttemptPolicyEnforcer::evaluate(&quiz, &history, Utc::now()))
    }

    async fn finalize(
        &self,
        attempt_id: &str,
        outcome: AttemptStatus,
        recorder: &ResponseRecorder,
    ) -> AppResult<QuizAttempt> {
        debug_assert!(outcome.is_terminal());

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(attempt_id.to_string()) {
                return Err(AppError::ConcurrentSubmission(attempt_id.to_string()));
            }
        }

        let result = self.finalize_guarded(attempt_id, outcome, recorder).await;

        self.in_flight.lock().await.remove(attempt_id);
        result
    }

    async fn finalize_guarded(
        &self,
        attempt_id: &str,
        outcome: AttemptStatus,
        recorder: &ResponseRecorder,
    ) -> AppResult<QuizAttempt> {
        let attempt = self
            .attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;

        if attempt.is_terminal() {
            // Double submission; idempotent no-op.
            recorder.seal();
            return Ok(attempt);
        }

        let quiz = self
            .quizzes
            .find_by_id(&attempt.quiz_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz with id '{}' not found", attempt.quiz_id))
            })?;

        let responses = recorder.snapshot().await;
        let summary = ScoringEngine::score(&quiz, &responses);
        let submitted_at = Utc::now();

        let applied = self
            .attempts
            .mark_terminal(
                attempt_id,
                outcome,
                summary.raw_score,
                summary.passed,
                submitted_at,
            )
            .await?;

        if !applied {
            // The other submit path won between our read and the
            // compare-and-set; return whatever it stored.
            let current = self.attempts.find_by_id(attempt_id).await?.ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })?;
            recorder.seal();
            return Ok(current);
        }

        recorder.seal();
        log::info!(
            "attempt {} finalized as {} with score {} ({}%)",
            attempt_id,
            outcome.as_str(),
            summary.raw_score,
            summary.percentage
        );

        Ok(QuizAttempt {
            status: outcome,
            submitted_at: Some(submitted_at),
            score: Some(summary.raw_score),
            passed: summary.passed,
            ..attempt
        })
    }
}
