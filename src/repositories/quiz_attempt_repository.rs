use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    models::domain::{AttemptStatus, QuizAttempt},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Inserts a new attempt. Returns `AppError::AlreadyExists` when the
    /// student already has an open attempt for the quiz (unique-index
    /// rejection); the caller resolves that by resuming the existing one.
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    async fn find_in_progress(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>>;
    async fn list_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>>;
    /// Atomically moves an in-progress attempt to a terminal status.
    /// Returns false when the attempt was no longer in progress, in which
    /// case nothing was written.
    async fn mark_terminal(
        &self,
        id: &str,
        status: AttemptStatus,
        score: f64,
        passed: Option<bool>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<bool>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.attempts_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // At most one in-progress attempt per (student, quiz). Concurrent
        // start calls race on this index; the loser gets a duplicate-key
        // error and resumes the winner's attempt.
        let open_attempt_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "quiz_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "status": "in_progress" })
                    .name("one_open_attempt_per_student_quiz".to_string())
                    .build(),
            )
            .build();

        let student_quiz_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "quiz_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_quiz_attempt_number".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(open_attempt_index).await?;
        self.collection.create_index(student_quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn find_in_progress(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "quiz_id": quiz_id,
                "status": "in_progress"
            })
            .await?;
        Ok(attempt)
    }

    async fn list_by_student_and_quiz(
        &self,
        student_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! {
                "student_id": student_id,
                "quiz_id": quiz_id
            })
            .sort(doc! { "attempt_number": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn mark_terminal(
        &self,
        id: &str,
        status: AttemptStatus,
        score: f64,
        passed: Option<bool>,
        submitted_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let passed_bson = match passed {
            Some(p) => Bson::Boolean(p),
            None => Bson::Null,
        };

        // Filtering on in_progress makes the terminal transition a
        // compare-and-set: the second of two racing submitters matches
        // nothing and modifies nothing.
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "status": "in_progress" },
                doc! {
                    "$set": {
                        "status": status.as_str(),
                        "score": score,
                        "passed": passed_bson,
                        // Stored the same way serde writes it on insert.
                        "submitted_at": submitted_at.to_rfc3339(),
                    }
                },
            )
            .await?;

        Ok(result.modified_count == 1)
    }
}
