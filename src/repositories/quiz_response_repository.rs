use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    config::Config, db::Database, errors::AppResult, models::domain::QuizResponse,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizResponseRepository: Send + Sync {
    /// Replaces the stored selection for (attempt, question), inserting the
    /// row if it does not exist yet. Last write wins per question.
    async fn upsert(&self, response: QuizResponse) -> AppResult<()>;
    async fn list_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<QuizResponse>>;
}

pub struct MongoQuizResponseRepository {
    collection: Collection<QuizResponse>,
}

impl MongoQuizResponseRepository {
    pub fn new(db: &Database, config: &Config) -> Self {
        let collection = db.get_collection(&config.responses_collection);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_responses collection");

        let attempt_question_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("attempt_question_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(attempt_question_index).await?;

        Ok(())
    }
}

#[async_trait]
impl QuizResponseRepository for MongoQuizResponseRepository {
    async fn upsert(&self, response: QuizResponse) -> AppResult<()> {
        let selected: Vec<&str> = response.selected_keys.iter().map(String::as_str).collect();

        self.collection
            .update_one(
                doc! {
                    "attempt_id": &response.attempt_id,
                    "question_id": &response.question_id
                },
                doc! {
                    "$set": {
                        "selected_keys": selected,
                        "recorded_at": response.recorded_at.to_rfc3339(),
                    }
                },
            )
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn list_by_attempt(&self, attempt_id: &str) -> AppResult<Vec<QuizResponse>> {
        let responses = self
            .collection
            .find(doc! { "attempt_id": attempt_id })
            .await?
            .try_collect()
            .await?;
        Ok(responses)
    }
}
