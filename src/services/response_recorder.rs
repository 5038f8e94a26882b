use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::AppResult;
use crate::models::domain::QuizResponse;
use crate::repositories::QuizResponseRepository;

/// Per-attempt write-behind cache over the response repository. The locally
/// held selections are the authority at submission time; repository upserts
/// are best-effort replication and never block the student.
pub struct ResponseRecorder {
    attempt_id: String,
    repository: Arc<dyn QuizResponseRepository>,
    selections: RwLock<BTreeMap<String, Vec<String>>>,
    sealed: AtomicBool,
}

impl ResponseRecorder {
    pub fn new(attempt_id: String, repository: Arc<dyn QuizResponseRepository>) -> Self {
        Self {
            attempt_id,
            repository,
            selections: RwLock::new(BTreeMap::new()),
            sealed: AtomicBool::new(false),
        }
    }

    pub fn attempt_id(&self) -> &str {
        &self.attempt_id
    }

    /// Loads previously stored responses into the cache, for resumed
    /// attempts. Selections already held locally win over stored ones.
    pub async fn hydrate(&self) -> AppResult<()> {
        let stored = self.repository.list_by_attempt(&self.attempt_id).await?;
        let mut selections = self.selections.write().await;
        for row in stored {
            selections.entry(row.question_id).or_insert(row.selected_keys);
        }
        Ok(())
    }

    /// Replaces the selection for one question. The caller supplies the full
    /// new key set (toggling for multi-select happens upstream), which keeps
    /// this idempotent and safe to retry. A failed repository write is
    /// logged and swallowed; the local copy remains authoritative.
    pub async fn record(&self, question_id: &str, selected_keys: Vec<String>) {
        if self.is_sealed() {
            log::debug!(
                "ignoring stale response write for attempt {} question {}",
                self.attempt_id,
                question_id
            );
            return;
        }

        {
            let mut selections = self.selections.write().await;
            selections.insert(question_id.to_string(), selected_keys.clone());
        }

        let response = QuizResponse::new(&self.attempt_id, question_id, selected_keys);
        if let Err(err) = self.repository.upsert(response).await {
            log::warn!(
                "response write failed for attempt {} question {}: {}; local copy retained",
                self.attempt_id,
                question_id,
                err
            );
        }
    }

    /// The authoritative response set for submission.
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<String>> {
        self.selections.read().await.clone()
    }

    /// Marks the attempt terminal; later `record` calls become no-ops.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }
}

/// Toggle-on-click helper for multi-select views: returns the selection with
/// `key` removed if present, appended otherwise.
pub fn toggle_key(selection: &[String], key: &str) -> Vec<String> {
    if selection.iter().any(|k| k == key) {
        selection.iter().filter(|k| *k != key).cloned().collect()
    } else {
        let mut next = selection.to_vec();
        next.push(key.to_string());
        next
    }
}
