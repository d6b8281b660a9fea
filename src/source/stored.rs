use crate::model::{DailyPattern, SourceError};
use crate::source::MetricSource;
use crate::storage::SqliteStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reads check-ins from the local SQLite store.
pub struct StoredSource {
    storage: Arc<Mutex<SqliteStorage>>,
}

impl StoredSource {
    pub fn new(storage: Arc<Mutex<SqliteStorage>>) -> Self {
        Self { storage }
    }
}

#[async_trait::async_trait]
impl MetricSource for StoredSource {
    async fn recent_patterns(&self, user_id: &str, days: usize) -> Result<Vec<DailyPattern>, SourceError> {
        let patterns = self.storage.lock().await.recent_patterns(user_id, days)?;
        Ok(patterns)
    }
}
