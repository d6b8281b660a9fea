use crate::model::{DailyPattern, SourceError};

/// Where daily check-ins come from.
#[async_trait::async_trait]
pub trait MetricSource: Send + Sync {
    /// Returns at most `days` of the user's most recent check-ins, oldest first.
    async fn recent_patterns(&self, user_id: &str, days: usize) -> Result<Vec<DailyPattern>, SourceError>;
}
