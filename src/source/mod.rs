// Metric sources: the local check-in store or a remote REST table.

pub mod traits;
pub mod stored;
pub mod remote;

pub use remote::RemoteSource;
pub use stored::StoredSource;
pub use traits::MetricSource;

use crate::config::{AppConfig, SourceConfig};
use crate::model::SourceError;
use crate::storage::SqliteStorage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Builds the source selected in the configuration.
/// The SQLite store is only opened when it backs the source.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn MetricSource>, SourceError> {
    let source: Arc<dyn MetricSource> = match &config.source {
        SourceConfig::Sqlite => {
            let storage = SqliteStorage::new(&config.database_path)?;
            Arc::new(StoredSource::new(Arc::new(Mutex::new(storage))))
        }
        SourceConfig::Remote { base_url, api_key } => Arc::new(RemoteSource::new(
            base_url,
            api_key.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )?),
    };
    Ok(source)
}
