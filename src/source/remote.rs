use crate::model::{DailyPattern, SourceError};
use crate::source::MetricSource;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const CHECKINS_PATH: &str = "rest/v1/daily_checkins";

/// Reads check-ins from a PostgREST-style table over HTTP.
pub struct RemoteSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteSource {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(concat!("wisdom-insights/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn build_url(&self) -> String {
        format!("{}/{}", self.base_url, CHECKINS_PATH)
    }
}

#[async_trait::async_trait]
impl MetricSource for RemoteSource {
    async fn recent_patterns(&self, user_id: &str, days: usize) -> Result<Vec<DailyPattern>, SourceError> {
        let url = self.build_url();
        debug!("Fetching {} check-ins for {} from {}", days, user_id, url);

        let mut request = self.client.get(&url).query(&[
            ("select", "date,energy,focus,fulfillment".to_string()),
            ("user_id", format!("eq.{}", user_id)),
            ("order", "date.desc".to_string()),
            ("limit", days.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let mut patterns: Vec<DailyPattern> = response.json().await?;
        patterns.reverse();
        Ok(patterns)
    }
}
