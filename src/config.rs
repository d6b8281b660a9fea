use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    #[default]
    Sqlite,
    Remote {
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_window_days")]
    pub window_days: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub source: SourceConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_database_path() -> String {
    "data.db".to_string()
}

fn default_window_days() -> usize {
    7
}

fn default_request_timeout_seconds() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: default_database_path(),
            window_days: default_window_days(),
            request_timeout_seconds: default_request_timeout_seconds(),
            source: SourceConfig::default(),
        }
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config: AppConfig = serde_json::from_str(content)?;
    if config.window_days < 2 {
        return Err(format!("window_days must be at least 2, got {}", config.window_days).into());
    }
    Ok(config)
}
