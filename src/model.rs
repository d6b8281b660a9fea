// Core structs: DailyPattern, Metric, and the error types shared by sources and storage
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One day of self-reported metrics for a user, each on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPattern {
    pub date: NaiveDate,
    pub energy: f64,
    pub focus: f64,
    pub fulfillment: f64,
}

/// The tracked metrics, in the order they are checked everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Energy,
    Focus,
    Fulfillment,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Energy, Metric::Focus, Metric::Fulfillment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Energy => "energy",
            Metric::Focus => "focus",
            Metric::Fulfillment => "fulfillment",
        }
    }

    /// Capitalized name for sentences.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Energy => "Energy",
            Metric::Focus => "Focus",
            Metric::Fulfillment => "Fulfillment",
        }
    }

    pub fn value(&self, pattern: &DailyPattern) -> f64 {
        match self {
            Metric::Energy => pattern.energy,
            Metric::Focus => pattern.focus,
            Metric::Fulfillment => pattern.fulfillment,
        }
    }

    /// Extracts this metric's series from chronologically ordered patterns.
    pub fn series(&self, patterns: &[DailyPattern]) -> Vec<f64> {
        patterns.iter().map(|p| self.value(p)).collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("non-finite {metric} value on {date}")]
    InvalidSample { date: NaiveDate, metric: Metric },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
