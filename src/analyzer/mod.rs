// Analyzer module: streak detection, series statistics, and the pattern report built on them.

pub mod trend;
pub mod indicators;
pub mod patterns;

pub use patterns::{build_report, fallback_patterns, PatternAggregator, PatternReport, ReportSource};
pub use trend::{detect_consecutive_trend, TrendAnalysis, TrendDirection, TrendStrength};
