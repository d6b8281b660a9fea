use crate::analyzer::indicators::SeriesIndicators;
use crate::analyzer::trend::{detect_consecutive_trend, TrendDirection, TrendStrength};
use crate::model::{DailyPattern, Metric, SourceError};
use crate::source::MetricSource;
use crate::utils::weekday_name;
use chrono::{Days, NaiveDate};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

const FALLBACK_ENERGY: [f64; 7] = [72.0, 78.0, 65.0, 80.0, 85.0, 90.0, 76.0];
const FALLBACK_FOCUS: [f64; 7] = [68.0, 70.0, 63.0, 75.0, 81.0, 88.0, 70.0];
const FALLBACK_FULFILLMENT: [f64; 7] = [75.0, 80.0, 70.0, 82.0, 88.0, 92.0, 78.0];

pub const FALLBACK_NARRATIVE: &str = "Your energy and focus build through the week and ease off after the peak. \
    Plan demanding work for your strongest days and leave room to recover afterwards.";

const NO_TREND_NARRATIVE: &str = "No sustained trends this week. Your metrics are moving day to day.";

const HIGH_FULFILLMENT: i64 = 75;
const STEADY_FULFILLMENT: i64 = 60;

/// Whether a report was computed from the user's own check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Averages {
    pub energy: i64,
    pub focus: i64,
    pub fulfillment: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrend {
    pub direction: TrendDirection,
    pub change: f64,
    pub consecutive_days: usize,
    pub trend_strength: TrendStrength,
    pub is_significant: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trends {
    pub energy: MetricTrend,
    pub focus: MetricTrend,
    pub fulfillment: MetricTrend,
}

impl Trends {
    pub fn get(&self, metric: Metric) -> &MetricTrend {
        match metric {
            Metric::Energy => &self.energy,
            Metric::Focus => &self.focus,
            Metric::Fulfillment => &self.fulfillment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignificantTrend {
    pub metric: Metric,
    pub direction: TrendDirection,
    pub consecutive_days: usize,
    pub strength: TrendStrength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub metrics: [Metric; 2],
    pub coefficient: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternReport {
    pub source: ReportSource,
    pub patterns: Vec<DailyPattern>,
    pub averages: Averages,
    pub trends: Trends,
    pub significant_trends: Vec<SignificantTrend>,
    pub correlations: Vec<Correlation>,
    pub insights: Vec<String>,
    pub narrative: String,
}

/// The fixed example week used when no usable user data is available.
/// Dates are the seven days ending at `today`.
pub fn fallback_patterns(today: NaiveDate) -> Vec<DailyPattern> {
    let len = FALLBACK_ENERGY.len();
    (0..len)
        .map(|i| DailyPattern {
            date: today
                .checked_sub_days(Days::new((len - 1 - i) as u64))
                .unwrap_or(today),
            energy: FALLBACK_ENERGY[i],
            focus: FALLBACK_FOCUS[i],
            fulfillment: FALLBACK_FULFILLMENT[i],
        })
        .collect()
}

fn metric_trend(series: &[f64]) -> MetricTrend {
    let analysis = detect_consecutive_trend(series);
    MetricTrend {
        direction: analysis.direction,
        change: SeriesIndicators::change(series),
        consecutive_days: analysis.consecutive_days,
        trend_strength: analysis.strength,
        is_significant: analysis.is_significant,
    }
}

/// Assembles a report from chronologically ordered patterns. Pure.
pub fn build_report(patterns: Vec<DailyPattern>, source: ReportSource) -> PatternReport {
    let energy = Metric::Energy.series(&patterns);
    let focus = Metric::Focus.series(&patterns);
    let fulfillment = Metric::Fulfillment.series(&patterns);

    let averages = Averages {
        energy: SeriesIndicators::rounded_average(&energy),
        focus: SeriesIndicators::rounded_average(&focus),
        fulfillment: SeriesIndicators::rounded_average(&fulfillment),
    };

    let trends = Trends {
        energy: metric_trend(&energy),
        focus: metric_trend(&focus),
        fulfillment: metric_trend(&fulfillment),
    };

    let significant_trends: Vec<SignificantTrend> = Metric::ALL
        .iter()
        .filter_map(|&metric| {
            let trend = trends.get(metric);
            trend.is_significant.then(|| SignificantTrend {
                metric,
                direction: trend.direction,
                consecutive_days: trend.consecutive_days,
                strength: trend.trend_strength,
            })
        })
        .collect();

    let correlations = [
        [Metric::Energy, Metric::Focus],
        [Metric::Energy, Metric::Fulfillment],
        [Metric::Focus, Metric::Fulfillment],
    ]
    .into_iter()
    .map(|[a, b]| Correlation {
        metrics: [a, b],
        coefficient: SeriesIndicators::correlation(&a.series(&patterns), &b.series(&patterns)),
    })
    .collect();

    let insights = build_insights(&patterns, &averages);
    let narrative = match source {
        ReportSource::Fallback => FALLBACK_NARRATIVE.to_string(),
        ReportSource::Live => build_narrative(&significant_trends),
    };

    PatternReport {
        source,
        patterns,
        averages,
        trends,
        significant_trends,
        correlations,
        insights,
        narrative,
    }
}

fn build_insights(patterns: &[DailyPattern], averages: &Averages) -> Vec<String> {
    let mut insights = Vec::new();

    // Ties resolve to the earliest day.
    let peak_energy = patterns.iter().reduce(|best, p| if p.energy > best.energy { p } else { best });
    if let Some(day) = peak_energy {
        insights.push(format!("Your energy peaks on {}.", weekday_name(day.date)));
    }

    let low_focus = patterns.iter().reduce(|best, p| if p.focus < best.focus { p } else { best });
    if let Some(day) = low_focus {
        insights.push(format!("Your focus dips lowest on {}.", weekday_name(day.date)));
    }

    let fulfillment = averages.fulfillment;
    let level = if fulfillment >= HIGH_FULFILLMENT {
        format!("Fulfillment is running high at {}/100. Keep protecting what's working.", fulfillment)
    } else if fulfillment >= STEADY_FULFILLMENT {
        format!("Fulfillment is steady at {}/100. Small wins could lift it further.", fulfillment)
    } else {
        format!("Fulfillment is low at {}/100. Consider revisiting what matters most to you.", fulfillment)
    };
    insights.push(level);

    insights
}

fn build_narrative(significant: &[SignificantTrend]) -> String {
    if significant.is_empty() {
        return NO_TREND_NARRATIVE.to_string();
    }
    significant
        .iter()
        .map(|t| {
            format!(
                "{} has been {} for {} consecutive days ({} trend).",
                t.metric.label(),
                t.direction.as_str(),
                t.consecutive_days,
                t.strength.as_str()
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate(patterns: &[DailyPattern]) -> Result<(), SourceError> {
    for pattern in patterns {
        for metric in Metric::ALL {
            if !metric.value(pattern).is_finite() {
                return Err(SourceError::InvalidSample { date: pattern.date, metric });
            }
        }
    }
    Ok(())
}

/// Fetches a user's recent week and turns it into a pattern report,
/// degrading to the fallback week whenever real data is missing or unusable.
pub struct PatternAggregator {
    source: Arc<dyn MetricSource>,
    window_days: usize,
}

impl PatternAggregator {
    pub fn new(source: Arc<dyn MetricSource>, window_days: usize) -> Self {
        Self { source, window_days }
    }

    pub async fn report_for(&self, user_id: Option<&str>, today: NaiveDate) -> PatternReport {
        let Some(user_id) = user_id else {
            warn!("No user identity on request, serving fallback patterns");
            return build_report(fallback_patterns(today), ReportSource::Fallback);
        };

        // A panic in the source or the report builder must not reach the caller.
        match AssertUnwindSafe(self.user_report(user_id, today)).catch_unwind().await {
            Ok(report) => report,
            Err(_) => {
                error!("Pattern aggregation panicked for {}, serving fallback patterns", user_id);
                build_report(fallback_patterns(today), ReportSource::Fallback)
            }
        }
    }

    async fn user_report(&self, user_id: &str, today: NaiveDate) -> PatternReport {
        match self.fetch(user_id).await {
            Ok(patterns) if !patterns.is_empty() => {
                info!("Building pattern report for {} from {} days", user_id, patterns.len());
                build_report(patterns, ReportSource::Live)
            }
            Ok(_) => {
                info!("No check-ins for {}, serving fallback patterns", user_id);
                build_report(fallback_patterns(today), ReportSource::Fallback)
            }
            Err(e) => {
                warn!("Pattern retrieval failed for {}: {}. Serving fallback patterns", user_id, e);
                build_report(fallback_patterns(today), ReportSource::Fallback)
            }
        }
    }

    async fn fetch(&self, user_id: &str) -> Result<Vec<DailyPattern>, SourceError> {
        let patterns = self.source.recent_patterns(user_id, self.window_days).await?;
        validate(&patterns)?;
        Ok(patterns)
    }
}
