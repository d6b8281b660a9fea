use serde::Serialize;

/// Day-over-day moves smaller than this are treated as noise.
pub const NOISE_THRESHOLD: f64 = 0.5;

/// Runs at least this long are reported as significant.
pub const SIGNIFICANT_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    /// Classifies a single step `current - previous`.
    fn classify(diff: f64) -> Self {
        if diff.abs() < NOISE_THRESHOLD {
            TrendDirection::Flat
        } else if diff > 0.0 {
            TrendDirection::Rising
        } else {
            TrendDirection::Falling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
}

impl TrendStrength {
    pub fn from_run(consecutive_days: usize) -> Self {
        match consecutive_days {
            0..=2 => TrendStrength::Weak,
            3..=4 => TrendStrength::Moderate,
            _ => TrendStrength::Strong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendStrength::Weak => "weak",
            TrendStrength::Moderate => "moderate",
            TrendStrength::Strong => "strong",
        }
    }
}

/// The unbroken run of same-direction steps ending at the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub consecutive_days: usize,
    pub strength: TrendStrength,
    pub is_significant: bool,
}

impl TrendAnalysis {
    pub fn flat() -> Self {
        Self::from_run(TrendDirection::Flat, 0)
    }

    fn from_run(direction: TrendDirection, consecutive_days: usize) -> Self {
        Self {
            direction,
            consecutive_days,
            strength: TrendStrength::from_run(consecutive_days),
            is_significant: consecutive_days >= SIGNIFICANT_RUN,
        }
    }
}

/// Detects the directional streak ending at the most recent value.
///
/// The direction is pinned by the last step alone. A flat last step yields a
/// flat, zero-length result even when an earlier run exists, and the run stops
/// at the first step (scanning backward) that classifies differently.
pub fn detect_consecutive_trend(values: &[f64]) -> TrendAnalysis {
    if values.len() < 2 {
        return TrendAnalysis::flat();
    }

    let mut steps = values
        .windows(2)
        .rev()
        .map(|w| TrendDirection::classify(w[1] - w[0]));

    let direction = match steps.next() {
        Some(TrendDirection::Flat) | None => return TrendAnalysis::flat(),
        Some(direction) => direction,
    };

    let consecutive_days = 1 + steps.take_while(|step| *step == direction).count();
    TrendAnalysis::from_run(direction, consecutive_days)
}
