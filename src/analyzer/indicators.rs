use crate::utils::round_to_hundredths;

/// Simple statistics over a single metric series.
pub struct SeriesIndicators;

impl SeriesIndicators {
    /// Arithmetic mean, 0.0 for an empty series.
    pub fn average(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Mean rounded to the nearest whole point.
    pub fn rounded_average(values: &[f64]) -> i64 {
        Self::average(values).round() as i64
    }

    /// Net movement over the window: `last - first`.
    pub fn change(values: &[f64]) -> f64 {
        match (values.first(), values.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Pearson correlation coefficient, rounded to two decimals.
    /// Returns None if slices have different lengths, are empty, or either has zero variance.
    pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
        if x.len() != y.len() || x.is_empty() {
            return None;
        }
        let mean_x = Self::average(x);
        let mean_y = Self::average(y);
        let numerator: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| (xi - mean_x) * (yi - mean_y)).sum();
        let denominator_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
        let denominator_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
        let denominator = (denominator_x * denominator_y).sqrt();
        if denominator == 0.0 {
            None
        } else {
            Some(round_to_hundredths(numerator / denominator))
        }
    }
}
