// Utility functions
use chrono::NaiveDate;

/// Full English weekday name, e.g. "Friday".
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Rounds to two decimal places.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(weekday_name(date), "Friday");
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_hundredths(0.96774), 0.97);
        assert_eq!(round_to_hundredths(-0.123), -0.12);
    }
}
