// Generates a plausible history of daily check-ins for demos and local testing.
use crate::model::DailyPattern;
use chrono::{Days, NaiveDate};
use rand::Rng;

const START_RANGE: std::ops::RangeInclusive<i32> = 55..=85;
const DAILY_STEP: std::ops::RangeInclusive<i32> = -8..=8;

/// Random walk of `days` consecutive check-ins ending at `end`, oldest first.
pub fn generate_checkins<R: Rng>(rng: &mut R, end: NaiveDate, days: usize) -> Vec<DailyPattern> {
    let mut energy = rng.random_range(START_RANGE);
    let mut focus = rng.random_range(START_RANGE);
    let mut fulfillment = rng.random_range(START_RANGE);

    let mut checkins = Vec::with_capacity(days);
    for offset in (0..days).rev() {
        let Some(date) = end.checked_sub_days(Days::new(offset as u64)) else {
            continue;
        };
        checkins.push(DailyPattern {
            date,
            energy: energy as f64,
            focus: focus as f64,
            fulfillment: fulfillment as f64,
        });
        energy = step(rng, energy);
        focus = step(rng, focus);
        fulfillment = step(rng, fulfillment);
    }
    checkins
}

fn step<R: Rng>(rng: &mut R, value: i32) -> i32 {
    (value + rng.random_range(DAILY_STEP)).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generates_consecutive_days_ending_at_end() {
        let end = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let checkins = generate_checkins(&mut rng, end, 14);

        assert_eq!(checkins.len(), 14);
        assert_eq!(checkins.last().unwrap().date, end);
        for pair in checkins.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }

    #[test]
    fn values_stay_in_range_and_move_gradually() {
        let end = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let checkins = generate_checkins(&mut rng, end, 200);

        for p in &checkins {
            for v in [p.energy, p.focus, p.fulfillment] {
                assert!((0.0..=100.0).contains(&v));
                assert_eq!(v.fract(), 0.0);
            }
        }
        for pair in checkins.windows(2) {
            assert!((pair[1].energy - pair[0].energy).abs() <= 8.0);
        }
    }

    #[test]
    fn same_seed_same_history() {
        let end = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let a = generate_checkins(&mut StdRng::seed_from_u64(3), end, 7);
        let b = generate_checkins(&mut StdRng::seed_from_u64(3), end, 7);
        assert_eq!(a, b);
    }
}
