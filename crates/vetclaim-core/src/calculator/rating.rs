//! VA combined rating ("whole person") calculation.
//!
//! Ratings are not added. Each disability removes a share of whatever
//! efficiency the previous ones left, largest first, and the remainder is
//! subtracted from 100.

use serde::{Deserialize, Serialize};

use crate::models::Disability;

/// Combined rating before and after rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CombinedRating {
    /// Exact combined value, 0.0..=100.0
    pub raw: f64,
    /// `raw` rounded to the nearest ten
    pub rounded: u8,
}

/// Combine individual percentages into the raw (unrounded) combined value.
///
/// Zero ratings are skipped; ratings above 100 are treated as 100.
pub fn combine<I>(ratings: I) -> f64
where
    I: IntoIterator<Item = u8>,
{
    let mut active: Vec<u8> = ratings
        .into_iter()
        .filter(|&r| r > 0)
        .map(|r| r.min(100))
        .collect();
    if active.is_empty() {
        return 0.0;
    }
    active.sort_unstable_by(|a, b| b.cmp(a));

    let mut remaining_efficiency = 100.0_f64;
    for rating in active {
        remaining_efficiency *= 1.0 - f64::from(rating) / 100.0;
    }
    100.0 - remaining_efficiency
}

/// Round to the nearest multiple of ten, halves rounding up (85 -> 90).
pub fn round_to_ten(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    let rounded = (raw / 10.0).round() * 10.0;
    rounded.clamp(0.0, 100.0) as u8
}

/// Combine and round in one step.
pub fn combined_rating<I>(ratings: I) -> CombinedRating
where
    I: IntoIterator<Item = u8>,
{
    let raw = combine(ratings);
    CombinedRating {
        raw,
        rounded: round_to_ten(raw),
    }
}

pub fn combine_disabilities(disabilities: &[Disability]) -> CombinedRating {
    combined_rating(disabilities.iter().map(|d| d.rating))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_empty_and_zero_inputs() {
        assert_eq!(combine(Vec::<u8>::new()), 0.0);
        assert_eq!(combine([0, 0, 0]), 0.0);
        assert_eq!(round_to_ten(0.0), 0);
    }

    #[test]
    fn test_two_tens_combine_to_nineteen() {
        let raw = combine([10, 10]);
        assert!((raw - 19.0).abs() < EPSILON);
        assert_eq!(round_to_ten(raw), 20);
    }

    #[test]
    fn test_fifty_thirty_twenty() {
        let raw = combine([50, 30, 20]);
        assert!((raw - 72.0).abs() < EPSILON);
        assert_eq!(round_to_ten(raw), 70);
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = combine([20, 50, 30]);
        let b = combine([50, 30, 20]);
        assert!((a - b).abs() < EPSILON);
    }

    #[test]
    fn test_round_to_ten() {
        assert_eq!(round_to_ten(85.0), 90);
        assert_eq!(round_to_ten(84.0), 80);
        assert_eq!(round_to_ten(84.99), 80);
        assert_eq!(round_to_ten(100.0), 100);
        assert_eq!(round_to_ten(4.9), 0);
        assert_eq!(round_to_ten(5.0), 10);
        assert_eq!(round_to_ten(f64::NAN), 0);
    }

    #[test]
    fn test_single_hundred_is_total() {
        let rating = combined_rating([100, 30]);
        assert!((rating.raw - 100.0).abs() < EPSILON);
        assert_eq!(rating.rounded, 100);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert!((combine([200]) - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounds_and_monotonicity() {
        let samples: Vec<u8> = (0..=100).step_by(10).collect();
        for &a in &samples {
            let base = combine([a]);
            assert!((0.0..=100.0).contains(&base));
            for &b in samples.iter().filter(|&&b| b > 0) {
                let more = combine([a, b]);
                assert!(more >= base - EPSILON, "combine([{a}, {b}]) decreased");
                assert!(more <= 100.0 + EPSILON);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let ratings = [70, 40, 10, 10];
        assert_eq!(combined_rating(ratings), combined_rating(ratings));
    }

    #[test]
    fn test_combine_disabilities_uses_ratings() {
        let disabilities = vec![
            Disability::new(1, "Tinnitus", 10),
            Disability::new(2, "PTSD", 70),
            Disability::new(3, "Unrated", 0),
        ];
        let rating = combine_disabilities(&disabilities);
        assert!((rating.raw - 73.0).abs() < EPSILON);
        assert_eq!(rating.rounded, 70);
    }
}
