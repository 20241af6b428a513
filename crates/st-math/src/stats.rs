//! Robust summary statistics over f64 slices.
//!
//! These helpers back the quantile and MAD classifier stages. They tolerate
//! NaN by ignoring it, so one bad cell never poisons a whole batch
//! threshold. Empty (or all-NaN) input yields NaN rather than panicking.

/// Arithmetic mean, ignoring NaN entries.
pub fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        if !v.is_nan() {
            sum += v;
            n += 1;
        }
    }
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

/// Quantile via nearest-rank on a sorted copy, `q` in [0, 1].
///
/// `q = 0` yields the minimum, `q = 1` the maximum. NaN entries are
/// ignored; out-of-range `q` or empty input yields NaN.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = ((q * sorted.len() as f64).ceil() as usize).max(1) - 1;
    sorted[rank.min(sorted.len() - 1)]
}

/// Median, ignoring NaN entries.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Median absolute deviation around the median, ignoring NaN entries.
pub fn mad(values: &[f64]) -> f64 {
    let m = median(values);
    if m.is_nan() {
        return f64::NAN;
    }
    let deviations: Vec<f64> = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| (v - m).abs())
        .collect();
    median(&deviations)
}

/// Scale factor that makes MAD a consistent estimator of the standard
/// deviation under normality (1 / Phi^-1(3/4)).
pub const MAD_NORMAL_CONSISTENCY: f64 = 1.4826;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn mean_ignores_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), 2.0);
    }

    #[test]
    fn mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(mean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn quantile_endpoints() {
        let v = [3.0, 1.0, 2.0];
        assert_eq!(quantile(&v, 0.0), 1.0);
        assert_eq!(quantile(&v, 1.0), 3.0);
    }

    #[test]
    fn quantile_nearest_rank() {
        let v = [10.0, 20.0, 30.0, 40.0];
        // ceil(0.5 * 4) = 2 -> second smallest
        assert_eq!(quantile(&v, 0.5), 20.0);
        // ceil(0.9 * 4) = 4 -> largest
        assert_eq!(quantile(&v, 0.9), 40.0);
    }

    #[test]
    fn quantile_out_of_range_is_nan() {
        assert!(quantile(&[1.0], -0.1).is_nan());
        assert!(quantile(&[1.0], 1.1).is_nan());
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.0);
    }

    #[test]
    fn mad_symmetric_sample() {
        // median = 3, |deviations| = [2, 1, 0, 1, 2], median = 1
        assert_eq!(mad(&[1.0, 2.0, 3.0, 4.0, 5.0]), 1.0);
    }

    #[test]
    fn mad_constant_sample_is_zero() {
        assert_eq!(mad(&[7.0, 7.0, 7.0]), 0.0);
    }

    proptest! {
        #[test]
        fn quantile_stays_within_bounds(
            values in prop::collection::vec(-1e6f64..1e6, 1..200),
            q in 0.0f64..=1.0,
        ) {
            let result = quantile(&values, q);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(result >= min && result <= max);
        }

        #[test]
        fn mad_is_non_negative(
            values in prop::collection::vec(-1e6f64..1e6, 1..200),
        ) {
            prop_assert!(mad(&values) >= 0.0);
        }

        #[test]
        fn quantile_is_monotone_in_q(
            values in prop::collection::vec(-1e6f64..1e6, 1..200),
            q1 in 0.0f64..=1.0,
            q2 in 0.0f64..=1.0,
        ) {
            let (lo, hi) = if q1 <= q2 { (q1, q2) } else { (q2, q1) };
            prop_assert!(quantile(&values, lo) <= quantile(&values, hi));
        }
    }
}
