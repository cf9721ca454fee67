//! Order statistics over an ascending-sorted sample.
//! Callers sort once; nothing here re-sorts or allocates.

/// Percentile with linear interpolation between the two nearest order statistics.
///
/// rank = q * (n - 1); value = x[lo] + (rank - lo) * (x[hi] - x[lo])
///
/// Same rule as the common "linear" percentile method, so q = 0.5 is the
/// usual median and q = 0 / q = 1 are the min / max.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty(), "percentile of empty sample");
    debug_assert!((0.0..=1.0).contains(&q), "q must be in [0, 1]");

    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = q * (sorted.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = (rank.ceil() as usize).min(sorted.len() - 1);
    if lo == hi {
        sorted[lo]
    } else {
        let w = rank - lo as f64;
        sorted[lo] + w * (sorted[hi] - sorted[lo])
    }
}

/// Mean of every value >= `threshold` (inclusive tail).
/// Returns `threshold` when the tail is empty.
///
/// Accumulates excesses over the threshold so the result never rounds
/// below it, even when the tail is a run of tied values.
pub fn tail_mean(sorted: &[f64], threshold: f64) -> f64 {
    let start = sorted.partition_point(|&x| x < threshold);
    let tail = &sorted[start..];
    if tail.is_empty() {
        return threshold;
    }
    let excess = tail.iter().map(|&x| x - threshold).sum::<f64>() / tail.len() as f64;
    (threshold + excess).max(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_interpolates() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        // rank = 0.95 * 4 = 3.8 -> 4 + 0.8 * 1
        assert_relative_eq!(percentile(&xs, 0.95), 4.8, epsilon = 1e-12);
        assert_relative_eq!(percentile(&xs, 0.5), 3.0, epsilon = 1e-12);
        assert_relative_eq!(percentile(&xs, 0.1), 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_even_length_median() {
        let xs = [10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(percentile(&xs, 0.5), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_endpoints() {
        let xs = [-3.0, 0.5, 7.0];
        assert_eq!(percentile(&xs, 0.0), -3.0);
        assert_eq!(percentile(&xs, 1.0), 7.0);
    }

    #[test]
    fn test_single_element() {
        assert_eq!(percentile(&[42.0], 0.95), 42.0);
        assert_eq!(tail_mean(&[42.0], 42.0), 42.0);
    }

    #[test]
    fn test_tail_mean_is_inclusive() {
        let xs = [1.0, 2.0, 3.0, 3.0, 10.0];
        // 3, 3, 10
        assert_relative_eq!(tail_mean(&xs, 3.0), 16.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tail_mean_at_least_threshold() {
        let xs: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin()).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        for &q in &[0.5, 0.9, 0.95, 0.99] {
            let var = percentile(&sorted, q);
            assert!(tail_mean(&sorted, var) >= var, "q={q}");
        }
    }

    #[test]
    fn test_tied_tail_never_below_percentile() {
        for i in 1..2_000 {
            let x = i as f64 * 0.00187 + 0.001;
            let xs = [x; 3];
            let var = percentile(&xs, 0.95);
            let es = tail_mean(&xs, var);
            assert!(es >= var, "x={x} var={var} es={es}");
        }
        let x = 3.7386299999999997;
        assert!(tail_mean(&[x, x, x], x) >= x);
    }

    #[test]
    fn test_empty_tail_falls_back_to_threshold() {
        assert_eq!(tail_mean(&[1.0, 2.0], 5.0), 5.0);
    }
}
