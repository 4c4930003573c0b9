//! Full-window rolling statistics over a single entity's series.
//!
//! Every window must be fully populated with finite values; a partial or
//! gappy window yields `NaN` rather than a statistic over fewer observations.

use ndarray::{ArrayView1, Ix1};

/// Relative change over `periods` observations: `x[t] / x[t - periods] - 1`.
///
/// # Examples
///
/// ```
/// use faro_factors::rolling::pct_change;
///
/// let change = pct_change(&[100.0, 110.0, 121.0], 1);
/// assert!(change[0].is_nan());
/// assert!((change[2] - 0.1).abs() < 1e-12);
/// ```
pub fn pct_change(values: &[f64], periods: usize) -> Vec<f64> {
    (0..values.len())
        .map(|t| match t.checked_sub(periods) {
            Some(base) if periods > 0 => ratio_change(values[t], values[base]),
            _ => f64::NAN,
        })
        .collect()
}

/// Forward relative change: `x[t + periods] / x[t] - 1`.
pub fn forward_change(values: &[f64], periods: usize) -> Vec<f64> {
    (0..values.len())
        .map(|t| match values.get(t + periods) {
            Some(&ahead) if periods > 0 => ratio_change(ahead, values[t]),
            _ => f64::NAN,
        })
        .collect()
}

/// Trailing mean over `window` observations.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.mean())
}

/// Trailing sample standard deviation (ddof = 1) over `window` observations.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        return vec![f64::NAN; values.len()];
    }
    rolling_apply(values, window, |w| Some(w.std(1.0)))
}

fn rolling_apply<F>(values: &[f64], window: usize, stat: F) -> Vec<f64>
where
    F: Fn(ArrayView1<'_, f64>) -> Option<f64>,
{
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || window > values.len() {
        return out;
    }

    let series = ArrayView1::from(values);
    for (start, w) in series.windows(Ix1(window)).into_iter().enumerate() {
        if w.iter().all(|x| x.is_finite()) {
            out[start + window - 1] = stat(w).filter(|x| x.is_finite()).unwrap_or(f64::NAN);
        }
    }
    out
}

fn ratio_change(current: f64, base: f64) -> f64 {
    let change = current / base - 1.0;
    if change.is_finite() { change } else { f64::NAN }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pct_change_strict() {
        let values = [10.0, 11.0, f64::NAN, 12.0, 0.0, 5.0];
        let change = pct_change(&values, 1);

        assert!(change[0].is_nan());
        assert_relative_eq!(change[1], 0.1, epsilon = 1e-12);
        assert!(change[2].is_nan());
        assert!(change[3].is_nan());
        assert_relative_eq!(change[4], -1.0);
        // Division by a zero price is undefined, not infinite.
        assert!(change[5].is_nan());
    }

    #[test]
    fn test_pct_change_periods() {
        let values: Vec<f64> = (1..=6).map(f64::from).collect();
        let change = pct_change(&values, 3);
        assert!(change[..3].iter().all(|x| x.is_nan()));
        assert_relative_eq!(change[3], 3.0);
        assert_relative_eq!(change[5], 1.0);
        assert!(pct_change(&values, 0).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_forward_change() {
        let values = [100.0, 105.0, 110.0, 99.0];
        let fwd = forward_change(&values, 2);
        assert_relative_eq!(fwd[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(fwd[1], 99.0 / 105.0 - 1.0, epsilon = 1e-12);
        assert!(fwd[2].is_nan());
        assert!(fwd[3].is_nan());
    }

    #[test]
    fn test_rolling_mean_requires_full_window() {
        let values = [1.0, 2.0, 3.0, f64::NAN, 5.0, 6.0, 7.0];
        let mean = rolling_mean(&values, 3);

        assert!(mean[0].is_nan());
        assert!(mean[1].is_nan());
        assert_relative_eq!(mean[2], 2.0);
        assert!(mean[3].is_nan());
        assert!(mean[4].is_nan());
        assert!(mean[5].is_nan());
        assert_relative_eq!(mean[6], 6.0);
    }

    #[test]
    fn test_rolling_std_sample() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = rolling_std(&values, 8);
        assert!(std[..7].iter().all(|x| x.is_nan()));
        assert_relative_eq!(std[7], 2.138089935299395, epsilon = 1e-12);

        assert!(rolling_std(&values, 1).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_window_longer_than_series() {
        assert!(rolling_mean(&[1.0, 2.0], 5).iter().all(|x| x.is_nan()));
        assert!(rolling_mean(&[], 5).is_empty());
    }
}
