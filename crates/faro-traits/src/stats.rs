//! Statistical utility functions for cross-sectional processing.
//!
//! All functions ignore non-finite inputs when computing statistics and
//! leave non-finite inputs non-finite in their outputs.

/// Relative dispersion floor: a cross-section whose standard deviation is
/// this small relative to its mean is treated as having zero variance.
pub const MIN_RELATIVE_STD: f64 = 1e-12;

/// Z-score standardization result containing computed statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardizeResult {
    /// Mean of the finite inputs.
    pub mean: Option<f64>,
    /// Population standard deviation (N denominator) of the finite inputs.
    pub std: Option<f64>,
    /// Whether the values were standardized; when false every output is `NaN`.
    pub applied: bool,
}

/// Values that are finite, in input order.
pub fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|x| x.is_finite()).collect()
}

/// Arithmetic mean of the finite values, `None` if there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Standard deviation of the finite values with `ddof` delta degrees of freedom.
///
/// Returns `None` when there are no more than `ddof` finite values.
pub fn std_dev(values: &[f64], ddof: usize) -> Option<f64> {
    let finite = finite(values);
    let n = finite.len();
    if n <= ddof {
        return None;
    }
    let m = finite.iter().sum::<f64>() / n as f64;
    let ss: f64 = finite.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / (n - ddof) as f64).sqrt())
}

/// Quantile of ascending `sorted` values with linear interpolation between
/// the two nearest ranks.
///
/// Returns `None` for an empty slice or `p` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Clip finite values to `[quantile(pct), quantile(1 - pct)]` of the finite values.
///
/// `pct` is clamped to `[0, 0.5]`; a `NaN` fraction clips nothing.
///
/// # Examples
///
/// ```
/// use faro_traits::stats::winsorize;
///
/// let clipped = winsorize(&[1.0, 2.0, 3.0, 4.0, 100.0], 0.25);
/// assert_eq!(clipped, vec![2.0, 2.0, 3.0, 4.0, 4.0]);
/// ```
pub fn winsorize(values: &[f64], pct: f64) -> Vec<f64> {
    let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 0.5) };
    let mut sorted = finite(values);
    if sorted.is_empty() {
        return values.to_vec();
    }
    sorted.sort_by(f64::total_cmp);

    let (Some(lo), Some(hi)) = (
        quantile_sorted(&sorted, pct),
        quantile_sorted(&sorted, 1.0 - pct),
    ) else {
        return values.to_vec();
    };

    values
        .iter()
        .map(|&x| if x.is_finite() { x.clamp(lo, hi) } else { x })
        .collect()
}

/// Whether a standard deviation carries no usable dispersion.
pub fn is_degenerate(mean: f64, std: f64) -> bool {
    !(std.is_finite() && std > MIN_RELATIVE_STD * mean.abs())
}

/// Standardize values to z-scores using the population standard deviation.
///
/// If there are no finite values, or their dispersion is zero, every output
/// is `NaN`: a cross-section without variance carries no signal and must not
/// read as zero exposure.
///
/// # Examples
///
/// ```
/// use faro_traits::stats::standardize;
///
/// let (z, result) = standardize(&[1.0, 2.0, 3.0]);
/// assert!(result.applied);
/// assert!((z[2] - 1.224744871391589).abs() < 1e-12);
///
/// let (z, result) = standardize(&[5.0, 5.0]);
/// assert!(!result.applied);
/// assert!(z.iter().all(|x| x.is_nan()));
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, StandardizeResult) {
    let (Some(mean), Some(std)) = (mean(values), std_dev(values, 0)) else {
        return (
            vec![f64::NAN; values.len()],
            StandardizeResult {
                mean: None,
                std: None,
                applied: false,
            },
        );
    };

    if is_degenerate(mean, std) {
        return (
            vec![f64::NAN; values.len()],
            StandardizeResult {
                mean: Some(mean),
                std: Some(std),
                applied: false,
            },
        );
    }

    let standardized = values
        .iter()
        .map(|&x| if x.is_finite() { (x - mean) / std } else { f64::NAN })
        .collect();

    (
        standardized,
        StandardizeResult {
            mean: Some(mean),
            std: Some(std),
            applied: true,
        },
    )
}
