//! Quantile-spread evaluation.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use faro_traits::{Date, Panel, Result};

use crate::bucket::quantile_buckets;
use crate::cross_section::CrossSection;

/// Top-minus-bottom bucket return for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadObservation {
    /// Cross-section date.
    pub date: Date,
    /// Mean label of the highest bucket minus that of the lowest.
    pub top_minus_bottom: f64,
}

/// Mean label per bucket, `None` for an empty bucket.
pub fn bucket_means(factor: &[f64], label: &[f64], q: usize) -> Vec<Option<f64>> {
    let mut sums = vec![0.0; q];
    let mut counts = vec![0usize; q];
    for (bucket, y) in quantile_buckets(factor, q).into_iter().zip(label) {
        sums[bucket] += y;
        counts[bucket] += 1;
    }
    sums.into_iter()
        .zip(counts)
        .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
        .collect()
}

/// Per-date spread between the top and bottom factor buckets.
///
/// Dates with fewer than `min_n` complete rows are skipped.
///
/// # Errors
///
/// Returns [`faro_traits::FaroError::MissingColumn`] if either column is absent.
pub fn quantile_spread(
    panel: &Panel,
    factor: &str,
    label: &str,
    q: usize,
    min_n: usize,
) -> Result<Vec<SpreadObservation>> {
    let sections = CrossSection::all(panel, factor, label)?;
    let min_n = min_n.max(q);

    Ok(sections
        .par_iter()
        .filter_map(|section| {
            if section.len() < min_n {
                debug!(
                    "Spread {factor}/{label}: skipping {} ({} < {min_n})",
                    section.date,
                    section.len()
                );
                return None;
            }
            let means = bucket_means(&section.factor, &section.label, q);
            let top = means.last().copied().flatten()?;
            let bottom = means.first().copied().flatten()?;
            Some(SpreadObservation {
                date: section.date,
                top_minus_bottom: top - bottom,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bucket_means() {
        let factor = [0.4, 0.1, 0.3, 0.2];
        let label = [4.0, 1.0, 3.0, 2.0];
        let means = bucket_means(&factor, &label, 2);
        assert_eq!(means, vec![Some(1.5), Some(3.5)]);
    }

    #[test]
    fn test_quantile_spread() {
        let d1 = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let d2 = Date::from_ymd_opt(2024, 1, 3).unwrap();
        let mut dates = vec![d1; 6];
        dates.extend([d2; 3]);
        let tickers = (0..9).map(|i| format!("T{}", i % 6)).collect();
        let panel = Panel::new(dates, tickers)
            .unwrap()
            .with_column("f", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 1.0, 2.0, 3.0])
            .unwrap()
            .with_column("y", vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.9, 0.0, 0.0, 0.0])
            .unwrap();

        let spread = quantile_spread(&panel, "f", "y", 3, 4).unwrap();
        assert_eq!(spread.len(), 1);
        assert_eq!(spread[0].date, d1);
        assert_relative_eq!(spread[0].top_minus_bottom, 0.65 - 0.05, epsilon = 1e-12);
    }
}
