//! Information Coefficient (IC) calculations.
//!
//! The IC of a date is the correlation, across tickers, between a factor and
//! a forward return. Linear IC uses Pearson correlation; rank IC uses
//! Spearman correlation with average ranks for ties.

use log::debug;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use faro_traits::stats::is_degenerate;
use faro_traits::{Date, Panel, Result};

use crate::cross_section::CrossSection;

/// Correlation used for an IC series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationKind {
    /// Pearson correlation of the raw values.
    Linear,
    /// Spearman correlation of the ranks.
    Rank,
}

/// One date of an IC series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcObservation {
    /// Cross-section date.
    pub date: Date,
    /// Correlation, `None` when either side has no dispersion.
    pub ic: Option<f64>,
    /// Number of tickers with both values present.
    pub n: usize,
}

/// Pearson correlation.
///
/// Returns `None` for mismatched or too-short inputs and when either series
/// has zero variance.
///
/// # Example
///
/// ```
/// use faro_eval::ic::pearson;
/// use ndarray::array;
///
/// let r = pearson(&array![1.0, 2.0, 3.0], &array![2.0, 4.0, 6.5]).unwrap();
/// assert!(r > 0.99);
/// assert!(pearson(&array![1.0, 1.0, 1.0], &array![1.0, 2.0, 3.0]).is_none());
/// ```
pub fn pearson(x: &Array1<f64>, y: &Array1<f64>) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }

    let mean_x = x.mean()?;
    let mean_y = y.mean()?;
    let dx = x - mean_x;
    let dy = y - mean_y;

    let var_x = dx.dot(&dx);
    let var_y = dy.dot(&dy);
    if is_degenerate(mean_x, (var_x / n as f64).sqrt())
        || is_degenerate(mean_y, (var_y / n as f64).sqrt())
    {
        return None;
    }

    let r = dx.dot(&dy) / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Spearman rank correlation.
pub fn spearman(x: &Array1<f64>, y: &Array1<f64>) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

/// Correlation of the requested kind.
pub fn correlation(kind: CorrelationKind, x: &Array1<f64>, y: &Array1<f64>) -> Option<f64> {
    match kind {
        CorrelationKind::Linear => pearson(x, y),
        CorrelationKind::Rank => spearman(x, y),
    }
}

/// 1-based ranks, with exactly equal values sharing their average rank.
pub fn average_ranks(values: &Array1<f64>) -> Array1<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = Array1::zeros(n);
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share ranks i+1..=j.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Per-date IC series of `factor` against `label`.
///
/// Dates where fewer than `min_n` tickers have both values are skipped and
/// do not appear in the output. Dates that pass the threshold but have an
/// undefined correlation are kept with `ic: None`.
///
/// # Errors
///
/// Returns [`faro_traits::FaroError::MissingColumn`] if either column is absent.
pub fn ic_series(
    panel: &Panel,
    factor: &str,
    label: &str,
    kind: CorrelationKind,
    min_n: usize,
) -> Result<Vec<IcObservation>> {
    let sections = CrossSection::all(panel, factor, label)?;

    Ok(sections
        .par_iter()
        .filter_map(|section| {
            if section.len() < min_n {
                debug!(
                    "IC {factor}/{label}: skipping {} ({} < {min_n})",
                    section.date,
                    section.len()
                );
                return None;
            }
            let x = Array1::from(section.factor.clone());
            let y = Array1::from(section.label.clone());
            Some(IcObservation {
                date: section.date,
                ic: correlation(kind, &x, &y),
                n: section.len(),
            })
        })
        .collect())
}
