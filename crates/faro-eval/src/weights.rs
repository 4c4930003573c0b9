//! Long/short quantile portfolio weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use faro_traits::Ticker;

use crate::bucket::quantile_buckets;

/// Signed weight per ticker for one rebalance date.
///
/// Tickers outside the weighted universe have weight zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWeights {
    weights: BTreeMap<Ticker, f64>,
}

impl PortfolioWeights {
    /// Weight of `ticker`, zero when absent.
    pub fn get(&self, ticker: &str) -> f64 {
        self.weights.get(ticker).copied().unwrap_or(0.0)
    }

    /// Iterates `(ticker, weight)` in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, &w)| (t.as_str(), w))
    }

    /// Number of tickers in the weighted universe.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of positive weights.
    pub fn long_exposure(&self) -> f64 {
        self.weights.values().filter(|w| **w > 0.0).fold(0.0, |acc, w| acc + w)
    }

    /// Sum of negative weights.
    pub fn short_exposure(&self) -> f64 {
        self.weights.values().filter(|w| **w < 0.0).fold(0.0, |acc, w| acc + w)
    }

    /// Sum of absolute weights.
    pub fn gross_exposure(&self) -> f64 {
        self.weights.values().fold(0.0, |acc, w| acc + w.abs())
    }

    /// Turnover from `previous` into these weights.
    ///
    /// With no previous position this is the gross exposure. Otherwise it
    /// is half the L1 distance over the union of both universes, so fully
    /// replacing both books counts as 2.
    pub fn turnover_from(&self, previous: Option<&Self>) -> f64 {
        let Some(previous) = previous else {
            return self.gross_exposure();
        };

        let changed: f64 = self
            .weights
            .iter()
            .map(|(ticker, &w)| (w - previous.get(ticker)).abs())
            .sum();
        let dropped: f64 = previous
            .weights
            .iter()
            .filter(|(ticker, _)| !self.weights.contains_key(*ticker))
            .map(|(_, w)| w.abs())
            .sum();

        (changed + dropped) / 2.0
    }

    /// `Σ weight × value` over the tickers of `values`.
    pub fn dot<'a>(&self, values: impl IntoIterator<Item = (&'a str, f64)>) -> f64 {
        values.into_iter().map(|(t, v)| self.get(t) * v).sum()
    }
}

impl FromIterator<(Ticker, f64)> for PortfolioWeights {
    fn from_iter<I: IntoIterator<Item = (Ticker, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// Builds equal-weighted long-top, short-bottom quantile weights.
///
/// Rows with a non-finite factor are dropped first. The top bucket gets
/// `+1/|top|` each, the bottom bucket `-1/|bottom|` each and everything else
/// zero. An empty bucket contributes no weight.
///
/// # Example
///
/// ```
/// use faro_eval::build_weights;
///
/// let w = build_weights(&["AAA".to_string(), "BBB".to_string()], &[1.0, 2.0], 2);
/// assert_eq!(w.get("AAA"), -1.0);
/// assert_eq!(w.get("BBB"), 1.0);
/// ```
pub fn build_weights(tickers: &[Ticker], factor: &[f64], q: usize) -> PortfolioWeights {
    let (names, values): (Vec<&Ticker>, Vec<f64>) = tickers
        .iter()
        .zip(factor)
        .filter(|(_, f)| f.is_finite())
        .map(|(t, &f)| (t, f))
        .unzip();

    if q == 0 {
        return names.into_iter().map(|t| (t.clone(), 0.0)).collect();
    }

    let buckets = quantile_buckets(&values, q);
    let top = q - 1;
    let n_long = buckets.iter().filter(|&&b| b == top).count();
    let n_short = buckets.iter().filter(|&&b| b == 0).count();

    names
        .into_iter()
        .zip(buckets)
        .map(|(ticker, bucket)| {
            let weight = if bucket == top {
                1.0 / n_long as f64
            } else if bucket == 0 {
                -1.0 / n_short as f64
            } else {
                0.0
            };
            (ticker.clone(), weight)
        })
        .collect()
}
