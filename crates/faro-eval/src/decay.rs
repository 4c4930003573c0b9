//! Factor decay across forward-return horizons.
//!
//! A decay table lists the rank-IC statistics of each factor at every
//! horizon. [`DecayCurve`] reads one factor's slice of that table to locate
//! its peak and the horizon at which predictive power halves.

use serde::{Deserialize, Serialize};

use crate::metrics::IcSummary;

/// Rank-IC statistics of one factor at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayRow {
    /// Factor column.
    pub factor: String,
    /// Forward-return horizon in trading days.
    pub h: usize,
    /// Mean rank IC.
    pub rank_ic_mean: Option<f64>,
    /// Rank-IC information ratio.
    pub rank_ic_ir: Option<f64>,
    /// Rank-IC t-statistic.
    pub rank_ic_t: Option<f64>,
    /// Dates with a defined rank IC.
    pub n_days: usize,
}

impl DecayRow {
    /// Decay row from a rank-IC summary.
    pub fn from_summary(factor: impl Into<String>, h: usize, rank_ic: &IcSummary) -> Self {
        Self {
            factor: factor.into(),
            h,
            rank_ic_mean: rank_ic.mean,
            rank_ic_ir: rank_ic.ir,
            rank_ic_t: rank_ic.t_stat,
            n_days: rank_ic.n_days,
        }
    }
}

/// Decay curve data points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayCurve {
    /// Factor the curve belongs to.
    pub factor: String,
    /// Time horizons (in days), ascending
    pub horizons: Vec<usize>,
    /// Mean rank IC at each horizon
    pub ic_values: Vec<f64>,
    /// Standard errors of the mean rank IC, `NaN` when undefined
    pub ic_std_errors: Vec<f64>,
}

impl DecayCurve {
    /// Curve of `factor` from decay rows, skipping horizons without a mean IC.
    pub fn from_rows<'a>(factor: &str, rows: impl IntoIterator<Item = &'a DecayRow>) -> Self {
        let mut points: Vec<(usize, f64, f64)> = rows
            .into_iter()
            .filter(|r| r.factor == factor)
            .filter_map(|r| {
                let mean = r.rank_ic_mean?;
                let std_error = match (r.rank_ic_mean, r.rank_ic_t) {
                    (Some(m), Some(t)) if t != 0.0 => (m / t).abs(),
                    _ => f64::NAN,
                };
                Some((r.h, mean, std_error))
            })
            .collect();
        points.sort_by_key(|p| p.0);

        Self {
            factor: factor.to_string(),
            horizons: points.iter().map(|p| p.0).collect(),
            ic_values: points.iter().map(|p| p.1).collect(),
            ic_std_errors: points.iter().map(|p| p.2).collect(),
        }
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.horizons.is_empty()
    }

    /// Get IC at a specific horizon (interpolated if needed).
    pub fn ic_at_horizon(&self, horizon: usize) -> Option<f64> {
        if let Some(pos) = self.horizons.iter().position(|&h| h == horizon) {
            return Some(self.ic_values[pos]);
        }

        self.horizons
            .windows(2)
            .zip(self.ic_values.windows(2))
            .find(|(h, _)| h[0] < horizon && horizon < h[1])
            .map(|(h, ic)| {
                let weight = (horizon - h[0]) as f64 / (h[1] - h[0]) as f64;
                ic[0] + weight * (ic[1] - ic[0])
            })
    }

    /// Horizon at which |IC| first drops to half its value at the shortest horizon.
    pub fn half_life(&self) -> Option<f64> {
        let half_ic = self.ic_values.first()?.abs() / 2.0;

        self.horizons
            .windows(2)
            .zip(self.ic_values.windows(2))
            .find(|(_, ic)| ic[0].abs() >= half_ic && ic[1].abs() <= half_ic)
            .map(|(h, ic)| {
                let (ic1, ic2) = (ic[0].abs(), ic[1].abs());
                let weight = if ic1 == ic2 { 0.0 } else { (ic1 - half_ic) / (ic1 - ic2) };
                h[0] as f64 + weight * (h[1] - h[0]) as f64
            })
    }

    /// Horizon and value of the largest |IC|.
    pub fn max_ic(&self) -> Option<(usize, f64)> {
        self.horizons
            .iter()
            .copied()
            .zip(self.ic_values.iter().copied())
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }

    /// Whether |IC| never increases with the horizon.
    pub fn is_monotonic(&self) -> bool {
        self.ic_values.windows(2).all(|w| w[0].abs() >= w[1].abs())
    }
}
