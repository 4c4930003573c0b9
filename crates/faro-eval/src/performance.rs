//! Performance summary of a step backtest.

use std::fmt;

use serde::{Deserialize, Serialize};

use faro_traits::stats::{mean, std_dev};

use crate::backtest::RebalanceRecord;

/// Annualized statistics of a rebalance trajectory.
///
/// Every statistic is `None` when it is undefined, e.g. for an empty
/// trajectory or a volatility of zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Number of rebalance steps.
    pub n_steps: usize,
    /// `(1 + mean net return)^steps_per_year - 1`.
    pub ann_return: Option<f64>,
    /// Sample standard deviation of net returns times `sqrt(steps_per_year)`.
    pub ann_vol: Option<f64>,
    /// `ann_return / ann_vol`.
    pub sharpe: Option<f64>,
    /// Most negative drawdown.
    pub max_drawdown: Option<f64>,
    /// Mean turnover per rebalance.
    pub avg_turnover: Option<f64>,
}

impl PerformanceSummary {
    /// Summarizes `records` rebalanced every `holding_period` trading days.
    ///
    /// # Example
    ///
    /// ```
    /// use faro_eval::PerformanceSummary;
    ///
    /// let summary = PerformanceSummary::from_records(&[], 252, 5);
    /// assert_eq!(summary.n_steps, 0);
    /// assert!(summary.sharpe.is_none());
    /// ```
    pub fn from_records(
        records: &[RebalanceRecord],
        trading_days_per_year: usize,
        holding_period: usize,
    ) -> Self {
        let net: Vec<f64> = records.iter().map(|r| r.net_return).collect();
        let n_steps = net.iter().filter(|x| x.is_finite()).count();
        if n_steps == 0 || holding_period == 0 {
            return Self {
                n_steps,
                ..Self::default()
            };
        }

        let steps_per_year = trading_days_per_year as f64 / holding_period as f64;
        let ann_return = mean(&net)
            .map(|m| (1.0 + m).powf(steps_per_year) - 1.0)
            .filter(|x| x.is_finite());
        let ann_vol = std_dev(&net, 1).map(|s| s * steps_per_year.sqrt());
        let sharpe = match (ann_return, ann_vol) {
            (Some(r), Some(v)) if v > 0.0 => Some(r / v),
            _ => None,
        };

        let max_drawdown = records
            .iter()
            .map(|r| r.drawdown)
            .filter(|x| x.is_finite())
            .reduce(f64::min);
        let turnover: Vec<f64> = records.iter().map(|r| r.turnover).collect();

        Self {
            n_steps,
            ann_return,
            ann_vol,
            sharpe,
            max_drawdown,
            avg_turnover: mean(&turnover),
        }
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = |x: Option<f64>| x.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}%", v * 100.0));
        let num = |x: Option<f64>| x.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"));
        write!(
            f,
            "n_steps={} | ann_ret={} | ann_vol={} | sharpe={} | max_dd={} | avg_turnover={}",
            self.n_steps,
            pct(self.ann_return),
            pct(self.ann_vol),
            num(self.sharpe),
            pct(self.max_drawdown),
            num(self.avg_turnover)
        )
    }
}
