//! Transaction-cost sensitivity of a backtest.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use faro_traits::Result;
use faro_traits::panel::optional_column;

use crate::backtest::BacktestResult;
use crate::performance::PerformanceSummary;

/// Round-trip costs swept when none are given, in basis points.
pub const DEFAULT_COST_GRID: [f64; 5] = [0.0, 5.0, 10.0, 20.0, 50.0];

/// Performance of one trajectory at one round-trip cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSensitivityRow {
    /// Round-trip cost in basis points.
    pub cost_bps_roundtrip: f64,
    /// Performance net of that cost.
    pub summary: PerformanceSummary,
}

/// Re-prices `result` at every cost in `costs_bps`, in the given order.
///
/// Gross returns and turnover are shared by every row; only the cost
/// deduction differs.
pub fn cost_sensitivity(
    result: &BacktestResult,
    costs_bps: &[f64],
    trading_days_per_year: usize,
) -> Vec<CostSensitivityRow> {
    costs_bps
        .iter()
        .map(|&cost| CostSensitivityRow {
            cost_bps_roundtrip: cost,
            summary: result.with_cost(cost).summary(trading_days_per_year),
        })
        .collect()
}

/// Sensitivity table: `cost_bps_roundtrip, n_steps, ann_ret, ann_vol, sharpe,
/// max_dd, avg_turnover`.
///
/// # Errors
///
/// Returns an error if polars rejects the assembled columns.
pub fn sensitivity_frame(rows: &[CostSensitivityRow]) -> Result<DataFrame> {
    let stat = |f: fn(&PerformanceSummary) -> Option<f64>| -> Vec<Option<f64>> {
        rows.iter().map(|r| f(&r.summary)).collect()
    };

    Ok(DataFrame::new(vec![
        Series::new(
            "cost_bps_roundtrip".into(),
            rows.iter().map(|r| r.cost_bps_roundtrip).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            "n_steps".into(),
            rows.iter().map(|r| r.summary.n_steps as u64).collect::<Vec<_>>(),
        )
        .into(),
        optional_column("ann_ret", &stat(|s| s.ann_return)),
        optional_column("ann_vol", &stat(|s| s.ann_vol)),
        optional_column("sharpe", &stat(|s| s.sharpe)),
        optional_column("max_dd", &stat(|s| s.max_drawdown)),
        optional_column("avg_turnover", &stat(|s| s.avg_turnover)),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::{BacktestConfig, StepRecord, compound};
    use faro_traits::Date;

    fn result() -> BacktestResult {
        let steps: Vec<StepRecord> = [(0.01, 2.0), (0.004, 0.6), (-0.002, 0.8), (0.006, 0.4)]
            .iter()
            .enumerate()
            .map(|(i, &(gross, turnover))| StepRecord {
                date: Date::from_ymd_opt(2024, 1, 2 + 7 * i as u32).unwrap(),
                gross_return: gross,
                cost: 0.0,
                net_return: gross,
                turnover,
            })
            .collect();
        BacktestResult {
            config: BacktestConfig::default(),
            records: compound(&steps),
        }
    }

    #[test]
    fn test_higher_cost_lowers_return() {
        let rows = cost_sensitivity(&result(), &DEFAULT_COST_GRID, 252);
        assert_eq!(rows.len(), DEFAULT_COST_GRID.len());

        for pair in rows.windows(2) {
            assert!(pair[1].summary.ann_return.unwrap() < pair[0].summary.ann_return.unwrap());
            assert_eq!(pair[1].summary.avg_turnover, pair[0].summary.avg_turnover);
        }
    }

    #[test]
    fn test_zero_cost_matches_gross() {
        let rows = cost_sensitivity(&result(), &[0.0], 252);
        let gross = result().with_cost(0.0);
        assert_eq!(rows[0].summary, gross.summary(252));
        assert!(gross.records.iter().all(|r| r.net_return == r.gross_return));
    }

    #[test]
    fn test_frame_columns() {
        let df = sensitivity_frame(&cost_sensitivity(&result(), &[0.0, 10.0], 252)).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            vec!["cost_bps_roundtrip", "n_steps", "ann_ret", "ann_vol", "sharpe", "max_dd", "avg_turnover"]
        );
    }
}
