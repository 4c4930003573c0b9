//! Cost sensitivity command implementation.

use std::path::Path;

use anyhow::Result;
use faro::eval::{CostSensitivityRow, DEFAULT_COST_GRID, sensitivity_frame};
use faro::{Pipeline, ResearchConfig};

use crate::cmd::{banner, fmt_opt, load_prepared};
use crate::{InputArgs, data};

/// Backtests once and re-prices the trajectory at each cost.
pub(crate) fn sweep_costs(
    config: ResearchConfig,
    input: &InputArgs,
    costs: Option<&[f64]>,
    output: Option<&Path>,
) -> Result<()> {
    banner("Cost Sensitivity");

    let pipeline = Pipeline::new(config)?;
    let prepared = load_prepared(&pipeline, input)?;
    let outcome = pipeline.backtest(&prepared)?;
    let rows = pipeline.cost_sensitivity(&outcome.result, costs.unwrap_or(&DEFAULT_COST_GRID));

    print_rows(&rows);
    if let Some(path) = output {
        data::write_csv(sensitivity_frame(&rows)?, path)?;
    }
    Ok(())
}

/// Prints one line per cost.
pub(crate) fn print_rows(rows: &[CostSensitivityRow]) {
    println!(
        "{:>8} {:>6} {:>9} {:>9} {:>8} {:>9} {:>9}",
        "bps", "steps", "ann_ret", "ann_vol", "sharpe", "max_dd", "turnover"
    );
    println!("{}", "-".repeat(64));
    for row in rows {
        let s = &row.summary;
        println!(
            "{:>8.1} {:>6} {:>9} {:>9} {:>8} {:>9} {:>9}",
            row.cost_bps_roundtrip,
            s.n_steps,
            fmt_opt(s.ann_return, 4),
            fmt_opt(s.ann_vol, 4),
            fmt_opt(s.sharpe, 3),
            fmt_opt(s.max_drawdown, 4),
            fmt_opt(s.avg_turnover, 3)
        );
    }
    println!();
}
