//! Full pipeline command implementation.

use std::path::Path;

use anyhow::Result;
use faro::eval::{DEFAULT_COST_GRID, sensitivity_frame};
use faro::{Pipeline, ResearchConfig};

use crate::cmd::backtest::print_outcome;
use crate::cmd::eval::{print_report, write_report};
use crate::cmd::sensitivity::print_rows;
use crate::cmd::{banner, load_prepared};
use crate::{InputArgs, data};

/// Runs every stage and writes all tables under `out_dir`.
pub(crate) fn run_all(
    config: ResearchConfig,
    input: &InputArgs,
    out_dir: &Path,
    costs: Option<&[f64]>,
) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let prepared = load_prepared(&pipeline, input)?;
    if !input.prepared {
        data::write_csv(prepared.to_frame()?, &out_dir.join("prepared.csv"))?;
    }

    banner("Factor Evaluation");
    let report = pipeline.evaluate(&prepared)?;
    print_report(&report);
    write_report(&report, out_dir)?;

    banner("Backtesting");
    let outcome = pipeline.backtest(&prepared)?;
    print_outcome(&outcome);
    data::write_csv(outcome.result.to_frame()?, &out_dir.join("backtest.csv"))?;
    data::write_json(&outcome.summary, &out_dir.join("summary.json"))?;

    banner("Cost Sensitivity");
    let rows = pipeline.cost_sensitivity(&outcome.result, costs.unwrap_or(&DEFAULT_COST_GRID));
    print_rows(&rows);
    data::write_csv(sensitivity_frame(&rows)?, &out_dir.join("cost_sensitivity.csv"))?;

    data::write_json(pipeline.config(), &out_dir.join("config.json"))?;
    println!("All outputs written to {}", out_dir.display());
    Ok(())
}
