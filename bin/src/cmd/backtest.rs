//! Backtest command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use faro::{BacktestOutcome, Pipeline, ResearchConfig};

use crate::cmd::{banner, fmt_opt, fmt_pct, load_prepared};
use crate::{InputArgs, data};

/// Backtests the configured factor and reports its performance.
pub(crate) fn run_backtest(
    config: ResearchConfig,
    input: &InputArgs,
    output: Option<&Path>,
    format: &str,
) -> Result<()> {
    if !matches!(format, "text" | "json") {
        bail!("unknown output format '{format}' (expected text or json)");
    }

    let pipeline = Pipeline::new(config)?;
    let prepared = load_prepared(&pipeline, input)?;
    let outcome = pipeline.backtest(&prepared)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        banner("Backtesting");
        print_outcome(&outcome);
    }

    if let Some(path) = output {
        data::write_csv(outcome.result.to_frame()?, path)?;
    }
    Ok(())
}

/// Prints the backtest configuration and performance summary.
pub(crate) fn print_outcome(outcome: &BacktestOutcome) {
    let config = &outcome.result.config;
    let summary = &outcome.summary;

    println!("Factor:      {}", config.factor);
    println!("Quantiles:   {}", config.quantiles);
    println!("Rebalance:   every {} days", config.rebalance_every);
    println!("Cost:        {} bps round trip", config.cost_bps_roundtrip);
    println!();
    println!("Steps:           {}", summary.n_steps);
    println!("Ann. return:     {}", fmt_pct(summary.ann_return));
    println!("Ann. volatility: {}", fmt_pct(summary.ann_vol));
    println!("Sharpe:          {}", fmt_opt(summary.sharpe, 3));
    println!("Max drawdown:    {}", fmt_pct(summary.max_drawdown));
    println!("Avg turnover:    {}", fmt_opt(summary.avg_turnover, 3));
    if let Some(last) = outcome.result.records.last() {
        println!("Final equity:    {:.4} ({})", last.equity, last.date);
    }
    println!();
}
