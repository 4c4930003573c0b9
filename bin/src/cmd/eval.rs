//! Evaluation command implementation.

use std::path::Path;

use anyhow::Result;
use faro::eval::EvaluationReport;
use faro::{Pipeline, ResearchConfig};

use crate::cmd::{banner, fmt_opt, load_prepared};
use crate::{InputArgs, data};

/// Evaluates the configured factors and writes the diagnostic tables.
pub(crate) fn evaluate_factors(config: ResearchConfig, input: &InputArgs, out_dir: &Path) -> Result<()> {
    banner("Factor Evaluation");

    let pipeline = Pipeline::new(config)?;
    let prepared = load_prepared(&pipeline, input)?;
    let evaluator = pipeline.evaluator(&prepared);
    println!(
        "Thresholds: IC >= {} names, spread >= {} names, {} quantiles",
        evaluator.min_n_ic, evaluator.min_n_spread, evaluator.quantiles
    );
    println!();

    let report = evaluator.evaluate(&prepared, &pipeline.config().factors)?;
    print_report(&report);
    write_report(&report, out_dir)?;
    Ok(())
}

/// Prints the IC summary and decay characteristics.
pub(crate) fn print_report(report: &EvaluationReport) {
    println!(
        "{:<12} {:>4} {:>9} {:>8} {:>8} {:>9} {:>8} {:>8} {:>6}",
        "factor", "h", "ic_mean", "ic_ir", "ic_t", "rank_ic", "rank_ir", "rank_t", "days"
    );
    println!("{}", "-".repeat(80));
    for row in &report.ic_summary {
        println!(
            "{:<12} {:>4} {:>9} {:>8} {:>8} {:>9} {:>8} {:>8} {:>6}",
            row.factor,
            row.h,
            fmt_opt(row.ic.mean, 4),
            fmt_opt(row.ic.ir, 3),
            fmt_opt(row.ic.t_stat, 2),
            fmt_opt(row.rank_ic.mean, 4),
            fmt_opt(row.rank_ic.ir, 3),
            fmt_opt(row.rank_ic.t_stat, 2),
            row.n_days()
        );
    }
    println!();

    println!("Decay:");
    for curve in report.decay_curves() {
        let peak = curve
            .max_ic()
            .map_or_else(|| "n/a".to_string(), |(h, ic)| format!("{ic:.4} @ {h}d"));
        println!(
            "  {:<12} peak {:<16} half-life {:<8} monotonic {}",
            curve.factor,
            peak,
            fmt_opt(curve.half_life(), 1),
            curve.is_monotonic()
        );
    }
    println!();
}

/// Writes `ic_summary.csv`, `decay.csv` and `spread.csv` under `out_dir`.
pub(crate) fn write_report(report: &EvaluationReport, out_dir: &Path) -> Result<()> {
    data::write_csv(report.ic_summary_frame()?, &out_dir.join("ic_summary.csv"))?;
    data::write_csv(report.decay_frame()?, &out_dir.join("decay.csv"))?;
    data::write_csv(report.spread_frame()?, &out_dir.join("spread.csv"))?;
    println!("Evaluation tables written to {}", out_dir.display());
    Ok(())
}
