//! Prepare command implementation.

use std::path::Path;

use anyhow::Result;
use faro::{Pipeline, ResearchConfig};

use crate::cmd::banner;
use crate::{InputArgs, data};

/// Turns a raw panel into an evaluation-ready one and writes it as CSV.
pub(crate) fn prepare_panel(config: ResearchConfig, input: &InputArgs, output: &Path) -> Result<()> {
    banner("Panel Preparation");

    let raw = data::read_panel(&input.input)?;
    let pipeline = Pipeline::new(config)?;
    let prepared = pipeline.prepare(&raw)?;

    println!("Factors:  {}", pipeline.factor_names().join(", "));
    println!("Rows:     {} -> {}", raw.len(), prepared.len());
    println!("Dates:    {}", prepared.unique_dates().len());
    println!("Tickers:  {}", prepared.n_tickers());
    println!();

    data::write_csv(prepared.to_frame()?, output)?;
    println!("Prepared panel written to {}", output.display());
    Ok(())
}
