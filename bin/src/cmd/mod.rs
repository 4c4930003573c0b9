//! CLI subcommand modules.
//!
//! This module contains the implementations for all faro CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod eval;
pub(crate) mod factors;
pub(crate) mod prepare;
pub(crate) mod run;
pub(crate) mod sensitivity;

use anyhow::Result;
use faro::{Panel, Pipeline};

use crate::InputArgs;
use crate::data;

/// Loads the input panel, preparing it unless it is already prepared.
pub(crate) fn load_prepared(pipeline: &Pipeline, input: &InputArgs) -> Result<Panel> {
    let panel = data::read_panel(&input.input)?;
    if input.prepared {
        Ok(panel)
    } else {
        Ok(pipeline.prepare(&panel)?)
    }
}

/// Prints a boxed section title.
pub(crate) fn banner(title: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║{title:^62}║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
}

/// Formats an optional statistic, `n/a` when undefined.
pub(crate) fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

/// Formats an optional fraction as a percentage, `n/a` when undefined.
pub(crate) fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}%", v * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_statistics_print_na() {
        assert_eq!(fmt_opt(None, 3), "n/a");
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_pct(Some(-0.1234)), "-12.34%");
        assert_eq!(fmt_pct(None), "n/a");
    }
}
