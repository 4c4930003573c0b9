#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/faro/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Panel, configuration, errors, the [`Factor`] trait and statistics
//! - [`factors`] - Labels, factor families, filtering and normalization
//! - [`eval`] - IC, decay, quantile spreads, backtesting and performance
//! - [`pipeline`] - The end-to-end [`Pipeline`]
//!
//! ## Architecture
//!
//! 1. **Labels** attach trailing and forward returns per ticker
//! 2. **Factors** compute scores over each ticker's own history
//! 3. **Preprocessing** filters short histories and z-scores per date
//! 4. **Evaluators** measure predictive power (IC, decay, spread)
//! 5. **Backtests** trade the quantile portfolio of one factor net of costs

/// Version information for the faro crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod pipeline;

// ============================================================================
// Core Types
// ============================================================================

/// Shared primitives.
///
/// - [`Panel`] - Long-format `(date, ticker)` table
/// - [`Factor`] - Per-ticker factor computation
/// - [`ResearchConfig`] - Every tunable parameter
pub mod traits {
    pub use faro_traits::*;
}

pub use faro_traits::{
    Date, FaroError, Factor, Panel, ResearchConfig, Result, Ticker, fwd_ret_column,
};

// ============================================================================
// Factor Construction
// ============================================================================

/// Factor construction and cross-sectional preprocessing.
///
/// ## Factor Families
///
/// - **Momentum** `mom_k`: trailing `k`-day price change
/// - **Reversal** `rev_k`: negated trailing `k`-day price change
/// - **Volatility** `vol_k`: rolling standard deviation of daily returns
/// - **Liquidity** `amihud_k`: rolling mean of `|return| / dollar volume`
/// - **Volume** `volu_z_k`: volume relative to its rolling mean, minus one
///
/// # Example
///
/// ```
/// use faro::factors::create_factor;
/// use faro::Factor;
///
/// let factor = create_factor("mom_60", "adj_close").unwrap();
/// assert_eq!(factor.lookback(), 60);
/// ```
pub mod factors {
    pub use faro_factors::*;
}

// ============================================================================
// Factor Evaluation
// ============================================================================

/// Factor evaluation and backtesting.
///
/// ### Information Coefficient (IC)
///
/// Correlation between factor values and forward returns, per date:
///
/// ```text
/// IC_t = corr(factor_t, fwd_ret_{h}d_t)
/// ```
///
/// ### Information Ratio (IR)
///
/// ```text
/// IR = mean(IC) / std(IC)
/// ```
///
/// ### Turnover
///
/// Half the L1 distance between consecutive rebalance weights.
pub mod eval {
    pub use faro_eval::*;
}

pub use faro_eval::{BacktestResult, EvaluationReport, PerformanceSummary};
pub use pipeline::{BacktestOutcome, Pipeline, PipelineOutput};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use faro::prelude::*;
/// ```
pub mod prelude {
    pub use crate::pipeline::{BacktestOutcome, Pipeline, PipelineOutput};
    pub use crate::{Factor, FaroError, Panel, ResearchConfig, Result};
}
