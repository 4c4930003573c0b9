//! Factor evaluation and step backtesting for faro.
//!
//! This crate turns a prepared panel into diagnostics:
//! - Information Coefficient (linear and rank) series and summaries
//! - Rank-IC decay across horizons
//! - Equal-population quantile buckets and top-minus-bottom spreads
//! - A step-rebalanced long/short backtest with turnover-based costs
//! - Performance summaries and a transaction-cost sweep
//!
//! # Example
//!
//! ```rust,ignore
//! use faro_eval::{Backtest, BacktestConfig, FactorEvaluator};
//! use faro_traits::ResearchConfig;
//!
//! let config = ResearchConfig::default();
//! let report = FactorEvaluator::from_config(&config, panel.n_tickers())
//!     .evaluate(&panel, &config.factors)?;
//! let result = Backtest::new(BacktestConfig::from_research(&config)).run(&panel)?;
//! println!("{}", result.summary(config.trading_days_per_year));
//! ```

pub mod backtest;
pub mod bucket;
pub mod cross_section;
pub mod decay;
pub mod evaluator;
pub mod ic;
pub mod metrics;
pub mod performance;
pub mod sensitivity;
pub mod spread;
pub mod weights;

// Re-export main types
pub use backtest::{Backtest, BacktestConfig, BacktestResult, BacktestState, RebalanceRecord};
pub use bucket::quantile_buckets;
pub use decay::{DecayCurve, DecayRow};
pub use evaluator::{EvaluationReport, FactorEvaluator, IcSummaryRow, SpreadRow};
pub use ic::{CorrelationKind, IcObservation, ic_series};
pub use metrics::IcSummary;
pub use performance::PerformanceSummary;
pub use sensitivity::{CostSensitivityRow, DEFAULT_COST_GRID, cost_sensitivity, sensitivity_frame};
pub use spread::{SpreadObservation, quantile_spread};
pub use weights::{PortfolioWeights, build_weights};
