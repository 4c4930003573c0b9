//! Factor construction and cross-sectional preprocessing for faro.
//!
//! This crate turns a raw price/volume [`Panel`](faro_traits::Panel) into an
//! evaluation-ready one:
//! - Labels: trailing `ret_1d` and forward `fwd_ret_{h}d` returns per ticker
//! - Factors: momentum, reversal, volatility, liquidity and volume surprise,
//!   each computed over a single ticker's history with full rolling windows
//! - Filtering: minimum trailing history and realized forward labels
//! - Normalization: per-date winsorization and z-scoring
//!
//! # Example
//!
//! ```
//! use faro_factors::registry::available_factors;
//! use faro_factors::{CrossSectionalNormalizer, FactorSet, HistoryFilter};
//!
//! let names: Vec<&str> = available_factors().iter().map(|f| f.name).collect();
//! let factors = FactorSet::from_names(&names, "adj_close").unwrap();
//! let filter = HistoryFilter::new(60, vec![1, 5, 10, 20]);
//! let normalizer = CrossSectionalNormalizer::new(0.01).unwrap();
//! # let _ = (factors, filter, normalizer);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod construct;
pub mod filter;
pub mod liquidity;
pub mod momentum;
pub mod normalize;
pub mod registry;
pub mod returns;
pub mod rolling;
pub mod volatility;
pub mod volume;

// Re-export key types
pub use construct::FactorSet;
pub use filter::HistoryFilter;
pub use normalize::CrossSectionalNormalizer;
pub use registry::{FactorCategory, FactorInfo, create_factor};
pub use returns::{attach_returns, resolve_price_field};
