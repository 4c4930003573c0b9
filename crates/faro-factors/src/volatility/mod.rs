//! Volatility factors.

mod realized;

pub use realized::{RealizedVolatility, RealizedVolatilityConfig};
