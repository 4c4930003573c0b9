//! Momentum and reversal factors based on trailing price changes.
//!
//! - `mom_k`: percentage price change over the trailing `k` observations
//! - `rev_k`: the negated `k`-day price change (short-term reversal)

mod price;
mod reversal;

pub use price::{Momentum, MomentumConfig};
pub use reversal::{Reversal, ReversalConfig};
