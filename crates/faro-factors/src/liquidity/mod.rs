//! Liquidity factors.

mod amihud;

pub use amihud::{Amihud, AmihudConfig};
