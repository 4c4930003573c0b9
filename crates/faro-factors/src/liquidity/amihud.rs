//! Amihud illiquidity.

use serde::{Deserialize, Serialize};

use faro_traits::{EntityHistory, Factor, Result, columns};

use crate::rolling::rolling_mean;

/// Configuration for the Amihud illiquidity factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmihudConfig {
    /// Rolling window in trading days (default: 20)
    pub window: usize,
}

impl Default for AmihudConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// Rolling mean of `|ret_1d| / (close * volume)`.
///
/// A day with zero dollar volume has an undefined illiquidity ratio and
/// leaves every window containing it missing.
///
/// # Example
///
/// ```
/// use faro_factors::liquidity::Amihud;
/// use faro_traits::Factor;
///
/// let factor = Amihud::default();
/// assert_eq!(factor.name(), "amihud_20");
/// assert_eq!(factor.required_columns(), vec!["ret_1d", "close", "volume"]);
/// ```
#[derive(Debug, Clone)]
pub struct Amihud {
    config: AmihudConfig,
    name: String,
}

impl Amihud {
    /// Create a new Amihud factor.
    #[must_use]
    pub fn new(config: AmihudConfig) -> Self {
        Self {
            config,
            name: format!("amihud_{}", config.window),
        }
    }
}

impl Default for Amihud {
    fn default() -> Self {
        Self::new(AmihudConfig::default())
    }
}

impl Factor for Amihud {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![columns::RET_1D, columns::CLOSE, columns::VOLUME]
    }

    fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
        let returns = history.series(columns::RET_1D)?;
        let close = history.series(columns::CLOSE)?;
        let volume = history.series(columns::VOLUME)?;

        let daily: Vec<f64> = returns
            .iter()
            .zip(close.iter().zip(&volume))
            .map(|(r, (c, v))| {
                let dollar_volume = c * v;
                if dollar_volume == 0.0 {
                    f64::NAN
                } else {
                    r.abs() / dollar_volume
                }
            })
            .collect();

        Ok(rolling_mean(&daily, self.config.window))
    }
}
