//! Realized volatility of daily returns.

use serde::{Deserialize, Serialize};

use faro_traits::{EntityHistory, Factor, Result, columns};

use crate::rolling::rolling_std;

/// Configuration for the realized volatility factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealizedVolatilityConfig {
    /// Rolling window in trading days (default: 20)
    pub window: usize,
}

impl Default for RealizedVolatilityConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// Rolling sample standard deviation of `ret_1d`.
///
/// Requires a full window of finite returns; reads the `ret_1d` label, so
/// returns must be attached before factors are built.
#[derive(Debug, Clone)]
pub struct RealizedVolatility {
    config: RealizedVolatilityConfig,
    name: String,
}

impl RealizedVolatility {
    /// Create a new realized volatility factor.
    #[must_use]
    pub fn new(config: RealizedVolatilityConfig) -> Self {
        Self {
            config,
            name: format!("vol_{}", config.window),
        }
    }
}

impl Default for RealizedVolatility {
    fn default() -> Self {
        Self::new(RealizedVolatilityConfig::default())
    }
}

impl Factor for RealizedVolatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![columns::RET_1D]
    }

    fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
        let returns = history.series(columns::RET_1D)?;
        Ok(rolling_std(&returns, self.config.window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faro_traits::{Date, Panel};

    #[test]
    fn test_volatility_window() {
        let dates: Vec<Date> = (1..=5).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
        let returns = vec![f64::NAN, 0.01, -0.01, 0.03, -0.03];
        let panel = Panel::new(dates, vec!["AAA".into(); 5])
            .unwrap()
            .with_column("ret_1d", returns)
            .unwrap();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);

        let factor = RealizedVolatility::new(RealizedVolatilityConfig { window: 2 });
        let values = factor.compute(&history).unwrap();

        assert_eq!(factor.name(), "vol_2");
        assert!(values[0].is_nan());
        // Window [NaN, 0.01] is not fully populated.
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 0.0002_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(values[4], 0.0018_f64.sqrt(), epsilon = 1e-12);
    }
}
