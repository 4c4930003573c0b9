//! Trailing price momentum.

use serde::{Deserialize, Serialize};

use faro_traits::{EntityHistory, Factor, Result, columns};

use crate::rolling::pct_change;

/// Configuration for the price momentum factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Number of trading days to look back (default: 20 days ≈ 1 month)
    pub lookback_days: usize,

    /// Price column the change is measured on
    pub price_field: String,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback_days: 20,
            price_field: columns::ADJ_CLOSE.to_string(),
        }
    }
}

/// Price momentum: `price[t] / price[t - k] - 1`.
///
/// Positive values indicate tickers with strong recent performance. The
/// first `k` observations of every ticker are missing.
///
/// # Example
///
/// ```
/// use faro_factors::momentum::{Momentum, MomentumConfig};
/// use faro_traits::Factor;
///
/// let factor = Momentum::new(MomentumConfig { lookback_days: 60, ..Default::default() });
/// assert_eq!(factor.name(), "mom_60");
/// ```
#[derive(Debug, Clone)]
pub struct Momentum {
    config: MomentumConfig,
    name: String,
}

impl Momentum {
    /// Create a new momentum factor with the given configuration.
    #[must_use]
    pub fn new(config: MomentumConfig) -> Self {
        let name = format!("mom_{}", config.lookback_days);
        Self { config, name }
    }

    /// Get the lookback period in days.
    #[must_use]
    pub const fn lookback_days(&self) -> usize {
        self.config.lookback_days
    }
}

impl Default for Momentum {
    fn default() -> Self {
        Self::new(MomentumConfig::default())
    }
}

impl Factor for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.config.lookback_days
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![self.config.price_field.as_str()]
    }

    fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
        let prices = history.series(&self.config.price_field)?;
        Ok(pct_change(&prices, self.config.lookback_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use faro_traits::{Date, Panel};

    #[test]
    fn test_default_config() {
        let factor = Momentum::default();
        assert_eq!(factor.lookback_days(), 20);
        assert_eq!(factor.name(), "mom_20");
        assert_eq!(factor.required_columns(), vec!["adj_close"]);
    }

    #[test]
    fn test_monotonic_series_exact() {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<Date> = (0..60).map(|i| start + Duration::days(i)).collect();
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + f64::from(i)).collect();
        let panel = Panel::new(dates, vec!["AAA".into(); 60])
            .unwrap()
            .with_column("adj_close", prices.clone())
            .unwrap();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);

        let values = Momentum::default().compute(&history).unwrap();
        assert!(values[..20].iter().all(|x| x.is_nan()));
        assert_eq!(values[25], prices[25] / prices[5] - 1.0);
    }
}
