//! Short-term reversal.

use serde::{Deserialize, Serialize};

use faro_traits::{EntityHistory, Factor, Result, columns};

use crate::rolling::pct_change;

/// Configuration for the reversal factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalConfig {
    /// Number of trading days to look back (default: 5 days ≈ 1 week)
    pub lookback_days: usize,

    /// Price column the change is measured on
    pub price_field: String,
}

impl Default for ReversalConfig {
    fn default() -> Self {
        Self {
            lookback_days: 5,
            price_field: columns::ADJ_CLOSE.to_string(),
        }
    }
}

/// Reversal: the negated `k`-day price change.
///
/// Recent losers score high, so the long book buys them.
#[derive(Debug, Clone)]
pub struct Reversal {
    config: ReversalConfig,
    name: String,
}

impl Reversal {
    /// Create a new reversal factor with the given configuration.
    #[must_use]
    pub fn new(config: ReversalConfig) -> Self {
        let name = format!("rev_{}", config.lookback_days);
        Self { config, name }
    }
}

impl Default for Reversal {
    fn default() -> Self {
        Self::new(ReversalConfig::default())
    }
}

impl Factor for Reversal {
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
        Ok(pct_change(&prices, self.config.lookback_days)
            .into_iter()
            .map(|x| -x)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faro_traits::{Date, Panel};

    #[test]
    fn test_reversal_negates_momentum() {
        let dates: Vec<Date> = (1..=7).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
        let prices = vec![100.0, 90.0, 95.0, 97.0, 99.0, 80.0, 88.0];
        let panel = Panel::new(dates, vec!["AAA".into(); 7])
            .unwrap()
            .with_column("adj_close", prices)
            .unwrap();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);

        let factor = Reversal::default();
        let values = factor.compute(&history).unwrap();

        assert_eq!(factor.name(), "rev_5");
        assert!(values[..5].iter().all(|x| x.is_nan()));
        assert_relative_eq!(values[5], 0.2, epsilon = 1e-12);
        assert_relative_eq!(values[6], -(88.0 / 90.0 - 1.0), epsilon = 1e-12);
    }
}
