//! Research configuration shared by every stage of the engine.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{FaroError, Result, columns};

/// Scalar and list parameters consumed by factor construction, evaluation
/// and backtesting.
///
/// Missing fields fall back to [`ResearchConfig::default`] when deserializing.
///
/// # Example
///
/// ```
/// use faro_traits::ResearchConfig;
///
/// let config = ResearchConfig::from_json_str(r#"{ "quantiles": 10, "cost_bps_roundtrip": 20.0 }"#)
///     .unwrap();
/// assert_eq!(config.quantiles, 10);
/// assert_eq!(config.rebalance_every, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Canonical price column; `close` is used when it is absent from the panel.
    pub price_field: String,
    /// Winsorization tail fraction, in `(0, 0.5)`.
    pub winsor_pct: f64,
    /// Minimum number of preceding observations per ticker.
    pub min_history_days: usize,
    /// Forward-return horizons in trading days.
    pub horizons: Vec<usize>,
    /// Number of quantile buckets.
    pub quantiles: usize,
    /// Round-trip transaction cost in basis points.
    pub cost_bps_roundtrip: f64,
    /// Rebalance cadence (and holding period) in trading days.
    pub rebalance_every: usize,
    /// Trading days per year used for annualization.
    pub trading_days_per_year: usize,
    /// Floor on the backtest cross-section size (the quantile count is the other floor).
    pub min_backtest_population: usize,
    /// Factor traded by the backtest.
    pub backtest_factor: String,
    /// Factors built, normalized and evaluated.
    pub factors: Vec<String>,
    /// Minimum cross-section for an IC observation; adaptive when unset.
    pub min_n_ic: Option<usize>,
    /// Minimum cross-section for a quantile-spread observation; adaptive when unset.
    pub min_n_spread: Option<usize>,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            price_field: columns::ADJ_CLOSE.to_string(),
            winsor_pct: 0.01,
            min_history_days: 60,
            horizons: vec![1, 5, 10, 20],
            quantiles: 5,
            cost_bps_roundtrip: 10.0,
            rebalance_every: 5,
            trading_days_per_year: 252,
            min_backtest_population: 30,
            backtest_factor: "rev_5".to_string(),
            factors: ["mom_20", "mom_60", "rev_5", "vol_20", "amihud_20", "volu_z_20"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_n_ic: None,
            min_n_spread: None,
        }
    }
}

impl ResearchConfig {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::Json`] on malformed JSON and
    /// [`FaroError::InvalidConfig`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingArtifact`] if the file does not exist.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FaroError::MissingArtifact(format!(
                "config file {}",
                path.display()
            )));
        }
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Checks every parameter against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(FaroError::InvalidConfig(msg));

        if !(self.winsor_pct > 0.0 && self.winsor_pct < 0.5) {
            return invalid(format!("winsor_pct must be in (0, 0.5), got {}", self.winsor_pct));
        }
        if self.horizons.is_empty() {
            return invalid("horizons must not be empty".to_string());
        }
        if self.horizons.contains(&0) {
            return invalid("horizons must be positive".to_string());
        }
        if self.quantiles < 2 {
            return invalid(format!("quantiles must be >= 2, got {}", self.quantiles));
        }
        if self.rebalance_every == 0 {
            return invalid("rebalance_every must be positive".to_string());
        }
        if !self.horizons.contains(&self.rebalance_every) {
            return invalid(format!(
                "rebalance_every ({}) must be one of the horizons {:?}",
                self.rebalance_every, self.horizons
            ));
        }
        if !(self.cost_bps_roundtrip.is_finite() && self.cost_bps_roundtrip >= 0.0) {
            return invalid(format!(
                "cost_bps_roundtrip must be a non-negative number, got {}",
                self.cost_bps_roundtrip
            ));
        }
        if self.trading_days_per_year == 0 {
            return invalid("trading_days_per_year must be positive".to_string());
        }
        if let Some(min_n) = self.min_n_spread
            && min_n < self.quantiles
        {
            return invalid(format!(
                "min_n_spread ({min_n}) must be at least quantiles ({})",
                self.quantiles
            ));
        }
        if self.factors.is_empty() {
            return invalid("factors must not be empty".to_string());
        }
        Ok(())
    }

    /// IC population threshold: the override, or `max(8, min(30, n_tickers))`.
    pub fn ic_threshold(&self, n_tickers: usize) -> usize {
        self.min_n_ic.unwrap_or_else(|| n_tickers.clamp(8, 30))
    }

    /// Quantile-spread population threshold: the override, or
    /// `max(quantiles, ic_threshold)`.
    pub fn spread_threshold(&self, n_tickers: usize) -> usize {
        self.min_n_spread
            .unwrap_or_else(|| self.quantiles.max(self.ic_threshold(n_tickers)))
    }
}
