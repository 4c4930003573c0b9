//! End-to-end research pipeline.
//!
//! [`Pipeline::prepare`] turns a raw price/volume panel into an
//! evaluation-ready one (labels, factors, history filter, normalization).
//! Evaluation and backtesting then read that prepared panel.

use log::info;
use serde::{Deserialize, Serialize};

use faro_eval::{
    Backtest, BacktestConfig, BacktestResult, CostSensitivityRow, EvaluationReport,
    FactorEvaluator, PerformanceSummary, cost_sensitivity,
};
use faro_factors::{
    CrossSectionalNormalizer, FactorSet, HistoryFilter, attach_returns, resolve_price_field,
};
use faro_traits::{Panel, ResearchConfig, Result};

/// A backtest trajectory with its performance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    /// Per-rebalance trajectory.
    pub result: BacktestResult,
    /// Annualized statistics of the trajectory.
    pub summary: PerformanceSummary,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Evaluation-ready panel.
    pub prepared: Panel,
    /// IC, decay and spread tables.
    pub report: EvaluationReport,
    /// Backtest of the configured factor.
    pub backtest: BacktestOutcome,
    /// Backtest performance across round-trip costs.
    pub sensitivity: Vec<CostSensitivityRow>,
}

/// Research pipeline driven by one [`ResearchConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: ResearchConfig,
}

impl Pipeline {
    /// Creates a pipeline after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`faro_traits::FaroError::InvalidConfig`] for an out-of-range parameter.
    pub fn new(config: ResearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub const fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Factors built by [`Pipeline::prepare`]: the configured factors plus
    /// the backtest factor, without duplicates.
    pub fn factor_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.config.factors.iter().map(String::as_str).collect();
        if !names.contains(&self.config.backtest_factor.as_str()) {
            names.push(&self.config.backtest_factor);
        }
        names
    }

    /// Labels, factors, history filter and cross-sectional normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing, a factor name is
    /// unknown or the configuration is invalid.
    pub fn prepare(&self, raw: &Panel) -> Result<Panel> {
        let config = &self.config;
        let names = self.factor_names();

        let panel = raw.sort_by_entity();
        let price_field = resolve_price_field(&panel, &config.price_field)?;
        let labelled = attach_returns(&panel, price_field, &config.horizons)?;

        let factors = FactorSet::from_names(&names, price_field)?;
        let with_factors = factors.compute(&labelled)?;

        let filtered =
            HistoryFilter::new(config.min_history_days, config.horizons.clone()).apply(&with_factors)?;
        let normalized = CrossSectionalNormalizer::new(config.winsor_pct)?.normalize(&filtered, &names)?;

        info!(
            "Prepared panel: {} raw rows -> {} rows, {} dates, {} tickers",
            raw.len(),
            normalized.len(),
            normalized.unique_dates().len(),
            normalized.n_tickers()
        );
        Ok(normalized)
    }

    /// Evaluator sized to the prepared universe.
    pub fn evaluator(&self, prepared: &Panel) -> FactorEvaluator {
        FactorEvaluator::from_config(&self.config, prepared.n_tickers())
    }

    /// IC summary, decay and quantile-spread tables for the configured factors.
    ///
    /// # Errors
    ///
    /// Returns an error if a factor or label column is missing.
    pub fn evaluate(&self, prepared: &Panel) -> Result<EvaluationReport> {
        self.evaluator(prepared).evaluate(prepared, &self.config.factors)
    }

    /// Backtests the configured factor.
    ///
    /// # Errors
    ///
    /// Returns [`faro_traits::FaroError::EmptyResult`] if no rebalance date
    /// has a large enough cross-section.
    pub fn backtest(&self, prepared: &Panel) -> Result<BacktestOutcome> {
        let result = Backtest::new(BacktestConfig::from_research(&self.config)).run(prepared)?;
        let summary = result.summary(self.config.trading_days_per_year);
        info!("Backtest {}: {summary}", self.config.backtest_factor);
        Ok(BacktestOutcome { result, summary })
    }

    /// Re-prices a backtest at every cost in `costs_bps`.
    pub fn cost_sensitivity(&self, result: &BacktestResult, costs_bps: &[f64]) -> Vec<CostSensitivityRow> {
        cost_sensitivity(result, costs_bps, self.config.trading_days_per_year)
    }

    /// Prepare, evaluate, backtest and sweep costs in one call.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn run(&self, raw: &Panel, costs_bps: &[f64]) -> Result<PipelineOutput> {
        let prepared = self.prepare(raw)?;
        let report = self.evaluate(&prepared)?;
        let backtest = self.backtest(&prepared)?;
        let sensitivity = self.cost_sensitivity(&backtest.result, costs_bps);

        Ok(PipelineOutput {
            prepared,
            report,
            backtest,
            sensitivity,
        })
    }
}
