//! Batch evaluation of factors across forward-return horizons.
//!
//! [`FactorEvaluator`] runs the linear IC, rank IC and quantile-spread
//! evaluators over every factor × horizon pair and collects the diagnostic
//! tables in an [`EvaluationReport`].

use log::info;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use faro_traits::panel::{date_column, optional_column};
use faro_traits::{Date, FaroError, Panel, ResearchConfig, Result, columns, fwd_ret_column};

use crate::decay::{DecayCurve, DecayRow};
use crate::ic::{CorrelationKind, ic_series};
use crate::metrics::IcSummary;
use crate::spread::quantile_spread;

/// Linear and rank IC summaries of one factor at one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcSummaryRow {
    /// Factor column.
    pub factor: String,
    /// Forward-return horizon in trading days.
    pub h: usize,
    /// Pearson IC summary.
    pub ic: IcSummary,
    /// Spearman IC summary.
    pub rank_ic: IcSummary,
}

impl IcSummaryRow {
    /// Dates with a defined linear IC.
    pub fn n_days(&self) -> usize {
        self.ic.n_days
    }
}

/// Quantile spread of one factor at one horizon on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRow {
    /// Cross-section date.
    pub date: Date,
    /// Factor column.
    pub factor: String,
    /// Forward-return horizon in trading days.
    pub h: usize,
    /// Top-bucket mean return minus bottom-bucket mean return.
    pub top_minus_bottom: f64,
}

/// Diagnostic tables of a batch evaluation, sorted by `(factor, h)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// IC summary per factor and horizon.
    pub ic_summary: Vec<IcSummaryRow>,
    /// Rank-IC decay per factor and horizon.
    pub decay: Vec<DecayRow>,
    /// Per-date quantile spreads, by factor, horizon and date.
    pub spread: Vec<SpreadRow>,
}

impl EvaluationReport {
    /// IC summary of `factor` at horizon `h`.
    pub fn summary(&self, factor: &str, h: usize) -> Option<&IcSummaryRow> {
        self.ic_summary
            .iter()
            .find(|row| row.factor == factor && row.h == h)
    }

    /// Factors present in the report, in report order.
    pub fn factors(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ic_summary.iter().map(|r| r.factor.as_str()).collect();
        names.dedup();
        names
    }

    /// One decay curve per factor.
    pub fn decay_curves(&self) -> Vec<DecayCurve> {
        self.factors()
            .into_iter()
            .map(|factor| DecayCurve::from_rows(factor, &self.decay))
            .collect()
    }

    /// IC summary table.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the assembled columns.
    pub fn ic_summary_frame(&self) -> Result<DataFrame> {
        let rows = &self.ic_summary;
        let stat = |f: fn(&IcSummaryRow) -> Option<f64>| -> Vec<Option<f64>> { rows.iter().map(f).collect() };

        Ok(DataFrame::new(vec![
            Series::new("factor".into(), rows.iter().map(|r| r.factor.clone()).collect::<Vec<_>>()).into(),
            Series::new("h".into(), rows.iter().map(|r| r.h as u64).collect::<Vec<_>>()).into(),
            optional_column("ic_mean", &stat(|r| r.ic.mean)),
            optional_column("ic_std", &stat(|r| r.ic.std)),
            optional_column("ic_ir", &stat(|r| r.ic.ir)),
            optional_column("ic_t", &stat(|r| r.ic.t_stat)),
            optional_column("rank_ic_mean", &stat(|r| r.rank_ic.mean)),
            optional_column("rank_ic_std", &stat(|r| r.rank_ic.std)),
            optional_column("rank_ic_ir", &stat(|r| r.rank_ic.ir)),
            optional_column("rank_ic_t", &stat(|r| r.rank_ic.t_stat)),
            Series::new("n_days".into(), rows.iter().map(|r| r.n_days() as u64).collect::<Vec<_>>()).into(),
            optional_column("ic_hit_rate", &stat(|r| r.ic.hit_rate)),
            optional_column("rank_ic_hit_rate", &stat(|r| r.rank_ic.hit_rate)),
        ])?)
    }

    /// Decay table.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the assembled columns.
    pub fn decay_frame(&self) -> Result<DataFrame> {
        let rows = &self.decay;
        let stat = |f: fn(&DecayRow) -> Option<f64>| -> Vec<Option<f64>> { rows.iter().map(f).collect() };

        Ok(DataFrame::new(vec![
            Series::new("factor".into(), rows.iter().map(|r| r.factor.clone()).collect::<Vec<_>>()).into(),
            Series::new("h".into(), rows.iter().map(|r| r.h as u64).collect::<Vec<_>>()).into(),
            optional_column("rank_ic_mean", &stat(|r| r.rank_ic_mean)),
            optional_column("rank_ic_ir", &stat(|r| r.rank_ic_ir)),
            optional_column("rank_ic_t", &stat(|r| r.rank_ic_t)),
            Series::new("n_days".into(), rows.iter().map(|r| r.n_days as u64).collect::<Vec<_>>()).into(),
        ])?)
    }

    /// Quantile-spread table.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the assembled columns.
    pub fn spread_frame(&self) -> Result<DataFrame> {
        let rows = &self.spread;
        let dates: Vec<Date> = rows.iter().map(|r| r.date).collect();
        let spreads: Vec<Option<f64>> = rows.iter().map(|r| Some(r.top_minus_bottom)).collect();

        Ok(DataFrame::new(vec![
            date_column(columns::DATE, &dates)?,
            Series::new("factor".into(), rows.iter().map(|r| r.factor.clone()).collect::<Vec<_>>()).into(),
            Series::new("h".into(), rows.iter().map(|r| r.h as u64).collect::<Vec<_>>()).into(),
            optional_column("top_minus_bottom", &spreads),
        ])?)
    }
}

/// Runs IC and quantile-spread evaluation over a grid of factors and horizons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorEvaluator {
    /// Forward-return horizons.
    pub horizons: Vec<usize>,
    /// Number of quantile buckets.
    pub quantiles: usize,
    /// Minimum cross-section for an IC observation.
    pub min_n_ic: usize,
    /// Minimum cross-section for a spread observation.
    pub min_n_spread: usize,
}

impl FactorEvaluator {
    /// Evaluator for a universe of `n_tickers` distinct tickers, applying the
    /// configured thresholds or their adaptive defaults.
    pub fn from_config(config: &ResearchConfig, n_tickers: usize) -> Self {
        Self {
            horizons: config.horizons.clone(),
            quantiles: config.quantiles,
            min_n_ic: config.ic_threshold(n_tickers),
            min_n_spread: config.spread_threshold(n_tickers),
        }
    }

    /// Evaluates `factor` against the `h`-day forward return.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] if the factor or label is absent.
    pub fn evaluate_pair(
        &self,
        panel: &Panel,
        factor: &str,
        h: usize,
    ) -> Result<(IcSummaryRow, Vec<SpreadRow>)> {
        let label = fwd_ret_column(h);
        let linear = ic_series(panel, factor, &label, CorrelationKind::Linear, self.min_n_ic)?;
        let rank = ic_series(panel, factor, &label, CorrelationKind::Rank, self.min_n_ic)?;
        let spread = quantile_spread(panel, factor, &label, self.quantiles, self.min_n_spread)?;

        let summary = IcSummaryRow {
            factor: factor.to_string(),
            h,
            ic: IcSummary::from_observations(&linear),
            rank_ic: IcSummary::from_observations(&rank),
        };
        let spread = spread
            .into_iter()
            .map(|obs| SpreadRow {
                date: obs.date,
                factor: factor.to_string(),
                h,
                top_minus_bottom: obs.top_minus_bottom,
            })
            .collect();
        Ok((summary, spread))
    }

    /// Evaluates every factor at every horizon.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidConfig`] for an empty factor list and
    /// [`FaroError::MissingColumn`] for an absent factor or label.
    pub fn evaluate<S: AsRef<str> + Sync>(&self, panel: &Panel, factors: &[S]) -> Result<EvaluationReport> {
        if factors.is_empty() {
            return Err(FaroError::InvalidConfig("no factors to evaluate".to_string()));
        }

        let mut names: Vec<&str> = factors.iter().map(AsRef::as_ref).collect();
        names.sort_unstable();
        names.dedup();
        let mut horizons = self.horizons.clone();
        horizons.sort_unstable();
        horizons.dedup();

        let grid: Vec<(&str, usize)> = names
            .iter()
            .flat_map(|&f| horizons.iter().map(move |&h| (f, h)))
            .collect();

        let evaluated = grid
            .par_iter()
            .map(|&(factor, h)| self.evaluate_pair(panel, factor, h))
            .collect::<Result<Vec<_>>>()?;

        let mut report = EvaluationReport::default();
        for (summary, spread) in evaluated {
            report
                .decay
                .push(DecayRow::from_summary(summary.factor.clone(), summary.h, &summary.rank_ic));
            report.ic_summary.push(summary);
            report.spread.extend(spread);
        }

        info!(
            "Evaluated {} factors x {} horizons: {} spread rows",
            names.len(),
            horizons.len(),
            report.spread.len()
        );
        Ok(report)
    }
}
