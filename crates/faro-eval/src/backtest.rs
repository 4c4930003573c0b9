//! Step-rebalanced long/short backtest.
//!
//! Every `k`-th distinct date is a rebalance date. On each one the factor's
//! quantile portfolio is built, the `k`-day forward return is accrued and a
//! flat cost is charged on turnover. The only state carried between dates is
//! the previous weight vector, threaded through [`step`] as an explicit
//! accumulator.

use std::collections::HashSet;

use log::{debug, info};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use faro_traits::panel::{date_column, float_column};
use faro_traits::{Date, FaroError, Panel, ResearchConfig, Result, Ticker, columns, fwd_ret_column};

use crate::cross_section::CrossSection;
use crate::performance::PerformanceSummary;
use crate::weights::{PortfolioWeights, build_weights};

/// Backtesting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Factor column that drives the weights
    pub factor: String,
    /// Number of quantile buckets
    pub quantiles: usize,
    /// Rebalance cadence and holding period in trading days
    pub rebalance_every: usize,
    /// Round-trip transaction cost (basis points)
    pub cost_bps_roundtrip: f64,
    /// Floor on the cross-section size; the quantile count is the other floor
    pub min_population: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self::from_research(&ResearchConfig::default())
    }
}

impl BacktestConfig {
    /// Takes the backtest parameters from a research configuration.
    pub fn from_research(config: &ResearchConfig) -> Self {
        Self {
            factor: config.backtest_factor.clone(),
            quantiles: config.quantiles,
            rebalance_every: config.rebalance_every,
            cost_bps_roundtrip: config.cost_bps_roundtrip,
            min_population: config.min_backtest_population,
        }
    }

    /// Smallest cross-section that is traded: `max(quantiles, min_population)`.
    pub fn min_cross_section(&self) -> usize {
        self.quantiles.max(self.min_population)
    }

    /// Forward-return column accrued over one holding period.
    pub fn label_column(&self) -> String {
        fwd_ret_column(self.rebalance_every)
    }
}

/// Accumulator threaded through the rebalance fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestState {
    /// Weights of the last traded rebalance; `None` before the first trade.
    pub prev_weights: Option<PortfolioWeights>,
}

/// Cross-section of one rebalance date.
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceInput {
    /// Rebalance date.
    pub date: Date,
    /// Tickers with both a factor value and a forward return.
    pub tickers: Vec<Ticker>,
    /// Factor values aligned with `tickers`.
    pub factor: Vec<f64>,
    /// Holding-period forward returns aligned with `tickers`.
    pub forward_return: Vec<f64>,
}

impl RebalanceInput {
    fn from_section(section: CrossSection, tickers: &[Ticker]) -> Self {
        Self {
            date: section.date,
            tickers: section.rows.iter().map(|&i| tickers[i].clone()).collect(),
            factor: section.factor,
            forward_return: section.label,
        }
    }
}

/// Cost-accounted result of one rebalance, before compounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Rebalance date.
    pub date: Date,
    /// `Σ weight × forward return`.
    pub gross_return: f64,
    /// `cost_bps_roundtrip / 10000 × turnover`.
    pub cost: f64,
    /// `gross_return - cost`.
    pub net_return: f64,
    /// Weight change versus the previous rebalance.
    pub turnover: f64,
}

/// One row of the backtest trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalanceRecord {
    /// Rebalance date.
    pub date: Date,
    /// Holding-period portfolio return before costs.
    pub gross_return: f64,
    /// Transaction cost charged on this rebalance.
    pub cost: f64,
    /// Holding-period portfolio return after costs.
    pub net_return: f64,
    /// Weight change versus the previous rebalance.
    pub turnover: f64,
    /// Cumulative product of `1 + net_return`.
    pub equity: f64,
    /// `equity / running_max(equity) - 1`.
    pub drawdown: f64,
}

/// Every `k`-th date, starting with the first.
pub fn rebalance_dates(dates: &[Date], k: usize) -> Vec<Date> {
    dates.iter().copied().step_by(k.max(1)).collect()
}

/// Cost per unit of turnover for a round-trip cost in basis points.
pub fn cost_rate(cost_bps_roundtrip: f64) -> f64 {
    cost_bps_roundtrip / 10_000.0
}

/// Advances the backtest by one rebalance date.
///
/// A cross-section below [`BacktestConfig::min_cross_section`] emits no
/// record and returns the state unchanged. Otherwise the new weights replace
/// the state's previous weights.
///
/// # Example
///
/// ```
/// use faro_eval::backtest::{BacktestConfig, BacktestState, RebalanceInput, step};
/// use faro_traits::Date;
///
/// let config = BacktestConfig { quantiles: 2, min_population: 2, ..Default::default() };
/// let input = RebalanceInput {
///     date: Date::from_ymd_opt(2024, 1, 2).unwrap(),
///     tickers: vec!["AAA".into(), "BBB".into()],
///     factor: vec![1.0, 2.0],
///     forward_return: vec![-0.01, 0.02],
/// };
///
/// let (state, record) = step(BacktestState::default(), &input, &config);
/// let record = record.unwrap();
/// assert!((record.gross_return - 0.03).abs() < 1e-12);
/// assert_eq!(record.turnover, 2.0);
/// assert!(state.prev_weights.is_some());
/// ```
pub fn step(
    state: BacktestState,
    input: &RebalanceInput,
    config: &BacktestConfig,
) -> (BacktestState, Option<StepRecord>) {
    let min_n = config.min_cross_section();
    if input.tickers.len() < min_n {
        debug!(
            "Backtest {}: skipping {} ({} < {min_n})",
            config.factor,
            input.date,
            input.tickers.len()
        );
        return (state, None);
    }

    let weights = build_weights(&input.tickers, &input.factor, config.quantiles);
    let gross_return = weights.dot(
        input
            .tickers
            .iter()
            .map(String::as_str)
            .zip(input.forward_return.iter().copied()),
    );
    let turnover = weights.turnover_from(state.prev_weights.as_ref());
    let cost = cost_rate(config.cost_bps_roundtrip) * turnover;

    let record = StepRecord {
        date: input.date,
        gross_return,
        cost,
        net_return: gross_return - cost,
        turnover,
    };
    (
        BacktestState {
            prev_weights: Some(weights),
        },
        Some(record),
    )
}

/// Compounds step records into equity and drawdown.
pub fn compound(steps: &[StepRecord]) -> Vec<RebalanceRecord> {
    let mut equity = 1.0;
    let mut peak = f64::NEG_INFINITY;
    steps
        .iter()
        .map(|s| {
            equity *= 1.0 + s.net_return;
            peak = peak.max(equity);
            RebalanceRecord {
                date: s.date,
                gross_return: s.gross_return,
                cost: s.cost,
                net_return: s.net_return,
                turnover: s.turnover,
                equity,
                drawdown: equity / peak - 1.0,
            }
        })
        .collect()
}

/// Backtesting results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Configuration the trajectory was produced with
    pub config: BacktestConfig,
    /// One record per traded rebalance date, in date order
    pub records: Vec<RebalanceRecord>,
}

impl BacktestResult {
    /// Number of traded rebalances.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no rebalance was traded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Performance statistics of the trajectory.
    pub fn summary(&self, trading_days_per_year: usize) -> PerformanceSummary {
        PerformanceSummary::from_records(
            &self.records,
            trading_days_per_year,
            self.config.rebalance_every,
        )
    }

    /// The same trajectory re-priced at another round-trip cost.
    ///
    /// Gross returns and turnover do not depend on the cost, so only costs,
    /// net returns, equity and drawdown change.
    pub fn with_cost(&self, cost_bps_roundtrip: f64) -> Self {
        let rate = cost_rate(cost_bps_roundtrip);
        let steps: Vec<StepRecord> = self
            .records
            .iter()
            .map(|r| {
                let cost = rate * r.turnover;
                StepRecord {
                    date: r.date,
                    gross_return: r.gross_return,
                    cost,
                    net_return: r.gross_return - cost,
                    turnover: r.turnover,
                }
            })
            .collect();

        Self {
            config: BacktestConfig {
                cost_bps_roundtrip,
                ..self.config.clone()
            },
            records: compound(&steps),
        }
    }

    /// Trajectory as a DataFrame: `date, gross_ret_{k}d, cost, net_ret_{k}d,
    /// turnover, equity, drawdown`.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the assembled columns.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let k = self.config.rebalance_every;
        let pick = |f: fn(&RebalanceRecord) -> f64| -> Vec<f64> { self.records.iter().map(f).collect() };
        let dates: Vec<Date> = self.records.iter().map(|r| r.date).collect();

        Ok(DataFrame::new(vec![
            date_column(columns::DATE, &dates)?,
            float_column(&format!("gross_ret_{k}d"), &pick(|r| r.gross_return)),
            float_column("cost", &pick(|r| r.cost)),
            float_column(&format!("net_ret_{k}d"), &pick(|r| r.net_return)),
            float_column("turnover", &pick(|r| r.turnover)),
            float_column("equity", &pick(|r| r.equity)),
            float_column("drawdown", &pick(|r| r.drawdown)),
        ])?)
    }
}

/// Backtesting engine.
#[derive(Debug, Clone, Default)]
pub struct Backtest {
    config: BacktestConfig,
}

impl Backtest {
    /// Create a new backtest with configuration.
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Rebalance cross-sections of `panel`, in date order with rows in
    /// ticker order.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] if the factor or label is absent.
    pub fn inputs(&self, panel: &Panel) -> Result<Vec<RebalanceInput>> {
        let panel = panel.sort_by_date();
        let factor = panel.column(&self.config.factor)?;
        let label_name = self.config.label_column();
        let label = panel.column(&label_name)?;

        let schedule: HashSet<Date> =
            rebalance_dates(&panel.unique_dates(), self.config.rebalance_every)
                .into_iter()
                .collect();

        Ok(panel
            .by_date()
            .iter()
            .filter(|group| schedule.contains(&group.key))
            .map(|group| {
                RebalanceInput::from_section(
                    CrossSection::aligned(group, factor, label),
                    panel.tickers(),
                )
            })
            .collect())
    }

    /// Runs the backtest over `panel`.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] for an absent factor or label and
    /// [`FaroError::EmptyResult`] if no rebalance date was tradable.
    pub fn run(&self, panel: &Panel) -> Result<BacktestResult> {
        let inputs = self.inputs(panel)?;
        let n_dates = inputs.len();

        let (_, steps) = inputs.iter().fold(
            (BacktestState::default(), Vec::with_capacity(n_dates)),
            |(state, mut steps), input| {
                let (state, record) = step(state, input, &self.config);
                steps.extend(record);
                (state, steps)
            },
        );

        if steps.is_empty() {
            return Err(FaroError::EmptyResult(format!(
                "backtest of {} produced no rebalance records ({} candidate dates, minimum cross-section {})",
                self.config.factor,
                n_dates,
                self.config.min_cross_section()
            )));
        }

        info!(
            "Backtest {}: {} of {} rebalance dates traded",
            self.config.factor,
            steps.len(),
            n_dates
        );
        Ok(BacktestResult {
            config: self.config.clone(),
            records: compound(&steps),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn config() -> BacktestConfig {
        BacktestConfig {
            factor: "f".to_string(),
            quantiles: 2,
            rebalance_every: 1,
            cost_bps_roundtrip: 10.0,
            min_population: 4,
        }
    }

    fn input(day: u32, factor: Vec<f64>, fwd: Vec<f64>) -> RebalanceInput {
        RebalanceInput {
            date: d(day),
            tickers: ["A", "B", "C", "D"].map(String::from).to_vec(),
            factor,
            forward_return: fwd,
        }
    }

    #[test]
    fn test_config_from_research() {
        let config = BacktestConfig::default();
        assert_eq!(config.factor, "rev_5");
        assert_eq!(config.min_cross_section(), 30);
        assert_eq!(config.label_column(), "fwd_ret_5d");
    }

    #[test]
    fn test_rebalance_dates() {
        let dates: Vec<Date> = (1..=11).map(d).collect();
        assert_eq!(rebalance_dates(&dates, 5), vec![d(1), d(6), d(11)]);
    }

    #[test]
    fn test_inputs_follow_rebalance_dates() {
        let mut dates = Vec::new();
        let mut tickers = Vec::new();
        for day in (1..=11).rev() {
            for t in ["B", "A"] {
                dates.push(d(day));
                tickers.push(t.to_string());
            }
        }
        let n = dates.len();
        let panel = Panel::new(dates, tickers)
            .unwrap()
            .with_column("f", (0..n).map(|i| i as f64).collect())
            .unwrap()
            .with_column("fwd_ret_5d", vec![0.0; n])
            .unwrap();
        let config = BacktestConfig {
            factor: "f".to_string(),
            quantiles: 2,
            rebalance_every: 5,
            cost_bps_roundtrip: 0.0,
            min_population: 2,
        };

        let inputs = Backtest::new(config).inputs(&panel).unwrap();
        let input_dates: Vec<Date> = inputs.iter().map(|input| input.date).collect();
        assert_eq!(input_dates, rebalance_dates(&panel.unique_dates(), 5));
        assert_eq!(inputs[0].tickers, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_small_cross_section_leaves_state() {
        let state = BacktestState::default();
        let mut small = input(2, vec![1.0, 2.0, 3.0, 4.0], vec![0.0; 4]);
        small.tickers.pop();
        small.factor.pop();
        small.forward_return.pop();

        let (state, record) = step(state, &small, &config());
        assert!(record.is_none());
        assert!(state.prev_weights.is_none());
    }

    #[test]
    fn test_zero_turnover_has_no_cost() {
        let first = input(2, vec![1.0, 2.0, 3.0, 4.0], vec![0.01, 0.02, 0.03, 0.04]);
        let second = input(3, vec![1.0, 2.0, 3.0, 4.0], vec![0.02, 0.0, 0.01, -0.01]);

        let (state, r1) = step(BacktestState::default(), &first, &config());
        let r1 = r1.unwrap();
        assert_eq!(r1.turnover, 2.0);
        assert_relative_eq!(r1.cost, 0.002, epsilon = 1e-15);

        let (_, r2) = step(state, &second, &config());
        let r2 = r2.unwrap();
        assert_eq!(r2.turnover, 0.0);
        assert_eq!(r2.cost, 0.0);
        assert_eq!(r2.net_return, r2.gross_return);
        assert_relative_eq!(r2.gross_return, (0.01 - 0.01) / 2.0 - (0.02 + 0.0) / 2.0);
    }

    #[test]
    fn test_compound_equity_and_drawdown() {
        let steps: Vec<StepRecord> = [0.1, -0.2, 0.05, 0.3]
            .iter()
            .enumerate()
            .map(|(i, &r)| StepRecord {
                date: d(i as u32 + 1),
                gross_return: r,
                cost: 0.0,
                net_return: r,
                turnover: 0.0,
            })
            .collect();
        let records = compound(&steps);

        assert_relative_eq!(records[0].equity, 1.1);
        for pair in records.windows(2) {
            assert_relative_eq!(pair[1].equity, pair[0].equity * (1.0 + pair[1].net_return));
        }
        assert_eq!(records[0].drawdown, 0.0);
        assert_relative_eq!(records[1].drawdown, -0.2, epsilon = 1e-12);
        assert!(records.iter().all(|r| r.drawdown <= 0.0));
        // 1.1 * 0.8 * 1.05 * 1.3 = 1.2012 is a new high.
        assert_eq!(records[3].drawdown, 0.0);
    }

    #[test]
    fn test_with_cost_reprices() {
        let steps = vec![StepRecord {
            date: d(2),
            gross_return: 0.01,
            cost: 0.002,
            net_return: 0.008,
            turnover: 2.0,
        }];
        let result = BacktestResult {
            config: config(),
            records: compound(&steps),
        };

        let free = result.with_cost(0.0);
        assert_eq!(free.records[0].net_return, 0.01);
        assert_eq!(free.config.cost_bps_roundtrip, 0.0);

        let pricey = result.with_cost(50.0);
        assert_relative_eq!(pricey.records[0].cost, 0.01, epsilon = 1e-15);
        assert_relative_eq!(pricey.records[0].equity, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_run_reports_empty_result() {
        let panel = Panel::new(vec![d(2), d(2)], vec!["A".into(), "B".into()])
            .unwrap()
            .with_column("f", vec![1.0, 2.0])
            .unwrap()
            .with_column("fwd_ret_1d", vec![0.01, 0.02])
            .unwrap();

        let result = Backtest::new(config()).run(&panel);
        assert!(matches!(result, Err(FaroError::EmptyResult(_))));
    }

    #[test]
    fn test_trajectory_frame() {
        let steps = vec![StepRecord {
            date: d(2),
            gross_return: 0.01,
            cost: 0.0,
            net_return: 0.01,
            turnover: 2.0,
        }];
        let result = BacktestResult {
            config: BacktestConfig {
                rebalance_every: 5,
                ..config()
            },
            records: compound(&steps),
        };
        let df = result.to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.get_column_names_str(),
            vec!["date", "gross_ret_5d", "cost", "net_ret_5d", "turnover", "equity", "drawdown"]
        );
    }
}
