//! Small hand-built cross-sections with known answers.

use approx::assert_relative_eq;

use faro_eval::backtest::{RebalanceInput, step};
use faro_eval::{
    Backtest, BacktestConfig, BacktestState, CorrelationKind, build_weights, ic_series,
};
use faro_traits::{Date, Panel};

fn day(d: u32) -> Date {
    Date::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn two_entities_one_date() {
    let weights = build_weights(&["LOW".to_string(), "HIGH".to_string()], &[1.0, 2.0], 2);
    assert_eq!(weights.get("LOW"), -1.0);
    assert_eq!(weights.get("HIGH"), 1.0);
}

#[test]
fn small_cross_section_excluded_from_ic() {
    let mut dates = vec![day(4); 10];
    dates.extend([day(5); 5]);
    let tickers = (0..15).map(|i| format!("T{:02}", i % 10)).collect();
    let factor: Vec<f64> = (0..15).map(|i| ((i * 3) % 10) as f64).collect();
    let label: Vec<f64> = factor.iter().map(|f| f * 0.001).collect();

    let panel = Panel::new(dates, tickers)
        .unwrap()
        .with_column("f", factor)
        .unwrap()
        .with_column("fwd_ret_1d", label)
        .unwrap();

    let series = ic_series(&panel, "f", "fwd_ret_1d", CorrelationKind::Rank, 8).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].date, day(4));
    assert_eq!(series[0].n, 10);
    assert!(series.iter().all(|obs| obs.date != day(5)));
}

#[test]
fn unchanged_weights_cost_nothing() {
    let config = BacktestConfig {
        factor: "f".to_string(),
        quantiles: 5,
        rebalance_every: 5,
        cost_bps_roundtrip: 25.0,
        min_population: 10,
    };
    let tickers: Vec<String> = (0..10).map(|i| format!("T{i}")).collect();
    let factor: Vec<f64> = (0..10).map(f64::from).collect();
    let first = RebalanceInput {
        date: day(4),
        tickers: tickers.clone(),
        factor: factor.clone(),
        forward_return: vec![0.01; 10],
    };
    let second = RebalanceInput {
        date: day(11),
        tickers,
        factor,
        forward_return: (0..10).map(|i| f64::from(i) * 0.002).collect(),
    };

    let (state, _) = step(BacktestState::default(), &first, &config);
    let (_, record) = step(state, &second, &config);
    let record = record.unwrap();

    assert_eq!(record.turnover, 0.0);
    assert_eq!(record.cost, 0.0);
    assert_eq!(record.net_return, record.gross_return);
    // Top pair minus bottom pair: (0.016 + 0.018) / 2 - (0.0 + 0.002) / 2.
    assert_relative_eq!(record.gross_return, 0.016, epsilon = 1e-12);
}

#[test]
fn backtest_skips_thin_dates_without_resetting_state() {
    let config = BacktestConfig {
        factor: "f".to_string(),
        quantiles: 2,
        rebalance_every: 1,
        cost_bps_roundtrip: 10.0,
        min_population: 4,
    };

    let mut dates = Vec::new();
    let mut tickers = Vec::new();
    let mut factor = Vec::new();
    let mut fwd = Vec::new();
    for (d, n) in [(4, 4), (5, 3), (6, 4)] {
        for i in 0..n {
            dates.push(day(d));
            tickers.push(format!("T{i}"));
            factor.push(f64::from(i));
            fwd.push(0.001 * f64::from(i));
        }
    }
    let panel = Panel::new(dates, tickers)
        .unwrap()
        .with_column("f", factor)
        .unwrap()
        .with_column("fwd_ret_1d", fwd)
        .unwrap();

    let result = Backtest::new(config).run(&panel).unwrap();
    let dates: Vec<Date> = result.records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![day(4), day(6)]);
    // Same book on both traded dates: the thin date did not clear the state.
    assert_eq!(result.records[1].turnover, 0.0);
}
