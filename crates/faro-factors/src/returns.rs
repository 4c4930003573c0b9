//! Trailing and forward return labels.

use log::{info, warn};

use faro_traits::{FaroError, Panel, Result, columns, fwd_ret_column};

use crate::rolling::{forward_change, pct_change};

/// Resolves the canonical price column, falling back to `close`.
///
/// # Errors
///
/// Returns [`FaroError::MissingColumn`] if neither column exists.
pub fn resolve_price_field<'a>(panel: &Panel, configured: &'a str) -> Result<&'a str> {
    if panel.has_column(configured) {
        return Ok(configured);
    }
    if panel.has_column(columns::CLOSE) {
        warn!("Price field '{configured}' not found, falling back to '{}'", columns::CLOSE);
        return Ok(columns::CLOSE);
    }
    Err(FaroError::MissingColumn(configured.to_string()))
}

/// Adds `ret_1d` and one `fwd_ret_{h}d` column per horizon.
///
/// Returns are computed per ticker in date order from the resolved price
/// column and never span two tickers. A return is missing at the series
/// edges and wherever either price is missing or the ratio is not finite.
///
/// # Errors
///
/// Returns an error if no price column can be resolved.
///
/// # Example
///
/// ```
/// use faro_factors::attach_returns;
/// use faro_traits::{Date, Panel};
///
/// let dates: Vec<Date> = (2..=4).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
/// let panel = Panel::new(dates, vec!["AAPL".into(); 3])
///     .unwrap()
///     .with_column("adj_close", vec![100.0, 110.0, 99.0])
///     .unwrap();
///
/// let labeled = attach_returns(&panel, "adj_close", &[1]).unwrap();
/// let fwd = labeled.column("fwd_ret_1d").unwrap();
/// assert!((fwd[0] - 0.1).abs() < 1e-12);
/// assert!(fwd[2].is_nan());
/// ```
pub fn attach_returns(panel: &Panel, price_field: &str, horizons: &[usize]) -> Result<Panel> {
    let price_field = resolve_price_field(panel, price_field)?;
    let prices = panel.column(price_field)?;

    let mut ret_1d = vec![f64::NAN; panel.len()];
    let mut forward: Vec<Vec<f64>> = vec![vec![f64::NAN; panel.len()]; horizons.len()];

    for group in panel.by_entity() {
        let series: Vec<f64> = group.rows.iter().map(|&i| prices[i]).collect();

        for (&row, value) in group.rows.iter().zip(pct_change(&series, 1)) {
            ret_1d[row] = value;
        }
        for (&h, out) in horizons.iter().zip(forward.iter_mut()) {
            for (&row, value) in group.rows.iter().zip(forward_change(&series, h)) {
                out[row] = value;
            }
        }
    }

    let mut labeled = panel.clone().with_column(columns::RET_1D, ret_1d)?;
    for (&h, values) in horizons.iter().zip(forward) {
        labeled = labeled.with_column(fwd_ret_column(h), values)?;
    }

    info!(
        "Attached returns from '{price_field}' for {} rows, horizons {horizons:?}",
        labeled.len()
    );
    Ok(labeled)
}
