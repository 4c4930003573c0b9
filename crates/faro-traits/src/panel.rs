//! Long-format panel of per-ticker, per-date observations.
//!
//! A [`Panel`] holds one row per `(date, ticker)` and any number of `f64`
//! columns. Missing values are stored as non-finite numbers (`NaN`) and every
//! consumer treats a non-finite value as absent.
//!
//! The two partitionings used by the engine are explicit operations:
//! [`Panel::by_entity`] for time-series work and [`Panel::by_date`] for
//! cross-sectional work. Both are deterministic: groups come out in key
//! order, rows inside an entity group are ordered by date, rows inside a
//! date group keep panel order.

use std::collections::{BTreeMap, HashSet};

use log::warn;
use polars::prelude::*;

use crate::types::{date_from_epoch_days, date_to_epoch_days};
use crate::{Date, FaroError, Result, Ticker, columns};

/// Row indices of a [`Panel`] sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K> {
    /// Shared key (a ticker or a date).
    pub key: K,
    /// Row indices into the panel the group was built from.
    pub rows: Vec<usize>,
}

impl<K> Group<K> {
    /// Number of rows in the group.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the group has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Typed columnar table keyed by `(date, ticker)`.
///
/// # Example
///
/// ```
/// use faro_traits::{Date, Panel};
///
/// let d = Date::from_ymd_opt(2024, 1, 2).unwrap();
/// let panel = Panel::new(vec![d, d], vec!["AAPL".into(), "MSFT".into()])
///     .unwrap()
///     .with_column("close", vec![185.6, 370.9])
///     .unwrap();
///
/// assert_eq!(panel.len(), 2);
/// assert!(panel.has_column("close"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    dates: Vec<Date>,
    tickers: Vec<Ticker>,
    columns: Vec<(String, Vec<f64>)>,
}

impl Panel {
    /// Creates a panel from its key columns.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidData`] when the key columns differ in length
    /// and [`FaroError::DuplicateKey`] when a `(date, ticker)` pair repeats.
    pub fn new(dates: Vec<Date>, tickers: Vec<Ticker>) -> Result<Self> {
        if dates.len() != tickers.len() {
            return Err(FaroError::InvalidData(format!(
                "date column has {} rows but ticker column has {}",
                dates.len(),
                tickers.len()
            )));
        }

        let mut seen = HashSet::with_capacity(dates.len());
        for (date, ticker) in dates.iter().zip(&tickers) {
            if !seen.insert((*date, ticker.as_str())) {
                return Err(FaroError::DuplicateKey {
                    date: date.to_string(),
                    ticker: ticker.clone(),
                });
            }
        }

        Ok(Self {
            dates,
            tickers,
            columns: Vec::new(),
        })
    }

    /// Adds a column, replacing any existing column of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidData`] on a length mismatch or when `name`
    /// collides with a key column.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if name == columns::DATE || name == columns::TICKER {
            return Err(FaroError::InvalidData(format!(
                "'{name}' is a key column and cannot hold values"
            )));
        }
        if values.len() != self.len() {
            return Err(FaroError::InvalidData(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.len()
            )));
        }

        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name, values)),
        }
        Ok(self)
    }

    /// Gets a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] if the column does not exist.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| FaroError::MissingColumn(name.to_string()))
    }

    /// Checks if a value column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// Names of the value columns, in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Date column.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Ticker column.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Number of distinct tickers.
    pub fn n_tickers(&self) -> usize {
        self.tickers.iter().collect::<HashSet<_>>().len()
    }

    /// Distinct dates in ascending order.
    pub fn unique_dates(&self) -> Vec<Date> {
        let mut dates = self.dates.clone();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// New panel holding `rows` in the given order.
    ///
    /// `rows` must be in bounds and free of repeats; the partition methods
    /// of this type only ever hand out such index lists.
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            tickers: rows.iter().map(|&i| self.tickers[i].clone()).collect(),
            columns: self
                .columns
                .iter()
                .map(|(name, values)| (name.clone(), rows.iter().map(|&i| values[i]).collect()))
                .collect(),
        }
    }

    /// New panel holding the rows where `mask` is true.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidData`] if the mask length differs from the row count.
    pub fn filter(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(FaroError::InvalidData(format!(
                "mask has {} entries for {} rows",
                mask.len(),
                self.len()
            )));
        }
        let rows: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        Ok(self.take(&rows))
    }

    /// Rows re-ordered by `(ticker, date)`.
    pub fn sort_by_entity(&self) -> Self {
        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.sort_by(|&a, &b| {
            self.tickers[a]
                .cmp(&self.tickers[b])
                .then(self.dates[a].cmp(&self.dates[b]))
        });
        self.take(&rows)
    }

    /// Rows re-ordered by `(date, ticker)`.
    pub fn sort_by_date(&self) -> Self {
        let mut rows: Vec<usize> = (0..self.len()).collect();
        rows.sort_by(|&a, &b| {
            self.dates[a]
                .cmp(&self.dates[b])
                .then(self.tickers[a].cmp(&self.tickers[b]))
        });
        self.take(&rows)
    }

    /// Partition by ticker; each group's rows are ordered by date.
    pub fn by_entity(&self) -> Vec<Group<Ticker>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, ticker) in self.tickers.iter().enumerate() {
            groups.entry(ticker.as_str()).or_default().push(row);
        }

        groups
            .into_iter()
            .map(|(ticker, mut rows)| {
                rows.sort_by_key(|&i| self.dates[i]);
                Group {
                    key: ticker.to_string(),
                    rows,
                }
            })
            .collect()
    }

    /// Partition by date; each group's rows keep panel order.
    pub fn by_date(&self) -> Vec<Group<Date>> {
        let mut groups: BTreeMap<Date, Vec<usize>> = BTreeMap::new();
        for (row, date) in self.dates.iter().enumerate() {
            groups.entry(*date).or_default().push(row);
        }

        groups
            .into_iter()
            .map(|(key, rows)| Group { key, rows })
            .collect()
    }

    /// Builds a panel from a long-format DataFrame.
    ///
    /// `date` (Date, Datetime or `YYYY-MM-DD` string) and `ticker` (string)
    /// are required. Every other numeric column is carried over as `f64`,
    /// with nulls mapped to `NaN`. An all-null column is kept as all `NaN`
    /// whatever its dtype; other non-numeric columns are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a key column is missing or malformed, or if the
    /// keys are not unique.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let date_col = df
            .column(columns::DATE)
            .map_err(|_| FaroError::MissingColumn(columns::DATE.to_string()))?;
        let dates = parse_dates(date_col.as_materialized_series())?;

        let ticker_col = df
            .column(columns::TICKER)
            .map_err(|_| FaroError::MissingColumn(columns::TICKER.to_string()))?;
        let tickers = ticker_col
            .as_materialized_series()
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, t)| {
                t.map(|s| s.trim().to_string()).ok_or_else(|| {
                    FaroError::InvalidData(format!("null ticker at row {row}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut panel = Self::new(dates, tickers)?;

        for column in df.get_columns() {
            let name = column.name().as_str();
            if name == columns::DATE || name == columns::TICKER {
                continue;
            }
            let all_null = column.null_count() == column.len();
            if !is_numeric(column.dtype()) && !all_null {
                warn!("Dropping non-numeric column '{name}' ({})", column.dtype());
                continue;
            }

            let cast = column.as_materialized_series().cast(&DataType::Float64)?;
            let values: Vec<f64> = cast
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            panel = panel.with_column(name, values)?;
        }

        Ok(panel)
    }

    /// Converts the panel into a DataFrame with `date` as a polars `Date`.
    ///
    /// Non-finite values are written as nulls.
    ///
    /// # Errors
    ///
    /// Returns an error if polars rejects the assembled columns.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns = Vec::with_capacity(self.columns.len() + 2);
        frame_columns.push(date_column(columns::DATE, &self.dates)?);
        frame_columns.push(Series::new(columns::TICKER.into(), self.tickers.clone()).into());
        for (name, values) in &self.columns {
            frame_columns.push(float_column(name, values));
        }
        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Builds a nullable `Float64` column, mapping non-finite values to null.
pub fn float_column(name: &str, values: &[f64]) -> Column {
    let values: Vec<Option<f64>> = values
        .iter()
        .map(|v| v.is_finite().then_some(*v))
        .collect();
    Series::new(name.into(), values).into()
}

/// Builds a nullable `Float64` column from optional statistics.
pub fn optional_column(name: &str, values: &[Option<f64>]) -> Column {
    let values: Vec<Option<f64>> = values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Series::new(name.into(), values).into()
}

/// Builds a polars `Date` column.
///
/// # Errors
///
/// Returns an error if the cast to `Date` fails.
pub fn date_column(name: &str, dates: &[Date]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().map(|d| date_to_epoch_days(*d)).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?.into())
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
            | DataType::Null
    )
}

fn parse_dates(series: &Series) -> Result<Vec<Date>> {
    match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .enumerate()
                .map(|(row, d)| {
                    d.and_then(date_from_epoch_days)
                        .ok_or_else(|| FaroError::InvalidData(format!("invalid date at row {row}")))
                })
                .collect()
        }
        DataType::Datetime(_, _) => parse_dates(&series.cast(&DataType::Date)?),
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, s)| {
                s.and_then(parse_date_str).ok_or_else(|| {
                    FaroError::InvalidData(format!("unparseable date {s:?} at row {row}"))
                })
            })
            .collect(),
        other => Err(FaroError::InvalidData(format!(
            "date column has unsupported type {other}"
        ))),
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_date_str(s: &str) -> Option<Date> {
    let s = s.trim();
    Date::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| s.get(..10).and_then(|head| Date::parse_from_str(head, "%Y-%m-%d").ok()))
}
