//! Factor trait for per-entity time-series signals.
//!
//! A [`Factor`] turns one ticker's date-ordered history into one value per
//! row. The constructor in `faro-factors` partitions the panel by entity and
//! hands each partition to the factor as an [`EntityHistory`], so a factor
//! can never see across ticker boundaries.

use crate::{Date, Group, Panel, Result, Ticker};

/// Read-only view of one ticker's rows, ordered by date.
#[derive(Debug, Clone, Copy)]
pub struct EntityHistory<'a> {
    panel: &'a Panel,
    group: &'a Group<Ticker>,
}

impl<'a> EntityHistory<'a> {
    /// Wraps an entity partition produced by [`Panel::by_entity`].
    pub const fn new(panel: &'a Panel, group: &'a Group<Ticker>) -> Self {
        Self { panel, group }
    }

    /// Ticker of this history.
    pub fn ticker(&self) -> &str {
        &self.group.key
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.group.len()
    }

    /// Whether the history has no observations.
    pub fn is_empty(&self) -> bool {
        self.group.is_empty()
    }

    /// Panel row index of each observation.
    pub fn rows(&self) -> &[usize] {
        &self.group.rows
    }

    /// Observation dates in ascending order.
    pub fn dates(&self) -> Vec<Date> {
        let dates = self.panel.dates();
        self.group.rows.iter().map(|&i| dates[i]).collect()
    }

    /// Values of `column` in date order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FaroError::MissingColumn`] if the panel lacks the column.
    pub fn series(&self, column: &str) -> Result<Vec<f64>> {
        let values = self.panel.column(column)?;
        Ok(self.group.rows.iter().map(|&i| values[i]).collect())
    }
}

/// A factor computed from a single entity's history.
///
/// Implementations should be thread-safe (`Send + Sync`) so entities can be
/// processed in parallel.
///
/// # Example
///
/// ```
/// use faro_traits::{EntityHistory, Factor, Result};
///
/// struct LastPrice;
///
/// impl Factor for LastPrice {
///     fn name(&self) -> &str {
///         "last_price"
///     }
///
///     fn lookback(&self) -> usize {
///         1
///     }
///
///     fn required_columns(&self) -> Vec<&str> {
///         vec!["close"]
///     }
///
///     fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
///         history.series("close")
///     }
/// }
/// ```
pub trait Factor: Send + Sync {
    /// Column name the factor values are stored under.
    fn name(&self) -> &str;

    /// Number of trailing observations needed before the first defined value.
    fn lookback(&self) -> usize;

    /// Panel columns the factor reads.
    fn required_columns(&self) -> Vec<&str>;

    /// Computes one value per observation of `history`, in date order.
    ///
    /// Rows without enough trailing history must be `NaN`, never a value
    /// computed from a partial window.
    ///
    /// # Errors
    ///
    /// Returns an error if a required column is missing.
    fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestFactor {
        name: String,
        lookback: usize,
    }

    impl Factor for TestFactor {
        fn name(&self) -> &str {
            &self.name
        }

        fn lookback(&self) -> usize {
            self.lookback
        }

        fn required_columns(&self) -> Vec<&str> {
            vec!["close", "volume"]
        }

        fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
            let close = history.series("close")?;
            let volume = history.series("volume")?;
            Ok(close.iter().zip(&volume).map(|(c, v)| c * v).collect())
        }
    }

    fn panel() -> Panel {
        let d = |day| Date::from_ymd_opt(2024, 1, day).unwrap();
        Panel::new(
            vec![d(3), d(2), d(2)],
            vec!["AAPL".into(), "AAPL".into(), "MSFT".into()],
        )
        .unwrap()
        .with_column("close", vec![2.0, 1.0, 5.0])
        .unwrap()
        .with_column("volume", vec![10.0, 20.0, 30.0])
        .unwrap()
    }

    #[test]
    fn test_history_is_date_ordered() {
        let panel = panel();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);

        assert_eq!(history.ticker(), "AAPL");
        assert_eq!(history.len(), 2);
        assert_eq!(history.series("close").unwrap(), vec![1.0, 2.0]);
        assert_eq!(history.rows(), &[1, 0]);
        assert!(history.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_factor_compute() {
        let panel = panel();
        let groups = panel.by_entity();
        let factor = TestFactor {
            name: "dollar_volume".to_string(),
            lookback: 1,
        };

        let msft = EntityHistory::new(&panel, &groups[1]);
        assert_eq!(factor.compute(&msft).unwrap(), vec![150.0]);
        assert_eq!(factor.name(), "dollar_volume");
        assert_eq!(factor.lookback(), 1);
        assert_eq!(factor.required_columns(), vec!["close", "volume"]);
    }

    #[test]
    fn test_missing_series() {
        let panel = panel();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);
        assert!(history.series("open").is_err());
    }

    #[test]
    fn test_factor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Factor>>();
    }
}
