//! History and label filter.

use log::info;

use faro_traits::{Panel, Result, fwd_ret_column};

/// Drops rows without enough trailing history or without every forward label.
///
/// A row survives when its ticker has at least `min_history` earlier
/// observations in the panel and every configured `fwd_ret_{h}d` is finite.
/// History is counted on the panel as given, before any label row is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    min_history: usize,
    horizons: Vec<usize>,
}

impl HistoryFilter {
    /// Creates a filter for a minimum history length and label horizons.
    pub const fn new(min_history: usize, horizons: Vec<usize>) -> Self {
        Self {
            min_history,
            horizons,
        }
    }

    /// Per-row keep mask.
    ///
    /// # Errors
    ///
    /// Returns [`faro_traits::FaroError::MissingColumn`] if a label column is absent.
    pub fn mask(&self, panel: &Panel) -> Result<Vec<bool>> {
        let labels = self
            .horizons
            .iter()
            .map(|&h| panel.column(&fwd_ret_column(h)))
            .collect::<Result<Vec<_>>>()?;

        let mut keep = vec![false; panel.len()];
        for group in panel.by_entity() {
            for &row in group.rows.iter().skip(self.min_history) {
                keep[row] = labels.iter().all(|label| label[row].is_finite());
            }
        }
        Ok(keep)
    }

    /// Applies the filter, returning the surviving rows in panel order.
    ///
    /// # Errors
    ///
    /// Returns an error if a label column is absent.
    pub fn apply(&self, panel: &Panel) -> Result<Panel> {
        let filtered = panel.filter(&self.mask(panel)?)?;
        info!(
            "History/label filter kept {} of {} rows (min history {}, horizons {:?})",
            filtered.len(),
            panel.len(),
            self.min_history,
            self.horizons
        );
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faro_traits::{Date, FaroError};

    fn panel() -> Panel {
        let dates: Vec<Date> = (1..=5)
            .flat_map(|d| {
                let date = Date::from_ymd_opt(2024, 1, d).unwrap();
                [date, date]
            })
            .collect();
        let tickers = (0..10)
            .map(|i| if i % 2 == 0 { "AAA" } else { "BBB" }.to_string())
            .collect();
        Panel::new(dates, tickers)
            .unwrap()
            .with_column(
                "fwd_ret_1d",
                vec![0.1, 0.1, 0.1, 0.1, 0.1, f64::NAN, 0.1, 0.1, f64::NAN, f64::NAN],
            )
            .unwrap()
            .with_column(
                "fwd_ret_2d",
                vec![0.1, 0.1, 0.1, 0.1, 0.1, 0.1, f64::NAN, f64::NAN, f64::NAN, f64::NAN],
            )
            .unwrap()
    }

    #[test]
    fn test_history_and_labels() {
        let filter = HistoryFilter::new(2, vec![1, 2]);
        let mask = filter.mask(&panel()).unwrap();
        // Rows 0-3 lack history; row 5 lacks fwd_ret_1d; rows 6+ lack fwd_ret_2d.
        assert_eq!(
            mask,
            vec![false, false, false, false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_history_counted_before_label_drops() {
        // Dropping BBB's day-3 label row must not delay its day-4 eligibility.
        let filter = HistoryFilter::new(3, vec![1]);
        let mask = filter.mask(&panel()).unwrap();
        assert!(mask[6] && mask[7]);
        assert!(!mask[5]);
    }

    #[test]
    fn test_missing_label_column() {
        let filter = HistoryFilter::new(0, vec![20]);
        assert!(matches!(
            filter.apply(&panel()),
            Err(FaroError::MissingColumn(_))
        ));
    }
}
