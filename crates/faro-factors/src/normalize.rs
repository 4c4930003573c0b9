//! Cross-sectional normalizer: per-date winsorization then z-scoring.

use log::{debug, info, warn};
use rayon::prelude::*;

use faro_traits::stats::{standardize, winsorize};
use faro_traits::{FaroError, Panel, Result};

/// Winsorizes and standardizes factor columns within each date.
///
/// # Example
///
/// ```
/// use faro_factors::CrossSectionalNormalizer;
///
/// let normalizer = CrossSectionalNormalizer::new(0.01).unwrap();
/// let z = normalizer.normalize_values(&[1.0, 2.0, 3.0, f64::NAN]);
/// assert!(z[3].is_nan());
/// assert!((z[0] + z[2]).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSectionalNormalizer {
    winsor_pct: f64,
}

impl CrossSectionalNormalizer {
    /// Creates a normalizer with tail fraction `winsor_pct`.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::InvalidConfig`] unless `0 < winsor_pct < 0.5`.
    pub fn new(winsor_pct: f64) -> Result<Self> {
        if !(winsor_pct > 0.0 && winsor_pct < 0.5) {
            return Err(FaroError::InvalidConfig(format!(
                "winsor_pct must be in (0, 0.5), got {winsor_pct}"
            )));
        }
        Ok(Self { winsor_pct })
    }

    /// Tail fraction clipped on each side.
    pub const fn winsor_pct(&self) -> f64 {
        self.winsor_pct
    }

    /// Normalizes a single cross-section.
    ///
    /// Missing inputs stay missing. A cross-section with no finite values or
    /// no dispersion after clipping comes back entirely missing.
    pub fn normalize_values(&self, values: &[f64]) -> Vec<f64> {
        standardize(&winsorize(values, self.winsor_pct)).0
    }

    /// Returns `panel` with each of `columns` normalized per date.
    ///
    /// Dates are independent and processed in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] if a column is absent.
    pub fn normalize<S: AsRef<str>>(&self, panel: &Panel, columns: &[S]) -> Result<Panel> {
        let groups = panel.by_date();
        let mut out = panel.clone();

        for column in columns {
            let name = column.as_ref();
            let values = panel.column(name)?;

            let per_date: Vec<Vec<f64>> = groups
                .par_iter()
                .map(|group| {
                    let section: Vec<f64> = group.rows.iter().map(|&i| values[i]).collect();
                    self.normalize_values(&section)
                })
                .collect();

            let mut normalized = vec![f64::NAN; panel.len()];
            let mut degenerate = 0usize;
            for (group, section) in groups.iter().zip(per_date) {
                let had_input = group.rows.iter().any(|&i| values[i].is_finite());
                if had_input && section.iter().all(|x| x.is_nan()) {
                    degenerate += 1;
                    debug!("{name}: no cross-sectional dispersion on {}", group.key);
                }
                for (&row, value) in group.rows.iter().zip(section) {
                    normalized[row] = value;
                }
            }

            if !normalized.iter().any(|x| x.is_finite()) {
                warn!("{name}: every value is missing after normalization");
            } else if degenerate > 0 {
                warn!("{name}: {degenerate} dates without dispersion set to missing");
            }
            out = out.with_column(name, normalized)?;
        }

        info!(
            "Normalized {} columns over {} dates (winsor {})",
            columns.len(),
            groups.len(),
            self.winsor_pct
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use faro_traits::Date;
    use faro_traits::stats::{mean, std_dev};
    use rstest::rstest;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.5)]
    #[case(-0.1)]
    fn test_rejects_tail_fraction(#[case] pct: f64) {
        assert!(CrossSectionalNormalizer::new(pct).is_err());
    }

    #[test]
    fn test_per_date_moments() {
        let n = 40;
        let mut dates = Vec::new();
        let mut tickers = Vec::new();
        let mut values = Vec::new();
        for day in [2, 3] {
            for i in 0..n {
                dates.push(d(day));
                tickers.push(format!("T{i:02}"));
                let x = f64::from(i);
                values.push(if day == 2 { x * x } else { (x * 0.7).sin() * 5.0 });
            }
        }
        values[7] = f64::NAN;
        let panel = Panel::new(dates, tickers)
            .unwrap()
            .with_column("mom_20", values)
            .unwrap();

        let normalizer = CrossSectionalNormalizer::new(0.05).unwrap();
        let out = normalizer.normalize(&panel, &["mom_20"]).unwrap();
        let z = out.column("mom_20").unwrap();

        assert!(z[7].is_nan());
        for group in out.by_date() {
            let section: Vec<f64> = group.rows.iter().map(|&i| z[i]).collect();
            assert_abs_diff_eq!(mean(&section).unwrap(), 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(std_dev(&section, 0).unwrap(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_degenerate_date_is_missing_not_zero() {
        let panel = Panel::new(
            vec![d(2), d(2), d(2), d(3), d(3), d(3)],
            ["A", "B", "C", "A", "B", "C"].map(String::from).to_vec(),
        )
        .unwrap()
        .with_column("vol_20", vec![0.2, 0.2, 0.2, 0.1, 0.2, 0.3])
        .unwrap();

        let normalizer = CrossSectionalNormalizer::new(0.01).unwrap();
        let out = normalizer.normalize(&panel, &["vol_20"]).unwrap();
        let z = out.column("vol_20").unwrap();

        assert!(z[..3].iter().all(|x| x.is_nan()));
        assert!(z[3..].iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_clipping_bounds_extremes() {
        let normalizer = CrossSectionalNormalizer::new(0.25).unwrap();
        let z = normalizer.normalize_values(&[1.0, 2.0, 3.0, 4.0, 1000.0]);
        // After clipping to [2, 4] the outlier ties the next largest value.
        assert_abs_diff_eq!(z[3], z[4]);
        assert_abs_diff_eq!(z[0], z[1]);
    }

    #[test]
    fn test_other_columns_untouched() {
        let panel = Panel::new(vec![d(2), d(2)], vec!["A".into(), "B".into()])
            .unwrap()
            .with_column("close", vec![10.0, 20.0])
            .unwrap()
            .with_column("mom_20", vec![0.1, 0.3])
            .unwrap();
        let out = CrossSectionalNormalizer::new(0.01)
            .unwrap()
            .normalize(&panel, &["mom_20"])
            .unwrap();
        assert_eq!(out.column("close").unwrap(), &[10.0, 20.0]);
        assert_abs_diff_eq!(out.column("mom_20").unwrap()[1], 1.0, epsilon = 1e-12);
    }
}
