//! Summary statistics of an IC time series.

use serde::{Deserialize, Serialize};

use faro_traits::stats::{mean, std_dev};

use crate::ic::IcObservation;

/// Aggregate quality of one factor at one horizon.
///
/// Only dates with a defined IC contribute. Ratios are `None` when the
/// standard deviation is undefined or zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IcSummary {
    /// Mean IC.
    pub mean: Option<f64>,
    /// Sample standard deviation of IC (`ddof = 1`).
    pub std: Option<f64>,
    /// Information ratio: `mean / std`.
    pub ir: Option<f64>,
    /// `mean / (std / sqrt(n_days))`.
    pub t_stat: Option<f64>,
    /// Number of dates with a defined IC.
    pub n_days: usize,
    /// Fraction of defined ICs that are positive.
    pub hit_rate: Option<f64>,
}

impl IcSummary {
    /// Summarizes raw IC values; non-finite entries are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use faro_eval::IcSummary;
    ///
    /// let summary = IcSummary::from_values(&[0.02, 0.04, f64::NAN]);
    /// assert_eq!(summary.n_days, 2);
    /// assert!((summary.mean.unwrap() - 0.03).abs() < 1e-12);
    /// ```
    pub fn from_values(values: &[f64]) -> Self {
        let defined: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        let n_days = defined.len();

        let mean = mean(&defined);
        let std = std_dev(&defined, 1);
        let ir = match (mean, std) {
            (Some(m), Some(s)) if s > 0.0 => Some(m / s),
            _ => None,
        };
        let t_stat = ir
            .filter(|_| n_days > 1)
            .map(|ir| ir * (n_days as f64).sqrt());
        let hit_rate =
            (n_days > 0).then(|| defined.iter().filter(|&&x| x > 0.0).count() as f64 / n_days as f64);

        Self {
            mean,
            std,
            ir,
            t_stat,
            n_days,
            hit_rate,
        }
    }

    /// Summarizes an IC series.
    pub fn from_observations(observations: &[IcObservation]) -> Self {
        let values: Vec<f64> = observations
            .iter()
            .map(|o| o.ic.unwrap_or(f64::NAN))
            .collect();
        Self::from_values(&values)
    }

    /// Standard error of the mean IC.
    pub fn std_error(&self) -> Option<f64> {
        self.std
            .filter(|_| self.n_days > 0)
            .map(|s| s / (self.n_days as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faro_traits::Date;

    #[test]
    fn test_summary_values() {
        let ics = [0.05, 0.03, 0.07, 0.02, 0.06, 0.04, 0.08, 0.03, 0.05, -0.06];
        let summary = IcSummary::from_values(&ics);
        let m = ics.iter().sum::<f64>() / 10.0;
        let s = std_dev(&ics, 1).unwrap();

        assert_eq!(summary.n_days, 10);
        assert_relative_eq!(summary.mean.unwrap(), m, epsilon = 1e-12);
        assert_relative_eq!(summary.ir.unwrap(), m / s, epsilon = 1e-12);
        assert_relative_eq!(summary.t_stat.unwrap(), m / (s / 10f64.sqrt()), epsilon = 1e-12);
        assert_relative_eq!(summary.hit_rate.unwrap(), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_undefined_observations_ignored() {
        let d = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let observations = vec![
            IcObservation { date: d, ic: Some(0.1), n: 30 },
            IcObservation { date: d, ic: None, n: 30 },
            IcObservation { date: d, ic: Some(0.3), n: 30 },
        ];
        let summary = IcSummary::from_observations(&observations);
        assert_eq!(summary.n_days, 2);
        assert_relative_eq!(summary.mean.unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_ic_has_no_ratio() {
        let summary = IcSummary::from_values(&[0.25, 0.25, 0.25]);
        assert_eq!(summary.std, Some(0.0));
        assert!(summary.ir.is_none());
        assert!(summary.t_stat.is_none());
    }

    #[test]
    fn test_empty_summary() {
        let summary = IcSummary::from_values(&[]);
        assert_eq!(summary, IcSummary::default());
        assert!(summary.std_error().is_none());
    }
}
