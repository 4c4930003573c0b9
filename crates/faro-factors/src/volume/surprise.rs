//! Volume surprise relative to its trailing average.

use serde::{Deserialize, Serialize};

use faro_traits::{EntityHistory, Factor, Result, columns};

use crate::rolling::rolling_mean;

/// Configuration for the volume surprise factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSurpriseConfig {
    /// Rolling window in trading days (default: 20)
    pub window: usize,
}

impl Default for VolumeSurpriseConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// `volume / rolling_mean(volume, k) - 1`.
///
/// The trailing mean includes the current day.
#[derive(Debug, Clone)]
pub struct VolumeSurprise {
    config: VolumeSurpriseConfig,
    name: String,
}

impl VolumeSurprise {
    /// Create a new volume surprise factor.
    #[must_use]
    pub fn new(config: VolumeSurpriseConfig) -> Self {
        Self {
            config,
            name: format!("volu_z_{}", config.window),
        }
    }
}

impl Default for VolumeSurprise {
    fn default() -> Self {
        Self::new(VolumeSurpriseConfig::default())
    }
}

impl Factor for VolumeSurprise {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.config.window
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![columns::VOLUME]
    }

    fn compute(&self, history: &EntityHistory<'_>) -> Result<Vec<f64>> {
        let volume = history.series(columns::VOLUME)?;
        let average = rolling_mean(&volume, self.config.window);

        Ok(volume
            .iter()
            .zip(&average)
            .map(|(v, m)| {
                let surprise = v / m - 1.0;
                if surprise.is_finite() { surprise } else { f64::NAN }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faro_traits::{Date, Panel};

    #[test]
    fn test_volume_surprise() {
        let dates: Vec<Date> = (1..=4).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
        let panel = Panel::new(dates, vec!["AAA".into(); 4])
            .unwrap()
            .with_column("volume", vec![100.0, 100.0, 400.0, 0.0])
            .unwrap();
        let groups = panel.by_entity();
        let history = EntityHistory::new(&panel, &groups[0]);

        let factor = VolumeSurprise::new(VolumeSurpriseConfig { window: 3 });
        let values = factor.compute(&history).unwrap();

        assert_eq!(factor.name(), "volu_z_3");
        assert!(values[0].is_nan() && values[1].is_nan());
        assert_relative_eq!(values[2], 400.0 / 200.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(values[3], -1.0, epsilon = 1e-12);
    }
}
