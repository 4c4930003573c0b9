//! Factor registry for discovering and instantiating available factors.
//!
//! The standard set carries fixed metadata; [`create_factor`] additionally
//! accepts any window for the five families, e.g. `mom_120` or `vol_60`.

use serde::{Deserialize, Serialize};

use faro_traits::{Factor, FaroError, Result};

use crate::liquidity::{Amihud, AmihudConfig};
use crate::momentum::{Momentum, MomentumConfig, Reversal, ReversalConfig};
use crate::volatility::{RealizedVolatility, RealizedVolatilityConfig};
use crate::volume::{VolumeSurprise, VolumeSurpriseConfig};

/// Factor category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FactorCategory {
    /// Price momentum factors
    Momentum,
    /// Short-term reversal factors
    Reversal,
    /// Return volatility factors
    Volatility,
    /// Trading liquidity factors
    Liquidity,
    /// Trading volume factors
    Volume,
}

impl FactorCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Momentum => "Trailing price change over a multi-week window",
            Self::Reversal => "Negated short-horizon price change",
            Self::Volatility => "Dispersion of daily returns",
            Self::Liquidity => "Price impact per unit of traded value",
            Self::Volume => "Trading activity relative to its recent average",
        }
    }

    /// Name prefix shared by the category's factors.
    #[must_use]
    pub const fn prefix(&self) -> &str {
        match self {
            Self::Momentum => "mom",
            Self::Reversal => "rev",
            Self::Volatility => "vol",
            Self::Liquidity => "amihud",
            Self::Volume => "volu_z",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        [
            Self::Momentum,
            Self::Reversal,
            Self::Volatility,
            Self::Liquidity,
            Self::Volume,
        ]
        .into_iter()
        .find(|c| c.prefix() == prefix)
    }
}

/// Metadata about a factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorInfo {
    /// Unique identifier, also the panel column name
    pub name: &'static str,

    /// Category classification
    pub category: FactorCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Typical lookback period in days
    pub typical_lookback: usize,
}

/// Get information about the standard factor set.
#[must_use]
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            name: "mom_20",
            category: FactorCategory::Momentum,
            description: "1-month price change",
            typical_lookback: 20,
        },
        FactorInfo {
            name: "mom_60",
            category: FactorCategory::Momentum,
            description: "3-month price change",
            typical_lookback: 60,
        },
        FactorInfo {
            name: "rev_5",
            category: FactorCategory::Reversal,
            description: "Negated 1-week price change",
            typical_lookback: 5,
        },
        FactorInfo {
            name: "vol_20",
            category: FactorCategory::Volatility,
            description: "20-day standard deviation of daily returns",
            typical_lookback: 20,
        },
        FactorInfo {
            name: "amihud_20",
            category: FactorCategory::Liquidity,
            description: "20-day mean of |return| per dollar traded",
            typical_lookback: 20,
        },
        FactorInfo {
            name: "volu_z_20",
            category: FactorCategory::Volume,
            description: "Volume relative to its 20-day mean, minus one",
            typical_lookback: 20,
        },
    ]
}

/// Get all factors in a specific category.
#[must_use]
pub fn factors_by_category(category: &FactorCategory) -> Vec<FactorInfo> {
    available_factors()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific factor by name.
#[must_use]
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    available_factors()
        .into_iter()
        .find(|info| info.name == name)
}

/// Get all factor categories with factors.
#[must_use]
pub fn available_categories() -> Vec<FactorCategory> {
    let mut categories: Vec<_> = available_factors()
        .into_iter()
        .map(|info| info.category)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Splits a factor name such as `volu_z_20` into its category and window.
///
/// # Errors
///
/// Returns [`FaroError::FactorNotFound`] for an unknown prefix or a missing,
/// malformed or zero window.
pub fn parse_factor_name(name: &str) -> Result<(FactorCategory, usize)> {
    let not_found = || FaroError::FactorNotFound(name.to_string());

    let (prefix, window) = name.rsplit_once('_').ok_or_else(not_found)?;
    let category = FactorCategory::from_prefix(prefix).ok_or_else(not_found)?;
    let window: usize = window.parse().map_err(|_| not_found())?;
    if window == 0 {
        return Err(not_found());
    }
    Ok((category, window))
}

/// Instantiates a factor by name.
///
/// `price_field` is the column momentum and reversal are measured on.
///
/// # Errors
///
/// Returns [`FaroError::FactorNotFound`] if the name cannot be parsed.
///
/// # Example
///
/// ```
/// use faro_factors::create_factor;
/// use faro_traits::Factor;
///
/// let factor = create_factor("mom_120", "adj_close").unwrap();
/// assert_eq!(factor.name(), "mom_120");
/// assert_eq!(factor.lookback(), 120);
/// assert!(create_factor("book_to_price", "adj_close").is_err());
/// ```
pub fn create_factor(name: &str, price_field: &str) -> Result<Box<dyn Factor>> {
    let (category, window) = parse_factor_name(name)?;
    let price_field = price_field.to_string();

    let factor: Box<dyn Factor> = match category {
        FactorCategory::Momentum => Box::new(Momentum::new(MomentumConfig {
            lookback_days: window,
            price_field,
        })),
        FactorCategory::Reversal => Box::new(Reversal::new(ReversalConfig {
            lookback_days: window,
            price_field,
        })),
        FactorCategory::Volatility => {
            Box::new(RealizedVolatility::new(RealizedVolatilityConfig { window }))
        }
        FactorCategory::Liquidity => Box::new(Amihud::new(AmihudConfig { window })),
        FactorCategory::Volume => Box::new(VolumeSurprise::new(VolumeSurpriseConfig { window })),
    };
    Ok(factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_available_factors() {
        let factors = available_factors();
        assert_eq!(factors.len(), 6);
        assert_eq!(available_categories().len(), 5);
    }

    #[test]
    fn test_factors_by_category() {
        assert_eq!(factors_by_category(&FactorCategory::Momentum).len(), 2);
        assert_eq!(factors_by_category(&FactorCategory::Liquidity).len(), 1);
    }

    #[test]
    fn test_get_factor_info() {
        let info = get_factor_info("amihud_20").unwrap();
        assert_eq!(info.category, FactorCategory::Liquidity);
        assert_eq!(info.typical_lookback, 20);
        assert!(get_factor_info("nonexistent_factor").is_none());
    }

    #[test]
    fn test_category_descriptions() {
        for category in available_categories() {
            assert!(!category.description().is_empty());
        }
    }

    #[rstest]
    #[case("mom_20", FactorCategory::Momentum, 20)]
    #[case("rev_5", FactorCategory::Reversal, 5)]
    #[case("vol_60", FactorCategory::Volatility, 60)]
    #[case("amihud_20", FactorCategory::Liquidity, 20)]
    #[case("volu_z_10", FactorCategory::Volume, 10)]
    fn test_parse_factor_name(
        #[case] name: &str,
        #[case] category: FactorCategory,
        #[case] window: usize,
    ) {
        assert_eq!(parse_factor_name(name).unwrap(), (category, window));
    }

    #[rstest]
    #[case("mom")]
    #[case("mom_")]
    #[case("mom_0")]
    #[case("mom_x")]
    #[case("beta_20")]
    fn test_parse_factor_name_rejects(#[case] name: &str) {
        assert!(matches!(
            parse_factor_name(name),
            Err(FaroError::FactorNotFound(_))
        ));
    }

    #[test]
    fn test_created_names_round_trip() {
        for info in available_factors() {
            let factor = create_factor(info.name, "adj_close").unwrap();
            assert_eq!(factor.name(), info.name);
            assert_eq!(factor.lookback(), info.typical_lookback);
        }
    }
}
