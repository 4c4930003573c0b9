//! Aligned factor/label pairs for one date.

use faro_traits::{Date, Group, Panel, Result};

/// The rows of one date where both the factor and the label are finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    /// Date shared by every row.
    pub date: Date,
    /// Panel row indices, in panel order.
    pub rows: Vec<usize>,
    /// Factor values aligned with `rows`.
    pub factor: Vec<f64>,
    /// Label values aligned with `rows`.
    pub label: Vec<f64>,
}

impl CrossSection {
    /// Builds the aligned cross-section for one date partition.
    pub fn aligned(group: &Group<Date>, factor: &[f64], label: &[f64]) -> Self {
        let rows: Vec<usize> = group
            .rows
            .iter()
            .copied()
            .filter(|&i| factor[i].is_finite() && label[i].is_finite())
            .collect();

        Self {
            date: group.key,
            factor: rows.iter().map(|&i| factor[i]).collect(),
            label: rows.iter().map(|&i| label[i]).collect(),
            rows,
        }
    }

    /// Aligned cross-sections for every date of `panel`, in date order.
    ///
    /// # Errors
    ///
    /// Returns [`faro_traits::FaroError::MissingColumn`] if either column is absent.
    pub fn all(panel: &Panel, factor: &str, label: &str) -> Result<Vec<Self>> {
        let factor = panel.column(factor)?;
        let label = panel.column(label)?;
        Ok(panel
            .by_date()
            .iter()
            .map(|group| Self::aligned(group, factor, label))
            .collect())
    }

    /// Population with both values present.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row has both values.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_drops_either_missing() {
        let d = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let group = Group {
            key: d,
            rows: vec![3, 0, 1, 2],
        };
        let factor = [1.0, f64::NAN, 3.0, 4.0];
        let label = [0.1, 0.2, f64::INFINITY, 0.4];

        let section = CrossSection::aligned(&group, &factor, &label);
        assert_eq!(section.rows, vec![3, 0]);
        assert_eq!(section.factor, vec![4.0, 1.0]);
        assert_eq!(section.label, vec![0.4, 0.1]);
        assert_eq!(section.len(), 2);
    }
}
