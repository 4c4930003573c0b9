//! Factor constructor: runs a set of factors over every entity of a panel.

use std::fmt;

use log::info;
use rayon::prelude::*;

use faro_traits::{EntityHistory, Factor, FaroError, Panel, Result};

use crate::registry::create_factor;

/// An ordered collection of factors computed together.
pub struct FactorSet {
    factors: Vec<Box<dyn Factor>>,
}

impl fmt::Debug for FactorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorSet")
            .field("factors", &self.names())
            .finish()
    }
}

impl FactorSet {
    /// Wraps already-built factors.
    pub fn new(factors: Vec<Box<dyn Factor>>) -> Self {
        Self { factors }
    }

    /// Builds each named factor through the registry.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::FactorNotFound`] for the first unknown name.
    pub fn from_names<S: AsRef<str>>(names: &[S], price_field: &str) -> Result<Self> {
        let factors = names
            .iter()
            .map(|name| create_factor(name.as_ref(), price_field))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(factors))
    }

    /// Factor names in computation order.
    pub fn names(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.name()).collect()
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Returns `panel` with one added column per factor.
    ///
    /// Each factor sees only one ticker's date-ordered history at a time, so
    /// no value ever mixes two tickers. Entities are processed in parallel;
    /// results are scattered back into the panel's own row order.
    ///
    /// # Errors
    ///
    /// Returns [`FaroError::MissingColumn`] before any work starts if a
    /// factor's input column is absent.
    pub fn compute(&self, panel: &Panel) -> Result<Panel> {
        for factor in &self.factors {
            if let Some(missing) = factor
                .required_columns()
                .into_iter()
                .find(|c| !panel.has_column(c))
            {
                return Err(FaroError::MissingColumn(format!(
                    "{missing} (required by {})",
                    factor.name()
                )));
            }
        }

        let groups = panel.by_entity();
        let per_entity = groups
            .par_iter()
            .map(|group| {
                let history = EntityHistory::new(panel, group);
                self.factors
                    .iter()
                    .map(|factor| {
                        let values = factor.compute(&history)?;
                        if values.len() != history.len() {
                            return Err(FaroError::InvalidData(format!(
                                "factor {} returned {} values for {} rows of {}",
                                factor.name(),
                                values.len(),
                                history.len(),
                                history.ticker()
                            )));
                        }
                        Ok(values)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut columns = vec![vec![f64::NAN; panel.len()]; self.factors.len()];
        for (group, values) in groups.iter().zip(per_entity) {
            for (column, factor_values) in columns.iter_mut().zip(values) {
                for (&row, value) in group.rows.iter().zip(factor_values) {
                    column[row] = value;
                }
            }
        }

        let mut out = panel.clone();
        for (factor, values) in self.factors.iter().zip(columns) {
            out = out.with_column(factor.name(), values)?;
        }

        info!(
            "Computed {} factors over {} tickers, {} rows",
            self.factors.len(),
            groups.len(),
            out.len()
        );
        Ok(out)
    }
}
