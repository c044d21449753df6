//! Data Filter Module
//! Applies the year range, state and risk category selections.

use super::records::AccidentRecord;
use super::schema::{RiskCategory, RISK_CATEGORY, STATE, YEAR};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Cannot derive filter options from an empty table")]
    EmptyTable,
}

/// User selection; a row passes only if it satisfies all three predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub years: RangeInclusive<i32>,
    pub states: BTreeSet<String>,
    pub risk_categories: BTreeSet<RiskCategory>,
}

impl FilterSpec {
    /// Selection covering every option, the dashboard's initial state.
    pub fn select_all(options: &FilterOptions) -> Self {
        Self {
            years: options.year_min..=options.year_max,
            states: options.states.iter().cloned().collect(),
            risk_categories: options.risk_categories.iter().copied().collect(),
        }
    }
}

/// Choices offered by the filter controls for a given table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub year_min: i32,
    pub year_max: i32,
    /// Sorted, unique.
    pub states: Vec<String>,
    /// Categories present in the table, High to Low.
    pub risk_categories: Vec<RiskCategory>,
}

impl FilterOptions {
    pub fn from_table(df: &DataFrame) -> Result<Self, FilterError> {
        let records = AccidentRecord::from_frame(df)?;
        let year_min = records
            .iter()
            .map(|r| r.year)
            .min()
            .ok_or(FilterError::EmptyTable)?;
        let year_max = records
            .iter()
            .map(|r| r.year)
            .max()
            .ok_or(FilterError::EmptyTable)?;

        let states: BTreeSet<String> = records.iter().map(|r| r.state.clone()).collect();
        let risk_categories: BTreeSet<RiskCategory> = records
            .iter()
            .map(|r| RiskCategory::from_rate(r.rate))
            .collect();

        Ok(Self {
            year_min,
            year_max,
            states: states.into_iter().collect(),
            risk_categories: risk_categories.into_iter().collect(),
        })
    }
}

pub struct DataFilter;

impl DataFilter {
    /// Rows of a feature-engineered table matching `spec`, in table order.
    ///
    /// An empty result is a normal outcome; callers must check `height()`
    /// before aggregating.
    pub fn apply(df: &DataFrame, spec: &FilterSpec) -> Result<DataFrame, FilterError> {
        let risk_labels: HashSet<&str> = spec.risk_categories.iter().map(|c| c.label()).collect();

        let states = df.column(STATE)?.str()?;
        let years = df.column(YEAR)?.i32()?;
        let risks = df.column(RISK_CATEGORY)?.str()?;

        let keep: Vec<bool> = (0..df.height())
            .map(|i| {
                let year_ok = years.get(i).is_some_and(|y| spec.years.contains(&y));
                let state_ok = states.get(i).is_some_and(|s| spec.states.contains(s));
                let risk_ok = risks.get(i).is_some_and(|r| risk_labels.contains(r));
                year_ok && state_ok && risk_ok
            })
            .collect();

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let filtered = df.filter(&mask)?;
        debug!(
            rows = filtered.height(),
            of = df.height(),
            years = ?spec.years,
            states = spec.states.len(),
            "applied filter"
        );
        Ok(filtered)
    }
}
