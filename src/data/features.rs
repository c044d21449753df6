//! Feature Engine Module
//! Adds ratio, rate, risk bucket, COVID flag and year-over-year columns.

use super::records::AccidentRecord;
use super::schema::*;
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Derives the per-row metrics from a cleaned table.
pub struct FeatureEngine;

impl FeatureEngine {
    /// Return a copy of `clean` sorted by (state, year) with the derived columns.
    ///
    /// Zero denominators give non-finite ratios; they are kept as-is and
    /// skipped by the aggregations.
    pub fn engineer(clean: &DataFrame) -> Result<DataFrame, FeatureError> {
        let mut df = clean.sort(
            [STATE, YEAR],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;
        let records = AccidentRecord::from_frame(&df)?;

        let fatalities_per_accident: Vec<f64> = records
            .iter()
            .map(|r| r.fatalities / r.accidents)
            .collect();
        let accidents_per_million: Vec<f64> = records
            .iter()
            .map(|r| r.accidents / r.vehicles * 1_000_000.0)
            .collect();
        let risk: Vec<&str> = records
            .iter()
            .map(|r| RiskCategory::from_rate(r.rate).label())
            .collect();
        let covid: Vec<&str> = records
            .iter()
            .map(|r| CovidPeriod::from_year(r.year).label())
            .collect();

        for column in [
            Column::new(FATALITIES_PER_ACCIDENT.into(), fatalities_per_accident),
            Column::new(ACCIDENTS_PER_MILLION.into(), accidents_per_million),
            Column::new(YOY_CHANGE.into(), Self::yoy_change(&records)),
            Column::new(RISK_CATEGORY.into(), risk),
            Column::new(COVID_PERIOD.into(), covid),
        ] {
            df.with_column(column)?;
        }

        debug!(rows = df.height(), "engineered features");
        Ok(df)
    }

    /// Percentage change in accidents against the same state's previous row.
    ///
    /// `records` must be sorted by (state, year); each state's first year is `None`.
    pub fn yoy_change(records: &[AccidentRecord]) -> Vec<Option<f64>> {
        records
            .iter()
            .enumerate()
            .map(|(i, current)| {
                let prev = i.checked_sub(1).map(|j| &records[j])?;
                if prev.state != current.state {
                    return None;
                }
                Some((current.accidents - prev.accidents) / prev.accidents * 100.0)
            })
            .collect()
    }
}
