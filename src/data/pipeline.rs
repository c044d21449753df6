//! Pipeline composition: load → clean → engineer, then filter → aggregate.
//!
//! Both halves are re-run from the cached raw table on every filter change;
//! nothing here holds state between calls.

use super::cleaner::{CleanError, DataCleaner};
use super::features::{FeatureEngine, FeatureError};
use super::filter::{DataFilter, FilterError, FilterSpec};
use super::loader::{DataLoader, LoaderError};
use crate::stats::{
    Aggregator, Insights, Kpis, RateMatrix, ScatterPoint, StateTotal, YearTotals,
};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanError),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] PolarsError),
}

/// Load the CSV (memoized), clean it and add the derived columns.
///
/// Fails when the file cannot be read or no valid row survives cleaning.
pub fn load_and_clean(loader: &mut DataLoader, path: &Path) -> Result<DataFrame, PipelineError> {
    let raw = loader.load(path)?;
    let clean = DataCleaner::clean(&raw)?;
    Ok(FeatureEngine::engineer(&clean)?)
}

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub table: DataFrame,
    pub kpis: Kpis,
    pub trend: Vec<YearTotals>,
    pub top_states: Vec<StateTotal>,
    pub rate_matrix: RateMatrix,
    pub scatter: Vec<ScatterPoint>,
    pub insights: Insights,
}

/// Result of filtering: aggregates are only computed over a non-empty table.
#[derive(Debug, Clone)]
pub enum DashboardView {
    NoData,
    Ready(Box<DashboardSummary>),
}

impl DashboardView {
    pub fn build(
        table: &DataFrame,
        spec: &FilterSpec,
        top_n: usize,
    ) -> Result<Self, PipelineError> {
        let filtered = DataFilter::apply(table, spec)?;
        if filtered.height() == 0 {
            info!("no rows match the selected filters");
            return Ok(Self::NoData);
        }

        let trend = Aggregator::yearly_trend(&filtered)?;
        let top_states = Aggregator::top_states(&filtered, top_n)?;
        let scatter = Aggregator::scatter_points(&filtered)?;
        let insights = Insights::derive(&trend, &top_states, &scatter);

        Ok(Self::Ready(Box::new(DashboardSummary {
            kpis: Aggregator::kpis(&filtered)?,
            rate_matrix: Aggregator::rate_matrix(&filtered)?,
            trend,
            top_states,
            scatter,
            insights,
            table: filtered,
        })))
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        match self {
            Self::Ready(summary) => Some(summary),
            Self::NoData => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::write_csv;
    use crate::data::filter::FilterOptions;
    use crate::data::schema::{RiskCategory, RISK_CATEGORY, YOY_CHANGE};

    fn delhi_csv() -> tempfile::NamedTempFile {
        write_csv(&[
            "Delhi,2020,1010000,3000,2.97,250",
            "Delhi,2019,1000000,5000,5.0,500",
            "Total,All,1,1,1,1",
            "Goa,2019,100000,150,1.5,20",
        ])
    }

    #[test]
    fn load_and_clean_builds_featured_table() {
        let file = delhi_csv();
        let mut loader = DataLoader::new();
        let table = load_and_clean(&mut loader, file.path()).unwrap();

        assert_eq!(table.height(), 3);
        let yoy: Vec<Option<f64>> = table
            .column(YOY_CHANGE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(yoy, vec![None, Some(-40.0), None]);
        let risk = table.column(RISK_CATEGORY).unwrap().str().unwrap().get(0);
        assert_eq!(risk, Some("Medium Risk"));
    }

    #[test]
    fn repeated_runs_read_the_file_once() {
        let file = delhi_csv();
        let mut loader = DataLoader::new();
        let first = load_and_clean(&mut loader, file.path()).unwrap();
        let second = load_and_clean(&mut loader, file.path()).unwrap();
        assert!(first.equals_missing(&second));
        assert_eq!(loader.read_count(), 1);
    }

    #[test]
    fn file_without_valid_rows_is_fatal() {
        let file = write_csv(&["Total,All,x,y,z,w"]);
        let mut loader = DataLoader::new();
        let err = load_and_clean(&mut loader, file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Clean(CleanError::Empty)));
    }

    #[test]
    fn missing_file_is_fatal() {
        let mut loader = DataLoader::new();
        let err = load_and_clean(&mut loader, Path::new("no-such-file.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Loader(_)));
    }

    #[test]
    fn empty_selection_short_circuits() {
        let file = delhi_csv();
        let mut loader = DataLoader::new();
        let table = load_and_clean(&mut loader, file.path()).unwrap();
        let mut spec = FilterSpec::select_all(&FilterOptions::from_table(&table).unwrap());
        spec.risk_categories = [RiskCategory::High].into_iter().collect();

        let view = DashboardView::build(&table, &spec, 10).unwrap();
        assert!(matches!(view, DashboardView::NoData));
        assert!(view.summary().is_none());
    }

    #[test]
    fn ready_view_holds_every_summary() {
        let file = delhi_csv();
        let mut loader = DataLoader::new();
        let table = load_and_clean(&mut loader, file.path()).unwrap();
        let spec = FilterSpec::select_all(&FilterOptions::from_table(&table).unwrap());

        let view = DashboardView::build(&table, &spec, 1).unwrap();
        let summary = view.summary().unwrap();

        assert_eq!(summary.table.height(), 3);
        assert_eq!(summary.kpis.accidents, 8150.0);
        assert_eq!(summary.trend.len(), 2);
        assert_eq!(summary.top_states.len(), 1);
        assert_eq!(summary.top_states[0].state, "Delhi");
        assert_eq!(summary.rate_matrix.value("Goa", 2020), None);
        assert_eq!(summary.scatter.len(), 3);
        assert_eq!(summary.insights.peak_year.as_ref().map(|p| p.year), Some(2019));
    }
}
