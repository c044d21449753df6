//! Stats module - aggregations and auto-generated insights

mod aggregator;
mod insights;

pub use aggregator::{Aggregator, Kpis, RateMatrix, ScatterPoint, StateTotal, YearTotals};
pub use insights::{format_count, Insights};
