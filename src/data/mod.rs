//! Data module - CSV loading, cleaning, feature engineering and filtering

mod cleaner;
mod features;
mod filter;
mod loader;
mod pipeline;
mod records;
mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use filter::{FilterOptions, FilterSpec};
pub use loader::DataLoader;
pub use pipeline::{load_and_clean, DashboardSummary, DashboardView};
pub use records::AccidentRecord;
pub use schema::{CovidPeriod, RiskCategory, ACCIDENTS, FATALITIES, YEAR};
