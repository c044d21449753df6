//! Data Cleaner Module
//! Normalizes column names, coerces numeric fields and drops incomplete rows.

use super::schema::{MEASURES, STATE, YEAR};
use polars::prelude::*;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column `{0}` not found in the CSV")]
    MissingColumn(String),
    #[error("No valid rows left after cleaning")]
    Empty,
}

/// Turns the raw CSV table into one typed row per (state, year).
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a raw table.
    ///
    /// Unparseable numbers become missing instead of failing; any row missing
    /// a required field is dropped. An empty result is fatal.
    pub fn clean(raw: &DataFrame) -> Result<DataFrame, CleanError> {
        let mut df = raw.clone();
        Self::normalize_column_names(&mut df)?;
        Self::require_columns(&df)?;

        for name in std::iter::once(YEAR).chain(MEASURES) {
            let column = Self::numeric_column(&df, name)?;
            df.with_column(column)?;
        }
        let state = Self::state_column(&df)?;
        df.with_column(state)?;

        let before = df.height();
        let df = Self::drop_incomplete(df)?;
        if df.height() < before {
            warn!(
                dropped = before - df.height(),
                "dropped rows with missing required fields"
            );
        }

        // Only safe once missing years are gone
        let mut df = df;
        let year = df.column(YEAR)?.cast(&DataType::Int32)?;
        df.with_column(year)?;

        let df = Self::dedupe_state_year(df)?;
        if df.height() == 0 {
            return Err(CleanError::Empty);
        }

        info!(rows = df.height(), "cleaned table");
        Ok(df)
    }

    /// Trim header whitespace and locate the year column case-insensitively.
    fn normalize_column_names(df: &mut DataFrame) -> Result<(), CleanError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in &names {
            let trimmed = name.trim();
            if trimmed != name {
                df.rename(name, trimmed.into())?;
            }
        }

        if df.get_column_index(YEAR).is_none() {
            let year_like = df
                .get_column_names()
                .iter()
                .find(|name| name.eq_ignore_ascii_case(YEAR))
                .map(|name| name.to_string());
            if let Some(name) = year_like {
                df.rename(&name, YEAR.into())?;
            }
        }
        Ok(())
    }

    fn require_columns(df: &DataFrame) -> Result<(), CleanError> {
        for name in [STATE, YEAR].into_iter().chain(MEASURES) {
            if df.get_column_index(name).is_none() {
                return Err(CleanError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Float64 copy of a column with unparseable values and NaN as null.
    ///
    /// Years outside the Int32 range are nulled too, so the later cast
    /// cannot introduce nulls after the drop.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Column, CleanError> {
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let year_bounds = i32::MIN as f64..=i32::MAX as f64;
        let values: Vec<Option<f64>> = cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .map(|v| v.filter(|x| name != YEAR || year_bounds.contains(x)))
            .collect();
        Ok(Column::new(name.into(), values))
    }

    /// String copy of the state column with blank names as null.
    fn state_column(df: &DataFrame) -> Result<Column, CleanError> {
        let cast = df.column(STATE)?.cast(&DataType::String)?;
        let values: Vec<Option<&str>> = cast
            .str()?
            .into_iter()
            .map(|v| v.filter(|s| !s.trim().is_empty()))
            .collect();
        Ok(Column::new(STATE.into(), values))
    }

    fn drop_incomplete(df: DataFrame) -> Result<DataFrame, CleanError> {
        let complete = MEASURES
            .iter()
            .fold(col(STATE).is_not_null().and(col(YEAR).is_not_null()), |acc, name| {
                acc.and(col(*name).is_not_null())
            });
        Ok(df.lazy().filter(complete).collect()?)
    }

    /// Keep the first row of each (state, year) pair.
    fn dedupe_state_year(df: DataFrame) -> Result<DataFrame, CleanError> {
        let mut seen = HashSet::new();
        let keep: Vec<bool> = df
            .column(STATE)?
            .str()?
            .into_iter()
            .zip(df.column(YEAR)?.i32()?)
            .map(|(state, year)| seen.insert((state.map(str::to_string), year)))
            .collect();

        let duplicates = keep.iter().filter(|k| !**k).count();
        if duplicates == 0 {
            return Ok(df);
        }
        warn!(duplicates, "dropped duplicate state/year rows");
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        Ok(df.filter(&mask)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{clean_frame, floats, strings, write_csv, years};
    use crate::data::loader::DataLoader;
    use crate::data::schema::{ACCIDENTS, FATALITIES, RATE, VEHICLES};

    fn raw(columns: Vec<Column>) -> DataFrame {
        DataFrame::new(columns).unwrap()
    }

    fn string_col(name: &str, values: &[Option<&str>]) -> Column {
        Column::new(name.into(), values.to_vec())
    }

    fn raw_measures(values: &[Option<&str>]) -> Vec<Column> {
        MEASURES
            .iter()
            .map(|name| string_col(name, values))
            .collect()
    }

    #[test]
    fn cleaning_a_clean_table_is_a_noop() {
        let df = clean_frame(&[
            ("Delhi", 2019, 1_000_000.0, 5000.0, 5.0, 500.0),
            ("Delhi", 2020, 1_010_000.0, 3000.0, 2.97, 250.0),
        ]);
        let cleaned = DataCleaner::clean(&df).unwrap();

        assert_eq!(cleaned.get_column_names(), df.get_column_names());
        assert!(cleaned.equals_missing(&df));
    }

    #[test]
    fn csv_table_is_stable_after_one_clean() {
        let file = write_csv(&[
            "Delhi,2019,1000000,5000,5.0,500",
            "Goa,2019,100000,150,1.5,20",
        ]);
        let raw = DataLoader::new().load(file.path()).unwrap();

        let once = DataCleaner::clean(&raw).unwrap();
        assert_eq!(once.column(YEAR).unwrap().dtype(), &DataType::Int32);
        let twice = DataCleaner::clean(&once).unwrap();
        assert!(twice.equals_missing(&once));
    }

    #[test]
    fn year_outside_int32_range_drops_the_row() {
        let file = write_csv(&[
            "Delhi,2019,1000000,5000,5.0,500",
            "Delhi,99999999999,1000000,5000,5.0,500",
        ]);
        let raw = DataLoader::new().load(file.path()).unwrap();
        let cleaned = DataCleaner::clean(&raw).unwrap();

        assert_eq!(years(&cleaned), vec![2019]);
        assert_eq!(strings(&cleaned, STATE), vec!["Delhi"]);
    }

    #[test]
    fn trims_headers_and_renames_year_case_insensitively() {
        let mut columns = vec![
            string_col(" State/UT ", &[Some("Goa")]),
            string_col("  year", &[Some("2019")]),
        ];
        columns.extend(raw_measures(&[Some("10")]));
        let cleaned = DataCleaner::clean(&raw(columns)).unwrap();

        assert!(cleaned.get_column_index(STATE).is_some());
        assert_eq!(years(&cleaned), vec![2019]);
        assert_eq!(cleaned.column(YEAR).unwrap().dtype(), &DataType::Int32);
    }

    #[test]
    fn unparseable_values_drop_the_row() {
        let mut columns = vec![
            string_col(STATE, &[Some("Goa"), Some("Goa"), Some("Goa"), Some("Goa")]),
            string_col(YEAR, &[Some("2019"), Some("n/a"), Some("2021"), Some("2022")]),
        ];
        columns.extend(vec![
            string_col(VEHICLES, &[Some("100"), Some("100"), Some("abc"), Some("100")]),
            string_col(ACCIDENTS, &[Some("5"), Some("5"), Some("5"), Some("5")]),
            string_col(RATE, &[Some("0.05"), Some("0.05"), Some("0.05"), None]),
            string_col(FATALITIES, &[Some("1"), Some("1"), Some("1"), Some("1")]),
        ]);
        let cleaned = DataCleaner::clean(&raw(columns)).unwrap();

        assert_eq!(years(&cleaned), vec![2019]);
        assert_eq!(floats(&cleaned, VEHICLES), vec![Some(100.0)]);
    }

    #[test]
    fn blank_state_is_dropped() {
        let mut columns = vec![
            string_col(STATE, &[Some("  "), Some("Goa")]),
            string_col(YEAR, &[Some("2019"), Some("2019")]),
        ];
        columns.extend(raw_measures(&[Some("1"), Some("1")]));
        let cleaned = DataCleaner::clean(&raw(columns)).unwrap();
        assert_eq!(strings(&cleaned, STATE), vec!["Goa"]);
    }

    #[test]
    fn duplicate_state_year_keeps_first() {
        let df = clean_frame(&[
            ("Goa", 2019, 100.0, 5.0, 0.05, 1.0),
            ("Goa", 2019, 200.0, 9.0, 0.09, 2.0),
        ]);
        let cleaned = DataCleaner::clean(&df).unwrap();
        assert_eq!(floats(&cleaned, VEHICLES), vec![Some(100.0)]);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let columns = vec![
            string_col(STATE, &[Some("Goa")]),
            string_col(YEAR, &[Some("2019")]),
        ];
        let err = DataCleaner::clean(&raw(columns)).unwrap_err();
        assert!(matches!(err, CleanError::MissingColumn(name) if name == VEHICLES));
    }

    #[test]
    fn all_rows_invalid_is_fatal() {
        let mut columns = vec![
            string_col(STATE, &[Some("Goa")]),
            string_col(YEAR, &[Some("Total")]),
        ];
        columns.extend(raw_measures(&[Some("1")]));
        let err = DataCleaner::clean(&raw(columns)).unwrap_err();
        assert!(matches!(err, CleanError::Empty));
    }
}
