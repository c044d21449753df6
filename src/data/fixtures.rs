//! Shared test tables.

use super::cleaner::DataCleaner;
use super::features::FeatureEngine;
use super::schema::*;
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

pub const HEADER: &str = "State/UT,Year,Number of Registered Vehicles,Number of Road Accidents,\"Accident per 1,000 vehicles\",Fatality";

/// (state, year, vehicles, accidents, rate, fatalities)
pub type Row<'a> = (&'a str, i32, f64, f64, f64, f64);

pub fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

/// A frame already in cleaned form.
pub fn clean_frame(rows: &[Row]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(STATE.into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new(YEAR.into(), rows.iter().map(|r| r.1).collect::<Vec<i32>>()),
        Column::new(VEHICLES.into(), rows.iter().map(|r| r.2).collect::<Vec<f64>>()),
        Column::new(ACCIDENTS.into(), rows.iter().map(|r| r.3).collect::<Vec<f64>>()),
        Column::new(RATE.into(), rows.iter().map(|r| r.4).collect::<Vec<f64>>()),
        Column::new(FATALITIES.into(), rows.iter().map(|r| r.5).collect::<Vec<f64>>()),
    ])
    .unwrap()
}

pub fn featured_frame(rows: &[Row]) -> DataFrame {
    let cleaned = DataCleaner::clean(&clean_frame(rows)).unwrap();
    FeatureEngine::engineer(&cleaned).unwrap()
}

/// Three states over three years with mixed risk levels.
pub fn sample_rows() -> Vec<Row<'static>> {
    vec![
        ("Delhi", 2019, 1_000_000.0, 5000.0, 5.0, 500.0),
        ("Delhi", 2020, 1_010_000.0, 3000.0, 2.97, 250.0),
        ("Delhi", 2021, 1_020_000.0, 3500.0, 3.43, 300.0),
        ("Goa", 2019, 100_000.0, 150.0, 1.5, 20.0),
        ("Goa", 2020, 110_000.0, 100.0, 0.91, 12.0),
        ("Goa", 2021, 120_000.0, 130.0, 1.08, 15.0),
        ("Kerala", 2019, 500_000.0, 4000.0, 8.0, 400.0),
        ("Kerala", 2020, 510_000.0, 2800.0, 5.49, 280.0),
        ("Kerala", 2021, 520_000.0, 3300.0, 6.35, 330.0),
    ]
}

pub fn strings(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

pub fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().into_iter().collect()
}

pub fn years(df: &DataFrame) -> Vec<i32> {
    df.column(YEAR)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}
