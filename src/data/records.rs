//! Typed row view over a cleaned accident table.

use super::schema::{ACCIDENTS, FATALITIES, RATE, STATE, VEHICLES, YEAR};
use polars::prelude::*;

/// One State/UT × Year row.
#[derive(Debug, Clone, PartialEq)]
pub struct AccidentRecord {
    pub state: String,
    pub year: i32,
    pub vehicles: f64,
    pub accidents: f64,
    pub rate: f64,
    pub fatalities: f64,
}

impl AccidentRecord {
    /// Read every row of a cleaned frame, in frame order.
    ///
    /// Fails on a null in any required field, which a cleaned frame never has.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let states = df.column(STATE)?.str()?;
        let years = df.column(YEAR)?.i32()?;
        let vehicles = df.column(VEHICLES)?.f64()?;
        let accidents = df.column(ACCIDENTS)?.f64()?;
        let rates = df.column(RATE)?.f64()?;
        let fatalities = df.column(FATALITIES)?.f64()?;

        (0..df.height())
            .map(|i| {
                match (
                    states.get(i),
                    years.get(i),
                    vehicles.get(i),
                    accidents.get(i),
                    rates.get(i),
                    fatalities.get(i),
                ) {
                    (Some(state), Some(year), Some(vehicles), Some(accidents), Some(rate), Some(fatalities)) => {
                        Ok(Self {
                            state: state.to_string(),
                            year,
                            vehicles,
                            accidents,
                            rate,
                            fatalities,
                        })
                    }
                    _ => Err(PolarsError::ComputeError(
                        format!("row {i} has a missing required field").into(),
                    )),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::clean_frame;

    #[test]
    fn reads_rows_in_frame_order() {
        let df = clean_frame(&[
            ("Goa", 2020, 10.0, 2.0, 0.2, 1.0),
            ("Delhi", 2019, 20.0, 4.0, 0.2, 3.0),
        ]);
        let records = AccidentRecord::from_frame(&df).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].state, "Goa");
        assert_eq!(records[1].year, 2019);
        assert_eq!(records[1].fatalities, 3.0);
    }

    #[test]
    fn null_field_is_an_error() {
        let df = DataFrame::new(vec![
            Column::new(STATE.into(), vec![Some("Goa")]),
            Column::new(YEAR.into(), vec![Some(2020i32)]),
            Column::new(VEHICLES.into(), vec![None::<f64>]),
            Column::new(ACCIDENTS.into(), vec![Some(1.0)]),
            Column::new(RATE.into(), vec![Some(1.0)]),
            Column::new(FATALITIES.into(), vec![Some(1.0)]),
        ])
        .unwrap();
        assert!(AccidentRecord::from_frame(&df).is_err());
    }
}
