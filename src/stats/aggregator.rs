//! Aggregator Module
//! Summaries of the filtered table that feed the KPIs, charts and heatmap.
//!
//! Every reduction skips non-finite values so that rows with zero
//! denominators never poison a total or a mean.

use crate::data::{AccidentRecord, RiskCategory, ACCIDENTS, FATALITIES, YEAR};
use polars::prelude::*;
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap};

/// Yearly totals for the trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub accidents: f64,
    pub fatalities: f64,
}

/// Accident total for one state in the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTotal {
    pub state: String,
    pub accidents: f64,
}

/// Headline numbers over the filtered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub vehicles: f64,
    pub accidents: f64,
    pub fatalities: f64,
    /// Mean accident rate per 1,000 vehicles; `None` without finite rates.
    pub avg_rate: Option<f64>,
}

/// One row of the vehicles vs accidents scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub state: String,
    pub year: i32,
    pub vehicles: f64,
    pub accidents: f64,
    pub rate: f64,
    pub fatalities: f64,
    pub risk: RiskCategory,
}

/// State × year grid of accident rates. Absent pairs are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateMatrix {
    /// Sorted row labels.
    pub states: Vec<String>,
    /// Sorted column labels.
    pub years: Vec<i32>,
    cells: Vec<Vec<Option<f64>>>,
}

impl RateMatrix {
    pub fn cell(&self, state_idx: usize, year_idx: usize) -> Option<f64> {
        self.cells.get(state_idx)?.get(year_idx).copied().flatten()
    }

    pub fn value(&self, state: &str, year: i32) -> Option<f64> {
        let s = self.states.iter().position(|s| s == state)?;
        let y = self.years.iter().position(|y| *y == year)?;
        self.cell(s, y)
    }

    pub fn row(&self, state_idx: usize) -> &[Option<f64>] {
        self.cells.get(state_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest and largest finite rate, for colour scaling.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// `name` with non-finite values replaced by zero, for sums.
fn finite(name: &str) -> Expr {
    when(col(name).is_finite())
        .then(col(name))
        .otherwise(lit(0.0))
        .alias(name)
}

fn finite_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).sum()
}

/// Handles the grouping and reductions over a filtered table.
pub struct Aggregator;

impl Aggregator {
    /// Accidents and fatalities summed per year, year ascending.
    pub fn yearly_trend(df: &DataFrame) -> PolarsResult<Vec<YearTotals>> {
        let totals = df
            .clone()
            .lazy()
            .group_by([col(YEAR)])
            .agg([finite(ACCIDENTS).sum(), finite(FATALITIES).sum()])
            .sort([YEAR], SortMultipleOptions::default())
            .collect()?;

        let years = totals.column(YEAR)?.i32()?;
        let accidents = totals.column(ACCIDENTS)?.f64()?;
        let fatalities = totals.column(FATALITIES)?.f64()?;
        Ok(years
            .into_iter()
            .zip(accidents)
            .zip(fatalities)
            .filter_map(|((year, accidents), fatalities)| {
                Some(YearTotals {
                    year: year?,
                    accidents: accidents.unwrap_or(0.0),
                    fatalities: fatalities.unwrap_or(0.0),
                })
            })
            .collect())
    }

    /// Top `n` states by summed accidents, descending.
    ///
    /// Ties keep the order in which the states first appear in `df`.
    pub fn top_states(df: &DataFrame, n: usize) -> PolarsResult<Vec<StateTotal>> {
        let records = AccidentRecord::from_frame(df)?;
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<StateTotal> = Vec::new();

        for r in &records {
            let idx = *index.entry(r.state.as_str()).or_insert_with(|| {
                totals.push(StateTotal {
                    state: r.state.clone(),
                    accidents: 0.0,
                });
                totals.len() - 1
            });
            if r.accidents.is_finite() {
                totals[idx].accidents += r.accidents;
            }
        }

        // sort_by is stable, so equal totals stay in first-seen order
        totals.sort_by(|a, b| b.accidents.total_cmp(&a.accidents));
        totals.truncate(n);
        Ok(totals)
    }

    /// Pivot the accident rate into a state × year grid.
    pub fn rate_matrix(df: &DataFrame) -> PolarsResult<RateMatrix> {
        let records = AccidentRecord::from_frame(df)?;
        let states: Vec<String> = records
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let years: Vec<i32> = records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells = vec![vec![None; years.len()]; states.len()];
        for r in &records {
            if let (Ok(s), Ok(y)) = (
                states.binary_search(&r.state),
                years.binary_search(&r.year),
            ) {
                cells[s][y] = Some(r.rate);
            }
        }

        Ok(RateMatrix {
            states,
            years,
            cells,
        })
    }

    /// Total vehicles, accidents and fatalities plus the mean accident rate.
    pub fn kpis(df: &DataFrame) -> PolarsResult<Kpis> {
        let records = AccidentRecord::from_frame(df)?;
        let rates: Vec<f64> = records
            .iter()
            .map(|r| r.rate)
            .filter(|v| v.is_finite())
            .collect();
        let avg_rate = if rates.is_empty() {
            None
        } else {
            Some(rates.iter().mean())
        };

        Ok(Kpis {
            vehicles: finite_sum(records.iter().map(|r| r.vehicles)),
            accidents: finite_sum(records.iter().map(|r| r.accidents)),
            fatalities: finite_sum(records.iter().map(|r| r.fatalities)),
            avg_rate,
        })
    }

    pub fn scatter_points(df: &DataFrame) -> PolarsResult<Vec<ScatterPoint>> {
        Ok(AccidentRecord::from_frame(df)?
            .into_iter()
            .map(|r| ScatterPoint {
                risk: RiskCategory::from_rate(r.rate),
                state: r.state,
                year: r.year,
                vehicles: r.vehicles,
                accidents: r.accidents,
                rate: r.rate,
                fatalities: r.fatalities,
            })
            .collect())
    }
}
