//! Column names and categorical buckets of the accident table.

use std::fmt;
use std::str::FromStr;

pub const STATE: &str = "State/UT";
pub const YEAR: &str = "Year";
pub const VEHICLES: &str = "Number of Registered Vehicles";
pub const ACCIDENTS: &str = "Number of Road Accidents";
pub const RATE: &str = "Accident per 1,000 vehicles";
pub const FATALITIES: &str = "Fatality";

pub const FATALITIES_PER_ACCIDENT: &str = "Fatalities per Accident";
pub const ACCIDENTS_PER_MILLION: &str = "Accidents per Million Vehicles";
pub const YOY_CHANGE: &str = "YoY Accident Change (%)";
pub const RISK_CATEGORY: &str = "Risk Category";
pub const COVID_PERIOD: &str = "COVID Period";

/// Numeric measures that must be present on every cleaned row.
pub const MEASURES: [&str; 4] = [VEHICLES, ACCIDENTS, RATE, FATALITIES];

/// Accident rates strictly above this are high risk.
pub const HIGH_RISK_RATE: f64 = 5.0;
/// Accident rates strictly above this (and not high) are medium risk.
pub const MEDIUM_RISK_RATE: f64 = 2.0;

pub const COVID_YEARS: [i32; 2] = [2020, 2021];

/// Bucketing of the accident rate per 1,000 vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskCategory {
    High,
    Medium,
    Low,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [RiskCategory::High, RiskCategory::Medium, RiskCategory::Low];

    /// Boundary values fall into the lower bucket; NaN is low risk.
    pub fn from_rate(rate: f64) -> Self {
        if rate > HIGH_RISK_RATE {
            RiskCategory::High
        } else if rate > MEDIUM_RISK_RATE {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::High => "High Risk",
            RiskCategory::Medium => "Medium Risk",
            RiskCategory::Low => "Low Risk",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskCategory::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| format!("unknown risk category: {s}"))
    }
}

/// Whether a year falls in the COVID-affected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CovidPeriod {
    Covid,
    NonCovid,
}

impl CovidPeriod {
    pub fn from_year(year: i32) -> Self {
        if COVID_YEARS.contains(&year) {
            CovidPeriod::Covid
        } else {
            CovidPeriod::NonCovid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CovidPeriod::Covid => "COVID",
            CovidPeriod::NonCovid => "Non-COVID",
        }
    }
}
