//! Auto-generated findings shown under the charts.

use super::aggregator::{ScatterPoint, StateTotal, YearTotals};
use crate::data::{CovidPeriod, RiskCategory};
use num_format::{Locale, ToFormattedString};
use statrs::statistics::Statistics;

/// Mean yearly accidents inside and outside the COVID years.
#[derive(Debug, Clone, PartialEq)]
pub struct CovidComparison {
    pub covid_mean: f64,
    pub non_covid_mean: f64,
}

impl CovidComparison {
    /// Percentage change of the COVID mean against the rest.
    pub fn change_pct(&self) -> f64 {
        (self.covid_mean - self.non_covid_mean) / self.non_covid_mean * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighRiskSummary {
    pub rows: usize,
    pub states: usize,
    pub mean_rate: f64,
    pub mean_vehicles: f64,
    /// Mean vehicles over rows that are not high risk.
    pub other_mean_vehicles: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insights {
    pub peak_year: Option<YearTotals>,
    pub top_state: Option<StateTotal>,
    pub covid: Option<CovidComparison>,
    /// Pearson correlation between registered vehicles and accidents.
    pub vehicle_accident_correlation: Option<f64>,
    pub high_risk: Option<HighRiskSummary>,
}

impl Insights {
    pub fn derive(
        trend: &[YearTotals],
        ranking: &[StateTotal],
        points: &[ScatterPoint],
    ) -> Self {
        Self {
            peak_year: Self::peak_year(trend),
            top_state: ranking.first().cloned(),
            covid: Self::covid_comparison(trend),
            vehicle_accident_correlation: Self::correlation(points),
            high_risk: Self::high_risk(points),
        }
    }

    /// Year with the most accidents; the earliest wins a tie.
    fn peak_year(trend: &[YearTotals]) -> Option<YearTotals> {
        trend
            .iter()
            .fold(None::<&YearTotals>, |best, t| match best {
                Some(b) if b.accidents >= t.accidents => Some(b),
                _ => Some(t),
            })
            .cloned()
    }

    fn covid_comparison(trend: &[YearTotals]) -> Option<CovidComparison> {
        let (covid, other): (Vec<&YearTotals>, Vec<&YearTotals>) = trend
            .iter()
            .partition(|t| CovidPeriod::from_year(t.year) == CovidPeriod::Covid);
        if covid.is_empty() || other.is_empty() {
            return None;
        }

        let covid_mean = covid.iter().map(|t| t.accidents).mean();
        let non_covid_mean = other.iter().map(|t| t.accidents).mean();
        if non_covid_mean == 0.0 {
            return None;
        }
        Some(CovidComparison {
            covid_mean,
            non_covid_mean,
        })
    }

    fn correlation(points: &[ScatterPoint]) -> Option<f64> {
        let (vehicles, accidents): (Vec<f64>, Vec<f64>) = points
            .iter()
            .filter(|p| p.vehicles.is_finite() && p.accidents.is_finite())
            .map(|p| (p.vehicles, p.accidents))
            .unzip();
        if vehicles.len() < 2 {
            return None;
        }

        let sd_v = vehicles.iter().std_dev();
        let sd_a = accidents.iter().std_dev();
        if sd_v == 0.0 || sd_a == 0.0 {
            return None;
        }
        let r = vehicles.iter().covariance(accidents.iter()) / (sd_v * sd_a);
        r.is_finite().then_some(r)
    }

    fn high_risk(points: &[ScatterPoint]) -> Option<HighRiskSummary> {
        let (high, other): (Vec<&ScatterPoint>, Vec<&ScatterPoint>) =
            points.iter().partition(|p| p.risk == RiskCategory::High);
        if high.is_empty() {
            return None;
        }

        let mut states: Vec<&str> = high.iter().map(|p| p.state.as_str()).collect();
        states.sort_unstable();
        states.dedup();

        Some(HighRiskSummary {
            rows: high.len(),
            states: states.len(),
            mean_rate: high
                .iter()
                .map(|p| p.rate)
                .filter(|v| v.is_finite())
                .mean(),
            mean_vehicles: high.iter().map(|p| p.vehicles).mean(),
            other_mean_vehicles: (!other.is_empty())
                .then(|| other.iter().map(|p| p.vehicles).mean()),
        })
    }

    /// Human-readable findings, one per line.
    pub fn bullet_points(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(peak) = &self.peak_year {
            lines.push(format!(
                "Road accidents peaked in {} ({} accidents).",
                peak.year,
                format_count(peak.accidents)
            ));
        }
        if let Some(top) = &self.top_state {
            lines.push(format!(
                "{} recorded the highest number of accidents ({}).",
                top.state,
                format_count(top.accidents)
            ));
        }
        if let Some(covid) = &self.covid {
            let change = covid.change_pct();
            let direction = if change < 0.0 { "lower" } else { "higher" };
            lines.push(format!(
                "Average yearly accidents during COVID years (2020-2021) were {:.1}% {} than in other years.",
                change.abs(),
                direction
            ));
        }
        if let Some(r) = self.vehicle_accident_correlation {
            lines.push(format!(
                "Registered vehicles and accidents have a correlation of {:.2}.",
                r
            ));
        }
        if let Some(high) = &self.high_risk {
            let mut line = format!(
                "{} high-risk rows across {} states/UTs average {:.2} accidents per 1,000 vehicles",
                high.rows, high.states, high.mean_rate
            );
            match high.other_mean_vehicles {
                Some(other) if high.mean_vehicles < other => {
                    line.push_str(" despite having fewer vehicles on average.")
                }
                _ => line.push('.'),
            }
            lines.push(line);
        }
        lines
    }
}

/// Integer with thousands separators, e.g. `1,234,567`.
pub fn format_count(value: f64) -> String {
    (value.round() as i64).to_formatted_string(&Locale::en)
}
