//! Static Chart Renderer
//! Writes PNG snapshots of the current dashboard with plotters.
//!
//! Files:
//! 1. `yearly_trend.png`: accidents and fatalities per year
//! 2. `top_states.png`: ranking bar chart
//! 3. `rate_heatmap.png`: State/UT × Year accident rate grid

use super::palette::{self, Rgb};
use crate::data::DashboardSummary;
use crate::stats::{RateMatrix, StateTotal, YearTotals};
use plotters::coord::types::RangedCoordu32;
use plotters::coord::ranged1d::SegmentedCoord;
use plotters::prelude::*;
use plotters::style::FontTransform;
use rayon::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

pub type ExportResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Trend,
    TopStates,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Trend, ChartKind::TopStates, ChartKind::Heatmap];

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Trend => "yearly_trend.png",
            ChartKind::TopStates => "top_states.png",
            ChartKind::Heatmap => "rate_heatmap.png",
        }
    }
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir`, one file each, in parallel.
    pub fn export_all(summary: &DashboardSummary, dir: &Path) -> ExportResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let paths = ChartKind::ALL
            .par_iter()
            .map(|kind| {
                let path = dir.join(kind.file_name());
                match kind {
                    ChartKind::Trend => Self::render_trend(&summary.trend, &path)?,
                    ChartKind::TopStates => Self::render_top_states(&summary.top_states, &path)?,
                    ChartKind::Heatmap => Self::render_heatmap(&summary.rate_matrix, &path)?,
                }
                Ok(path)
            })
            .collect::<ExportResult<Vec<PathBuf>>>()?;

        info!(dir = %dir.display(), files = paths.len(), "exported charts");
        Ok(paths)
    }

    pub fn render_trend(trend: &[YearTotals], path: &Path) -> ExportResult<()> {
        let root = BitMapBackend::new(path, (1400, 800)).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = padded_max(trend.iter().flat_map(|t| [t.accidents, t.fatalities]));
        let mut chart = ChartBuilder::on(&root)
            .caption("Road Accidents and Fatalities Over Time", (FONT, 32))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(year_span(trend), 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Count")
            .x_label_formatter(&|year| year.to_string())
            .draw()?;

        let series: [(&str, Rgb, fn(&YearTotals) -> f64); 2] = [
            ("Number of Road Accidents", palette::ACCIDENTS, |t| t.accidents),
            ("Fatality", palette::FATALITIES, |t| t.fatalities),
        ];
        for (name, color, value) in series {
            let color = rgb(color);
            let points: Vec<(i32, f64)> = trend
                .iter()
                .filter(|t| value(t).is_finite())
                .map(|t| (t.year, value(t)))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(3)))?
                .label(name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
            chart.draw_series(
                points
                    .into_iter()
                    .map(move |p| Circle::new(p, 5, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()?;
        Ok(())
    }

    pub fn render_top_states(ranking: &[StateTotal], path: &Path) -> ExportResult<()> {
        let root = BitMapBackend::new(path, (1400, 900)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = ranking.len().max(1) as u32;
        let labels: Vec<&str> = ranking.iter().map(|s| s.state.as_str()).collect();
        let y_max = padded_max(ranking.iter().map(|s| s.accidents));

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} States by Road Accidents", ranking.len()),
                (FONT, 32),
            )
            .margin(20)
            .x_label_area_size(220)
            .y_label_area_size(90)
            .build_cartesian_2d(segments(n), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n as usize)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style((FONT, 16).into_font().transform(FontTransform::Rotate90))
            .y_desc("Number of Road Accidents")
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(rgb(palette::RANKING).filled())
                .margin(12)
                .data(
                    ranking
                        .iter()
                        .enumerate()
                        .filter(|(_, s)| s.accidents.is_finite())
                        .map(|(i, s)| (i as u32, s.accidents)),
                ),
        )?;

        root.present()?;
        Ok(())
    }

    pub fn render_heatmap(matrix: &RateMatrix, path: &Path) -> ExportResult<()> {
        let n_years = matrix.years.len().max(1) as u32;
        let n_states = matrix.states.len().max(1) as u32;
        let height = 160 + 28 * n_states;
        let root = BitMapBackend::new(path, (1600, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Accident Rate Heatmap (per 1,000 vehicles)", (FONT, 30))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(260)
            .build_cartesian_2d(segments(n_years), segments(n_states))?;

        // Row 0 is drawn at the top
        let state_label = |i: u32| {
            n_states
                .checked_sub(i + 1)
                .and_then(|row| matrix.states.get(row as usize))
                .cloned()
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n_years as usize)
            .y_labels(n_states as usize)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => matrix
                    .years
                    .get(*i as usize)
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => state_label(*i),
                _ => String::new(),
            })
            .draw()?;

        let range = matrix.value_range().unwrap_or((0.0, 0.0));
        let mut cells = Vec::new();
        for s in 0..matrix.states.len() {
            for y in 0..matrix.years.len() {
                let Some(value) = matrix.cell(s, y) else {
                    continue;
                };
                let (x, row) = (y as u32, n_states - 1 - s as u32);
                let color = rgb(palette::heat(palette::normalize(value, range)));
                cells.push(Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(row)),
                        (edge(x + 1, n_years), edge(row + 1, n_states)),
                    ],
                    color.filled(),
                ));
            }
        }
        chart.draw_series(cells)?;

        root.present()?;
        Ok(())
    }
}

/// Axis of `n` categories. Integer ranges are inclusive in plotters, so the
/// last key is `n - 1`.
fn segments(n: u32) -> SegmentedCoord<RangedCoordu32> {
    (0..n.saturating_sub(1)).into_segmented()
}

/// Left boundary of segment `i`, or the right end of the axis past the last one.
fn edge(i: u32, n: u32) -> SegmentValue<u32> {
    if i >= n {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(i)
    }
}

/// Upper bound for a value axis: 10% headroom over the largest finite value.
fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Year axis covering the trend, widened when it holds a single year.
fn year_span(trend: &[YearTotals]) -> Range<i32> {
    let first = trend.iter().map(|t| t.year).min().unwrap_or(0);
    let last = trend.iter().map(|t| t.year).max().unwrap_or(0);
    if first == last {
        first - 1..last + 1
    } else {
        first..last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{featured_frame, sample_rows};
    use crate::data::{DashboardView, FilterOptions, FilterSpec};
    use crate::stats::Aggregator;

    fn year(year: i32) -> YearTotals {
        YearTotals {
            year,
            accidents: 1.0,
            fatalities: 1.0,
        }
    }

    #[test]
    fn padded_max_ignores_non_finite_values() {
        assert!((padded_max([10.0, f64::INFINITY, 5.0].into_iter()) - 11.0).abs() < 1e-9);
        assert_eq!(padded_max(std::iter::empty()), 1.0);
        assert_eq!(padded_max([0.0].into_iter()), 1.0);
    }

    #[test]
    fn year_span_widens_single_year() {
        assert_eq!(year_span(&[year(2019), year(2022)]), 2019..2022);
        assert_eq!(year_span(&[year(2020)]), 2019..2021);
    }

    #[test]
    fn edge_past_the_last_segment_is_the_axis_end() {
        assert!(matches!(edge(2, 3), SegmentValue::Exact(2)));
        assert!(matches!(edge(3, 3), SegmentValue::Last));
    }

    #[test]
    fn heatmap_renders_every_state() {
        let matrix = Aggregator::rate_matrix(&featured_frame(&sample_rows())).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");

        StaticChartRenderer::render_heatmap(&matrix, &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn heatmap_renders_a_single_cell() {
        let matrix = Aggregator::rate_matrix(&featured_frame(&sample_rows()[..1])).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heatmap.png");

        StaticChartRenderer::render_heatmap(&matrix, &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn export_writes_all_three_files() {
        let table = featured_frame(&sample_rows());
        let spec = FilterSpec::select_all(&FilterOptions::from_table(&table).unwrap());
        let view = DashboardView::build(&table, &spec, 10).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let paths = StaticChartRenderer::export_all(view.summary().unwrap(), dir.path()).unwrap();
        assert_eq!(paths.len(), 3);
        for kind in ChartKind::ALL {
            assert!(dir.path().join(kind.file_name()).is_file());
        }
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<&str> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        names.dedup();
        assert_eq!(names.len(), 3);
    }
}
