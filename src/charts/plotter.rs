//! Chart Plotter Module
//! Creates the interactive dashboard visualizations using egui_plot.

use super::palette::{self, Rgb};
use crate::data::RiskCategory;
use crate::stats::{format_count, Kpis, RateMatrix, ScatterPoint, StateTotal, YearTotals};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

const CHART_HEIGHT: f32 = 320.0;
const HEAT_CELL: egui::Vec2 = egui::vec2(58.0, 22.0);

pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Draws the KPI cards, charts and heatmap of the dashboard.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Four headline numbers side by side.
    pub fn draw_kpis(ui: &mut egui::Ui, kpis: &Kpis) {
        let avg_rate = kpis
            .avg_rate
            .map(|r| format!("{:.2}", r))
            .unwrap_or_else(|| "-".to_string());
        let cards = [
            ("🚗 Total Vehicles", format_count(kpis.vehicles)),
            ("⚠ Total Accidents", format_count(kpis.accidents)),
            ("☠ Total Fatalities", format_count(kpis.fatalities)),
            ("📉 Avg Accident Rate", avg_rate),
        ];

        ui.columns(cards.len(), |columns| {
            for (ui, (label, value)) in columns.iter_mut().zip(cards) {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
                        ui.label(RichText::new(value).size(24.0).strong());
                    });
            }
        });
    }

    /// Accidents and fatalities per year.
    pub fn draw_trend_chart(ui: &mut egui::Ui, trend: &[YearTotals]) {
        let accidents: Vec<[f64; 2]> = trend
            .iter()
            .map(|t| [t.year as f64, t.accidents])
            .collect();
        let fatalities: Vec<[f64; 2]> = trend
            .iter()
            .map(|t| [t.year as f64, t.fatalities])
            .collect();

        Plot::new("yearly_trend")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Year")
            .y_axis_label("Count")
            .x_axis_formatter(|mark, _range| Self::integer_label(mark.value))
            .show(ui, |plot_ui| {
                for (name, rgb, series) in [
                    ("Number of Road Accidents", palette::ACCIDENTS, &accidents),
                    ("Fatality", palette::FATALITIES, &fatalities),
                ] {
                    plot_ui.line(
                        Line::new(PlotPoints::from(series.clone()))
                            .color(color(rgb))
                            .width(2.0)
                            .name(name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(series.clone()))
                            .color(color(rgb))
                            .radius(4.0)
                            .name(name),
                    );
                }
            });
    }

    /// Ranking of states by accidents.
    pub fn draw_top_states_chart(ui: &mut egui::Ui, ranking: &[StateTotal]) {
        let labels: Vec<String> = ranking.iter().map(|s| s.state.clone()).collect();
        let bars: Vec<Bar> = ranking
            .iter()
            .enumerate()
            .map(|(i, s)| Bar::new(i as f64, s.accidents).width(0.6).name(&s.state))
            .collect();

        Plot::new("top_states")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .include_y(0.0)
            .x_axis_label("State/UT")
            .y_axis_label("Number of Road Accidents")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(color(palette::RANKING))
                        .name("Number of Road Accidents"),
                );
            });
    }

    /// Vehicles against accidents, coloured by risk and sized by fatalities.
    pub fn draw_scatter_chart(ui: &mut egui::Ui, points: &[ScatterPoint]) {
        let max_fatalities = points
            .iter()
            .map(|p| p.fatalities)
            .filter(|f| f.is_finite())
            .fold(0.0_f64, f64::max);

        Plot::new("vehicles_vs_accidents")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Number of Registered Vehicles")
            .y_axis_label("Number of Road Accidents")
            .show(ui, |plot_ui| {
                for category in RiskCategory::ALL {
                    for p in points.iter().filter(|p| p.risk == category) {
                        if !(p.vehicles.is_finite() && p.accidents.is_finite()) {
                            continue;
                        }
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![[p.vehicles, p.accidents]]))
                                .radius(Self::bubble_radius(p.fatalities, max_fatalities))
                                .color(color(palette::risk(category)).gamma_multiply(0.75))
                                .name(category.label()),
                        );
                    }
                }
            });
    }

    /// Accident rate per state and year as a colour-mapped grid.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &RateMatrix) {
        if matrix.is_empty() {
            ui.label(RichText::new("No rates to show").color(Color32::GRAY));
            return;
        }
        let range = matrix.value_range().unwrap_or((0.0, 0.0));

        egui::ScrollArea::horizontal()
            .id_salt("heatmap_scroll")
            .show(ui, |ui| {
                egui::Grid::new("rate_heatmap")
                    .spacing([2.0, 2.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("State/UT").strong());
                        for year in &matrix.years {
                            ui.label(RichText::new(year.to_string()).strong());
                        }
                        ui.end_row();

                        for (s, state) in matrix.states.iter().enumerate() {
                            ui.label(state);
                            for (year, value) in matrix.years.iter().zip(matrix.row(s)) {
                                Self::heat_cell(ui, state, *year, *value, range);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn heat_cell(
        ui: &mut egui::Ui,
        state: &str,
        year: i32,
        value: Option<f64>,
        range: (f64, f64),
    ) {
        let (rect, response) = ui.allocate_exact_size(HEAT_CELL, egui::Sense::hover());
        let Some(value) = value else {
            // No row for this pair: leave the cell blank
            ui.painter().rect_stroke(
                rect,
                2.0,
                egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
            );
            return;
        };

        let t = palette::normalize(value, range);
        ui.painter().rect_filled(rect, 2.0, color(palette::heat(t)));
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            format!("{:.2}", value),
            egui::FontId::proportional(11.0),
            color(palette::heat_text(t)),
        );
        response.on_hover_text(format!(
            "{state} {year}: {value:.2} accidents per 1,000 vehicles"
        ));
    }

    /// Marker radius between 3 and 15 pixels, by area.
    fn bubble_radius(fatalities: f64, max_fatalities: f64) -> f32 {
        if !fatalities.is_finite() || max_fatalities <= 0.0 {
            return 3.0;
        }
        let share = (fatalities / max_fatalities).clamp(0.0, 1.0).sqrt();
        3.0 + 12.0 * share as f32
    }

    fn integer_label(value: f64) -> String {
        if (value - value.round()).abs() < 1e-6 {
            format!("{}", value.round() as i64)
        } else {
            String::new()
        }
    }
}
