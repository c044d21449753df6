//! Dashboard Viewer Widget
//! Central scrollable panel with KPIs, charts, heatmap and insights.

use crate::charts::ChartPlotter;
use crate::data::{DashboardSummary, DashboardView};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 18.0;

const CONCLUSION: &str = "Accident counts alone do not represent road safety. \
Normalized indicators such as the accident rate and fatalities per accident \
give a better basis for policy-making and road safety planning.";

pub struct DashboardViewer;

impl DashboardViewer {
    /// Draw the fatal error if any, otherwise the current view.
    pub fn show(ui: &mut egui::Ui, view: Option<&DashboardView>, error: Option<&str>) {
        ui.heading(RichText::new("🚦 Indian Road Accident Dashboard").size(26.0).strong());
        ui.label(
            RichText::new("State/UT-wise road accidents, fatalities and vehicle registrations")
                .color(Color32::GRAY),
        );
        ui.add_space(10.0);

        if let Some(error) = error {
            ui.label(
                RichText::new(format!("❌ {}", error))
                    .size(16.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            return;
        }

        match view {
            Some(DashboardView::Ready(summary)) => Self::show_summary(ui, summary),
            Some(DashboardView::NoData) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("No data available for the selected filters.").size(18.0),
                    );
                });
            }
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
        }
    }

    fn show_summary(ui: &mut egui::Ui, summary: &DashboardSummary) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{} rows selected", summary.table.height()))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(5.0);
                ChartPlotter::draw_kpis(ui, &summary.kpis);
                ui.add_space(SECTION_SPACING);

                ui.columns(2, |columns| {
                    columns[0].label(RichText::new("📈 Year-wise Trend").size(16.0).strong());
                    ChartPlotter::draw_trend_chart(&mut columns[0], &summary.trend);

                    columns[1].label(
                        RichText::new(format!("🏆 Top {} States/UTs", summary.top_states.len()))
                            .size(16.0)
                            .strong(),
                    );
                    ChartPlotter::draw_top_states_chart(&mut columns[1], &summary.top_states);
                });
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "🚗 Vehicles vs Accidents");
                ChartPlotter::draw_scatter_chart(ui, &summary.scatter);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "🔥 Accident Rate per 1,000 Vehicles");
                ChartPlotter::draw_heatmap(ui, &summary.rate_matrix);
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "💡 Key Insights");
                for line in summary.insights.bullet_points() {
                    ui.label(format!("• {}", line));
                }
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "✅ Conclusion");
                ui.label(CONCLUSION);
                ui.add_space(SECTION_SPACING);
            });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.separator();
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(6.0);
    }
}
