//! Control Panel Widget
//! Left side panel with the data source and the three dashboard filters.

use crate::data::{FilterOptions, FilterSpec};
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// How the status line is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Left side control panel: file selection, filters and export.
pub struct ControlPanel {
    pub data_path: PathBuf,
    /// Choices derived from the loaded table, `None` until a load succeeds.
    pub options: Option<FilterOptions>,
    pub spec: Option<FilterSpec>,
    pub status: String,
    pub status_kind: StatusKind,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            options: None,
            spec: None,
            status: "Ready".to_string(),
            status_kind: StatusKind::Info,
            export_enabled: false,
        }
    }

    /// Install the choices of a freshly loaded table.
    ///
    /// The current selection survives a reload of the same data; new
    /// choices reset it to everything.
    pub fn set_options(&mut self, options: FilterOptions) {
        if self.options.as_ref() == Some(&options) && self.spec.is_some() {
            return;
        }
        self.spec = Some(FilterSpec::select_all(&options));
        self.options = Some(options);
    }

    pub fn clear_options(&mut self) {
        self.options = None;
        self.spec = None;
        self.export_enabled = false;
    }

    pub fn set_status(&mut self, kind: StatusKind, status: impl Into<String>) {
        self.status_kind = kind;
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚦 Road Accidents")
                    .size(22.0)
                    .color(Color32::from_rgb(231, 76, 60)),
            );
            ui.label(
                RichText::new("India, State/UT-wise")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .data_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "No file selected".to_string());
                ui.label(RichText::new(file_name).size(12.0))
                    .on_hover_text(self.data_path.display().to_string());

                ui.horizontal(|ui| {
                    if ui.button("📂 Open CSV").clicked() {
                        action = ControlPanelAction::OpenCsv;
                    }
                    if ui.button("🔄 Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        if let (Some(options), Some(spec)) = (self.options.as_ref(), self.spec.as_mut()) {
            if Self::show_filters(ui, options, spec) {
                action = ControlPanelAction::FiltersChanged;
            }

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);
        }

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = match self.status_kind {
            StatusKind::Error => Color32::from_rgb(220, 53, 69),
            StatusKind::Success => Color32::from_rgb(40, 167, 69),
            StatusKind::Info => Color32::GRAY,
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Year range, state checklist and risk categories. Returns true on any change.
    fn show_filters(ui: &mut egui::Ui, options: &FilterOptions, spec: &mut FilterSpec) -> bool {
        let mut changed = false;

        ui.label(RichText::new("📅 Year Range").size(14.0).strong());
        ui.add_space(5.0);
        let (mut from, mut to) = (*spec.years.start(), *spec.years.end());
        let bounds = options.year_min..=options.year_max;
        changed |= ui
            .add(egui::Slider::new(&mut from, bounds.clone()).text("From"))
            .changed();
        changed |= ui
            .add(egui::Slider::new(&mut to, bounds).text("To"))
            .changed();
        if changed {
            spec.years = ordered_years(from, to, *spec.years.start());
        }

        ui.add_space(10.0);
        ui.label(RichText::new("🗺 States/UTs").size(14.0).strong());
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                spec.states = options.states.iter().cloned().collect();
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                spec.states.clear();
                changed = true;
            }
        });
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("state_checklist")
                    .max_height(220.0)
                    .show(ui, |ui| {
                        for state in &options.states {
                            let mut checked = spec.states.contains(state);
                            if ui.checkbox(&mut checked, state).changed() {
                                if checked {
                                    spec.states.insert(state.clone());
                                } else {
                                    spec.states.remove(state);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.add_space(10.0);
        ui.label(RichText::new("⚠ Risk Category").size(14.0).strong());
        ui.add_space(5.0);
        for category in &options.risk_categories {
            let mut checked = spec.risk_categories.contains(category);
            if ui.checkbox(&mut checked, category.label()).changed() {
                if checked {
                    spec.risk_categories.insert(*category);
                } else {
                    spec.risk_categories.remove(category);
                }
                changed = true;
            }
        }

        changed
    }
}

/// Keep `from <= to`; the slider that did not move follows the one that did.
fn ordered_years(from: i32, to: i32, previous_from: i32) -> std::ops::RangeInclusive<i32> {
    if from <= to {
        from..=to
    } else if from != previous_from {
        from..=from
    } else {
        to..=to
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenCsv,
    Reload,
    FiltersChanged,
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RiskCategory;

    fn options(states: &[&str]) -> FilterOptions {
        FilterOptions {
            year_min: 2019,
            year_max: 2021,
            states: states.iter().map(|s| s.to_string()).collect(),
            risk_categories: vec![RiskCategory::Medium, RiskCategory::Low],
        }
    }

    #[test]
    fn reload_of_same_data_keeps_selection() {
        let mut panel = ControlPanel::new(PathBuf::from("data.csv"));
        panel.set_options(options(&["Delhi", "Goa"]));
        panel.spec.as_mut().unwrap().states.remove("Goa");

        panel.set_options(options(&["Delhi", "Goa"]));
        assert_eq!(panel.spec.as_ref().unwrap().states.len(), 1);

        panel.set_options(options(&["Delhi", "Goa", "Kerala"]));
        assert_eq!(panel.spec.as_ref().unwrap().states.len(), 3);
        assert_eq!(panel.spec.as_ref().unwrap().years, 2019..=2021);
    }

    #[test]
    fn crossed_sliders_collapse_to_the_moved_one() {
        assert_eq!(ordered_years(2019, 2021, 2019), 2019..=2021);
        // "From" dragged past "To"
        assert_eq!(ordered_years(2022, 2021, 2019), 2022..=2022);
        // "To" dragged below "From"
        assert_eq!(ordered_years(2020, 2018, 2020), 2018..=2018);
    }
}
