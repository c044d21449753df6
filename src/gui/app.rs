//! Road Accident Dashboard Main Application
//! Main window with control panel and dashboard viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{load_and_clean, DashboardView, DataLoader, FilterOptions};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardViewer, StatusKind};
use egui::SidePanel;
use polars::prelude::DataFrame;
use tracing::{error, info, warn};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    control_panel: ControlPanel,

    /// Cleaned, feature-engineered table of the current file.
    table: Option<DataFrame>,
    view: Option<DashboardView>,
    /// Fatal load or pipeline failure, shown instead of the dashboard.
    error: Option<String>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.data_path.clone()),
            config,
            loader: DataLoader::new(),
            table: None,
            view: None,
            error: None,
        };
        app.load_table();
        app
    }

    /// Run load → clean → engineer for the selected file, then refresh.
    fn load_table(&mut self) {
        let path = self.control_panel.data_path.clone();
        let result = load_and_clean(&mut self.loader, &path).and_then(|table| {
            let options = FilterOptions::from_table(&table)?;
            Ok((table, options))
        });

        match result {
            Ok((table, options)) => {
                self.control_panel.set_options(options);
                self.control_panel.set_status(
                    StatusKind::Info,
                    format!("Loaded {} rows from {}", table.height(), path.display()),
                );
                self.table = Some(table);
                self.error = None;
                self.refresh_view();
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load dashboard data");
                self.fail(e.to_string());
            }
        }
    }

    /// Filter and aggregate the current table for the current selection.
    fn refresh_view(&mut self) {
        let (Some(table), Some(spec)) = (self.table.as_ref(), self.control_panel.spec.as_ref())
        else {
            return;
        };

        match DashboardView::build(table, spec, self.config.top_n) {
            Ok(view) => {
                self.control_panel.export_enabled = view.summary().is_some();
                self.view = Some(view);
            }
            Err(e) => {
                error!(error = %e, "failed to build dashboard");
                self.fail(e.to_string());
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.table = None;
        self.view = None;
        self.control_panel.clear_options();
        self.control_panel
            .set_status(StatusKind::Error, format!("Error: {}", message));
        self.error = Some(message);
    }

    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!(path = %path.display(), "data source selected");
            self.control_panel.data_path = path;
            self.load_table();
        }
    }

    fn handle_reload(&mut self) {
        if let Some(cached) = self.loader.cached_path() {
            info!(path = %cached.display(), reads = self.loader.read_count(), "dropping cached table");
        }
        self.loader.invalidate();
        self.load_table();
    }

    /// Write the PNG snapshots and open the export folder.
    fn handle_export(&mut self) {
        let Some(summary) = self.view.as_ref().and_then(|v| v.summary()) else {
            self.control_panel
                .set_status(StatusKind::Info, "No charts to export");
            return;
        };

        let dir = self.config.export_dir.clone();
        match StaticChartRenderer::export_all(summary, &dir) {
            Ok(paths) => {
                self.control_panel.set_status(
                    StatusKind::Success,
                    format!("Exported {} charts to {}", paths.len(), dir.display()),
                );
                if let Err(e) = open::that(&dir) {
                    warn!(dir = %dir.display(), error = %e, "cannot open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel
                    .set_status(StatusKind::Error, format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::FiltersChanged => self.refresh_view(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            DashboardViewer::show(ui, self.view.as_ref(), self.error.as_deref());
        });
    }
}
