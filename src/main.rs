//! Indian Road Accident Dashboard
//!
//! Loads State/UT-wise road accident statistics from CSV, derives risk
//! metrics and shows them as an interactive dashboard.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Result;
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,road_accident_dashboard=debug"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    let config = DashboardConfig::from_env()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Indian Road Accident Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Indian Road Accident Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    info!("shutdown");
    Ok(())
}
