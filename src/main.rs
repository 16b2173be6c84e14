mod app;
mod chart;
mod color;
mod config;
mod controller;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::anyhow;
use app::LaunchDashApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // No window without data: a missing or malformed file stops here.
    let dataset = match data::loader::load_file(&config.data_path) {
        Ok(ds) => ds,
        Err(e) => {
            log::error!("Failed to load launch records: {e:#}");
            return Err(e);
        }
    };
    log::info!(
        "Loaded {} launches from {} sites, payload {}..={} kg",
        dataset.len(),
        dataset.sites().len(),
        dataset.min_payload(),
        dataset.max_payload()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    let title = config.window_title.clone();
    let dataset = Arc::new(dataset);
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(LaunchDashApp::new(dataset, config)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
