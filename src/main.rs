mod app;
mod color;
mod config;
mod data;
mod error;
mod format;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::SalaryDashboardApp;
use config::DashboardConfig;
use data::loader::DatasetSource;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

fn run() -> Result<()> {
    let config = DashboardConfig::load().context("loading configuration")?;

    // Fatal on failure: the dashboard never opens with a partial dataset.
    let source = DatasetSource::new(&config.data.path);
    let dataset = source
        .load()
        .with_context(|| format!("loading dataset {}", source.path().display()))?;

    let state = AppState::new(
        dataset,
        source.path().to_path_buf(),
        config.aggregate_params(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Data Salary Dashboard")
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalaryDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
