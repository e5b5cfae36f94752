mod app;
mod color;
mod data;
mod format;
mod state;
mod ui;

use anyhow::{Result, anyhow};
use app::ForecastViewerApp;
use data::loader::{DEFAULT_DATASET_CSV, load_default_dataset};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let default_dataset = load_default_dataset(DEFAULT_DATASET_CSV).inspect_err(|e| {
        log::error!("Cannot start without the default forecast: {e:#}");
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Forecast Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(ForecastViewerApp::new(default_dataset)))),
    )
    .map_err(|e| anyhow!("running viewer: {e}"))
}
