use std::sync::Arc;

use eframe::egui;

use crate::data::model::ForecastDataset;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

/// Share of the central panel height given to the chart.
const PLOT_FRACTION: f32 = 0.55;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ForecastViewerApp {
    pub state: AppState,
}

impl ForecastViewerApp {
    pub fn new(default_dataset: Arc<ForecastDataset>) -> Self {
        Self {
            state: AppState::new(default_dataset),
        }
    }
}

impl eframe::App for ForecastViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Status banner ----
        egui::TopBottomPanel::top("status_banner").show(ctx, |ui| {
            panels::status_banner(ui, &self.state);
        });

        // ---- Left side panel: summary and controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot above table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Forecast Plot");
            let plot_height = ui.available_height() * PLOT_FRACTION;
            plot::forecast_plot(ui, &self.state, plot_height);

            ui.separator();
            ui.heading("Forecast Table");
            table::forecast_table(ui, &self.state.filtered);
        });
    }
}
