use chrono::Days;
use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::color::{outcome_color, warning_color};
use crate::data::export::{EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE};
use crate::data::filter::DateRange;
use crate::format::format_price;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – summary and controls
// ---------------------------------------------------------------------------

/// Render the left panel: metrics, date range, confidence toggle, download.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Forecast Summary");
            ui.separator();
            summary_metrics(ui, state);

            ui.add_space(8.0);
            ui.heading("Date Range");
            ui.separator();
            date_range_controls(ui, state);

            ui.add_space(8.0);
            ui.heading("Display");
            ui.separator();
            ui.checkbox(&mut state.show_confidence, "Show Confidence Interval");

            ui.add_space(8.0);
            ui.heading("Download");
            ui.separator();
            ui.label(format!("{} rows in range", state.filtered.len()));
            if ui.button("Download as CSV").clicked() {
                save_file_dialog(state);
            }
        });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).small());
    ui.label(RichText::new(value).size(20.0).strong());
    ui.add_space(4.0);
}

fn summary_metrics(ui: &mut Ui, state: &AppState) {
    match &state.summary {
        Ok(s) => {
            metric(ui, "Max Predicted Price", &format_price(s.max_predicted));
            metric(ui, "Min Predicted Price", &format_price(s.min_predicted));
            metric(ui, "Avg Predicted Price", &format_price(s.avg_predicted));
        }
        Err(e) => {
            ui.label(format!("No summary: {e}"));
        }
    }

    if let Ok(s) = &state.filtered_summary {
        ui.label(
            RichText::new(format!(
                "In range: {} rows, avg {}",
                s.row_count,
                format_price(s.avg_predicted)
            ))
            .weak(),
        );
    }
}

/// Start/end pickers plus day sliders, both bounded by the dataset dates.
fn date_range_controls(ui: &mut Ui, state: &mut AppState) {
    let (Some(bounds), Some(current)) = (state.bounds, state.range) else {
        ui.label("Dataset has no dates.");
        return;
    };

    let mut start = current.start;
    let mut end = current.end;

    egui::Grid::new("date_pickers")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut start).id_salt("range_start"));
            ui.end_row();
            ui.label("To");
            ui.add(DatePickerButton::new(&mut end).id_salt("range_end"));
            ui.end_row();
        });

    let span = bounds.days() - 1;
    let mut start_offset = (start - bounds.start).num_days();
    let mut end_offset = (end - bounds.start).num_days();
    let start_slider = ui.add(
        Slider::new(&mut start_offset, 0..=span)
            .show_value(false)
            .text("start"),
    );
    let end_slider = ui.add(
        Slider::new(&mut end_offset, 0..=span)
            .show_value(false)
            .text("end"),
    );
    let offset_date = |offset: i64| {
        u64::try_from(offset)
            .ok()
            .and_then(|days| bounds.start.checked_add_days(Days::new(days)))
            .unwrap_or(bounds.start)
    };
    if start_slider.changed() {
        start = offset_date(start_offset);
    }
    if end_slider.changed() {
        end = offset_date(end_offset);
    }

    if ui.small_button("Full range").clicked() {
        start = bounds.start;
        end = bounds.end;
    }

    state.set_range(DateRange::new(start, end));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use default dataset").clicked() {
                state.reset_to_default();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Download as CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state.upload_name.as_deref().unwrap_or("default dataset");
        ui.label(format!(
            "{} rows loaded from {source}, {} in range",
            state.dataset.len(),
            state.filtered.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// One-line banner describing the last upload attempt.
pub fn status_banner(ui: &mut Ui, state: &AppState) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(RichText::new(state.outcome.message()).color(outcome_color(&state.outcome)));
        if let Some(warning) = state.interval_warning() {
            ui.separator();
            ui.label(RichText::new(warning).color(warning_color()));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload forecast CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Uploading {}", path.display());
        state.upload_file(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download forecast")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter(format!("CSV ({EXPORT_MEDIA_TYPE})"), &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
