use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{ForecastDataset, REQUIRED_COLUMNS};
use crate::format::format_value;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Forecast table (below the plot)
// ---------------------------------------------------------------------------

/// Render the filtered rows as a scrollable grid, extra columns included.
pub fn forecast_table(ui: &mut Ui, dataset: &ForecastDataset) {
    if dataset.is_empty() {
        ui.label("No rows in range.");
        return;
    }

    let headers: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(dataset.extra_columns.iter().map(String::as_str))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(80.0), headers.len() - 1)
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in &headers {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                let r = &dataset.rows[row.index()];
                row.col(|ui| {
                    ui.label(r.date.format("%Y-%m-%d").to_string());
                });
                for value in [r.predicted, r.lower_bound, r.upper_bound] {
                    row.col(|ui| {
                        ui.label(format_value(value));
                    });
                }
                for cell in &r.extra {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
