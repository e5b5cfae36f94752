use chrono::{Datelike, NaiveDate};
use eframe::egui::{Stroke, Ui, vec2};
use egui_plot::{Legend, Line, Plot, PlotPoints, Polygon};

use crate::color::ChartColors;
use crate::data::model::{ForecastDataset, ForecastRow};
use crate::format::format_price;
use crate::state::AppState;

const PREDICTED_NAME: &str = "Predicted Price";
const INTERVAL_NAME: &str = "Confidence Interval";

/// Plot x coordinate of a date: days since 0001-01-01.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

fn format_x(x: f64) -> String {
    x_to_date(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// One convex quad per consecutive pair of rows.
///
/// egui only fills convex shapes correctly, and the band as a whole rarely is.
fn band_segments(dataset: &ForecastDataset) -> Vec<Vec<[f64; 2]>> {
    dataset
        .rows
        .windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let (xa, xb) = (date_to_x(a.date), date_to_x(b.date));
            vec![
                [xa, a.lower_bound],
                [xb, b.lower_bound],
                [xb, b.upper_bound],
                [xa, a.upper_bound],
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Forecast plot (central panel)
// ---------------------------------------------------------------------------

/// Render the forecast chart for the filtered rows.
pub fn forecast_plot(ui: &mut Ui, state: &AppState, height: f32) {
    let dataset = &state.filtered;
    if dataset.is_empty() {
        ui.allocate_ui(vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No forecast rows in the selected date range");
            });
        });
        return;
    }

    let colors = ChartColors::default();

    Plot::new("forecast_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Price (USD)")
        .x_axis_formatter(|mark, _range| format_x(mark.value))
        .label_formatter(|name, point| {
            let date = format_x(point.x);
            if name.is_empty() {
                format!("{date}\n{}", format_price(point.y))
            } else {
                format!("{name}\n{date}\n{}", format_price(point.y))
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.show_confidence {
                for quad in band_segments(dataset) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad))
                            .name(INTERVAL_NAME)
                            .fill_color(colors.band_fill)
                            .stroke(Stroke::NONE),
                    );
                }
                let edge = |bound: fn(&ForecastRow) -> f64| {
                    let points: PlotPoints = dataset
                        .rows
                        .iter()
                        .map(|r| [date_to_x(r.date), bound(r)])
                        .collect();
                    Line::new(points)
                        .name(INTERVAL_NAME)
                        .color(colors.band_edge)
                        .width(0.5)
                };
                plot_ui.line(edge(|r| r.lower_bound));
                plot_ui.line(edge(|r| r.upper_bound));
            }

            let points: PlotPoints = dataset
                .rows
                .iter()
                .map(|r| [date_to_x(r.date), r.predicted])
                .collect();
            plot_ui.line(
                Line::new(points)
                    .name(PREDICTED_NAME)
                    .color(colors.line)
                    .width(1.5),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, three_days};

    #[test]
    fn x_axis_round_trips_dates() {
        let d = date(2026, 7, 4);
        assert_eq!(x_to_date(date_to_x(d)), Some(d));
        assert_eq!(format_x(date_to_x(d) + 0.3), "2026-07-04");
        assert_eq!(date_to_x(date(2026, 1, 2)) - date_to_x(date(2026, 1, 1)), 1.0);
    }

    #[test]
    fn band_has_one_quad_per_gap() {
        let quads = band_segments(&three_days());
        assert_eq!(quads.len(), 2);
        let x0 = date_to_x(date(2026, 1, 1));
        let x1 = date_to_x(date(2026, 1, 2));
        assert_eq!(
            quads[0],
            vec![[x0, 90.0], [x1, 180.0], [x1, 220.0], [x0, 110.0]]
        );
    }

    #[test]
    fn single_row_has_no_band() {
        let mut ds = three_days();
        ds.rows.truncate(1);
        assert!(band_segments(&ds).is_empty());
    }
}
