use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::loader::LoadOutcome;

/// Hue of the predicted-value line (blue).
const PREDICTED_HUE: f32 = 215.0;
/// Opacity of the confidence band fill.
const BAND_ALPHA: u8 = 77;

fn hsl_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    [
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    ]
}

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Colours for the forecast plot, all derived from one hue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartColors {
    pub line: Color32,
    /// Translucent, desaturated fill between the bounds.
    pub band_fill: Color32,
    pub band_edge: Color32,
}

impl ChartColors {
    pub fn from_hue(hue: f32) -> Self {
        let [r, g, b] = hsl_rgb(hue, 0.75, 0.50);
        let line = Color32::from_rgb(r, g, b);

        let [r, g, b] = hsl_rgb(hue, 0.10, 0.55);
        let band_fill = Color32::from_rgba_unmultiplied(r, g, b, BAND_ALPHA);
        let band_edge = Color32::from_rgb(r, g, b);

        Self {
            line,
            band_fill,
            band_edge,
        }
    }
}

impl Default for ChartColors {
    fn default() -> Self {
        Self::from_hue(PREDICTED_HUE)
    }
}

// ---------------------------------------------------------------------------
// Status banner colours
// ---------------------------------------------------------------------------

/// Banner colour for a load outcome: info blue, success green, error red.
pub fn outcome_color(outcome: &LoadOutcome) -> Color32 {
    let hue = match outcome {
        _ if outcome.is_error() => 0.0,
        LoadOutcome::Accepted => 130.0,
        _ => 205.0,
    };
    let [r, g, b] = hsl_rgb(hue, 0.70, 0.45);
    Color32::from_rgb(r, g, b)
}

/// Amber used for advisory warnings.
pub fn warning_color() -> Color32 {
    let [r, g, b] = hsl_rgb(38.0, 0.90, 0.50);
    Color32::from_rgb(r, g, b)
}
