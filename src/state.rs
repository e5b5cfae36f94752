use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::data::export::{encode_csv, write_export};
use crate::data::filter::{DateRange, filter_by_date_range};
use crate::data::loader::{LoadOutcome, read_upload, resolve_active_dataset};
use crate::data::model::ForecastDataset;
use crate::data::summary::{EmptyDatasetError, ForecastSummary, compute_summary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Parsed once at startup and shared, never mutated.
    default_dataset: Arc<ForecastDataset>,

    /// Dataset currently driving the display (default or accepted upload).
    pub dataset: Arc<ForecastDataset>,

    /// Result of the last upload attempt.
    pub outcome: LoadOutcome,

    /// File name of the accepted or rejected upload, if any.
    pub upload_name: Option<String>,

    /// Date span of the active dataset; `None` when it has no rows.
    pub bounds: Option<DateRange>,

    /// Selected inclusive date range, always inside `bounds`.
    pub range: Option<DateRange>,

    /// Rows of the active dataset inside `range` (cached).
    pub filtered: ForecastDataset,

    /// Metrics over the whole active dataset.
    pub summary: Result<ForecastSummary, EmptyDatasetError>,

    /// Metrics over the filtered rows.
    pub filtered_summary: Result<ForecastSummary, EmptyDatasetError>,

    /// Whether the chart shades the confidence interval.
    pub show_confidence: bool,

    /// IO error shown in the UI (file read / export failures).
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(default_dataset: Arc<ForecastDataset>) -> Self {
        let mut state = Self {
            dataset: Arc::clone(&default_dataset),
            default_dataset,
            outcome: LoadOutcome::NoUpload,
            upload_name: None,
            bounds: None,
            range: None,
            filtered: ForecastDataset::default(),
            summary: Err(EmptyDatasetError),
            filtered_summary: Err(EmptyDatasetError),
            show_confidence: true,
            status_message: None,
        };
        state.reset_range();
        state
    }

    /// Resolve an optional upload against the default and make it active.
    pub fn apply_upload(&mut self, bytes: Option<&[u8]>, name: Option<String>) {
        let (dataset, outcome) = resolve_active_dataset(bytes, &self.default_dataset);
        self.dataset = dataset;
        self.outcome = outcome;
        self.upload_name = name;
        self.status_message = None;
        self.reset_range();
    }

    /// Read a picked file and apply it as an upload.
    pub fn upload_file(&mut self, path: &Path) {
        match read_upload(path) {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned());
                self.apply_upload(Some(&bytes), name);
            }
            Err(e) => {
                log::error!("Failed to read upload: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop any upload and go back to the default dataset.
    pub fn reset_to_default(&mut self) {
        self.apply_upload(None, None);
    }

    /// Select a new date range; it is clamped to the dataset bounds.
    pub fn set_range(&mut self, range: DateRange) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let clamped = range.clamp_to(bounds);
        if self.range != Some(clamped) {
            log::debug!("Date range set to {} ..= {}", clamped.start, clamped.end);
            self.range = Some(clamped);
            self.refilter();
        }
    }

    /// Recompute bounds, select the full range and refresh derived values.
    fn reset_range(&mut self) {
        self.bounds = DateRange::full(&self.dataset).ok();
        self.range = self.bounds;
        self.summary = compute_summary(&self.dataset);
        self.refilter();
    }

    /// Recompute the filtered rows after a range change.
    pub fn refilter(&mut self) {
        self.filtered = match self.range {
            Some(range) => filter_by_date_range(&self.dataset, range.start, range.end),
            None => self.dataset.empty_like(),
        };
        self.filtered_summary = compute_summary(&self.filtered);
    }

    /// CSV bytes of the filtered rows.
    pub fn export_bytes(&self) -> Result<Vec<u8>> {
        encode_csv(&self.filtered)
    }

    /// Encode the filtered rows and write them to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let result = self.export_bytes().and_then(|bytes| write_export(path, &bytes));
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Advisory notice when some rows have `yhat` outside their bounds.
    pub fn interval_warning(&self) -> Option<String> {
        match self.dataset.inconsistent_interval_count() {
            0 => None,
            n => Some(format!(
                "{n} row(s) have a predicted value outside their confidence interval"
            )),
        }
    }
}
