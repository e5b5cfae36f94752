use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use thiserror::Error;

use super::model::{
    DATE_COLUMN, ForecastDataset, ForecastRow, LOWER_COLUMN, PREDICTED_COLUMN, REQUIRED_COLUMNS,
    UPPER_COLUMN,
};

/// Forecast shipped with the binary and shown until a valid upload replaces it.
pub const DEFAULT_DATASET_CSV: &[u8] = include_bytes!("../../assets/default_forecast.csv");

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Why a byte stream could not be turned into a [`ForecastDataset`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// Not valid tabular data, or a cell failed to parse.
    #[error("{0}")]
    Parse(String),
    /// The header lacks one or more required columns.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// Which dataset became active after an upload attempt, and why.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    NoUpload,
    Accepted,
    ParseFailed(String),
    MissingColumns(Vec<String>),
}

impl LoadOutcome {
    /// Whether the upload was rejected and the default dataset is shown instead.
    pub fn is_error(&self) -> bool {
        matches!(self, LoadOutcome::ParseFailed(_) | LoadOutcome::MissingColumns(_))
    }

    /// Text for the status banner.
    pub fn message(&self) -> String {
        match self {
            LoadOutcome::NoUpload => "No file uploaded. Showing default dataset.".to_string(),
            LoadOutcome::Accepted => "Uploaded file loaded successfully!".to_string(),
            LoadOutcome::ParseFailed(reason) => format!(
                "Error loading uploaded file: {reason}. Showing default dataset instead."
            ),
            LoadOutcome::MissingColumns(missing) => format!(
                "Uploaded file must contain these columns: {}. Missing: {}. \
                 Showing default dataset instead.",
                REQUIRED_COLUMNS.join(", "),
                missing.join(", ")
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Pick the active dataset for an optional upload.
///
/// Any rejected upload falls back to `default`; the outcome says why.
pub fn resolve_active_dataset(
    uploaded: Option<&[u8]>,
    default: &Arc<ForecastDataset>,
) -> (Arc<ForecastDataset>, LoadOutcome) {
    let Some(bytes) = uploaded else {
        return (Arc::clone(default), LoadOutcome::NoUpload);
    };

    match parse_forecast_csv(bytes) {
        Ok(dataset) => {
            log::info!(
                "Accepted uploaded forecast: {} rows, extra columns {:?}",
                dataset.len(),
                dataset.extra_columns
            );
            (Arc::new(dataset), LoadOutcome::Accepted)
        }
        Err(LoadError::MissingColumns(missing)) => {
            log::warn!("Upload rejected, missing columns {missing:?}; using default dataset");
            (Arc::clone(default), LoadOutcome::MissingColumns(missing))
        }
        Err(LoadError::Parse(reason)) => {
            log::warn!("Upload rejected: {reason}; using default dataset");
            (Arc::clone(default), LoadOutcome::ParseFailed(reason))
        }
    }
}

/// Parse the bundled default forecast. Called once at startup.
pub fn load_default_dataset(bytes: &[u8]) -> Result<Arc<ForecastDataset>> {
    let dataset = parse_forecast_csv(bytes).context("parsing bundled default forecast")?;
    log::info!("Loaded default forecast with {} rows", dataset.len());
    Ok(Arc::new(dataset))
}

/// Read a user-picked file into memory.
pub fn read_upload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Parse a forecast CSV with a header row.
///
/// The whole input is read as text records first, so structural problems
/// (bad UTF-8, ragged rows) surface before the column check. Any cell that
/// fails to parse rejects the whole table.
pub fn parse_forecast_csv(bytes: &[u8]) -> Result<ForecastDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(format!("reading header: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Parse("no columns to parse from file".to_string()));
    }

    let records: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| LoadError::Parse(e.to_string()))?;

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let index_of = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let ds_idx = index_of(DATE_COLUMN);
    let yhat_idx = index_of(PREDICTED_COLUMN);
    let lower_idx = index_of(LOWER_COLUMN);
    let upper_idx = index_of(UPPER_COLUMN);
    let required = [ds_idx, yhat_idx, lower_idx, upper_idx];

    let extra_idx: Vec<usize> = (0..headers.len())
        .filter(|i| !required.contains(i))
        .collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let row_no = i + 1;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let raw_date = field(ds_idx);
        let date = parse_date(raw_date).ok_or_else(|| {
            LoadError::Parse(format!("row {row_no}, '{DATE_COLUMN}': '{raw_date}' is not a date"))
        })?;

        let mut row = ForecastRow::new(
            date,
            parse_number(field(yhat_idx), row_no, PREDICTED_COLUMN)?,
            parse_number(field(lower_idx), row_no, LOWER_COLUMN)?,
            parse_number(field(upper_idx), row_no, UPPER_COLUMN)?,
        );
        row.extra = extra_idx.iter().map(|&idx| field(idx).to_string()).collect();
        rows.push(row);
    }

    Ok(ForecastDataset {
        rows,
        extra_columns: extra_idx.iter().map(|&idx| headers[idx].clone()).collect(),
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

/// Parse a date cell at day resolution; any time-of-day is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn parse_number(raw: &str, row: usize, col: &str) -> Result<f64, LoadError> {
    let s = raw.trim();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::Parse(format!(
            "row {row}, '{col}': '{s}' is not a finite number"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, three_days};

    fn default_ds() -> Arc<ForecastDataset> {
        Arc::new(three_days())
    }

    const VALID: &str = "ds,yhat,yhat_lower,yhat_upper\n\
                         2026-03-01,10.5,9,12\n\
                         2026-03-02,11,10,13.25\n";

    #[test]
    fn no_upload_returns_default() {
        let default = default_ds();
        let (active, outcome) = resolve_active_dataset(None, &default);
        assert!(Arc::ptr_eq(&active, &default));
        assert_eq!(outcome, LoadOutcome::NoUpload);
        assert!(!outcome.is_error());
    }

    #[test]
    fn valid_upload_is_accepted() {
        let default = default_ds();
        let (active, outcome) = resolve_active_dataset(Some(VALID.as_bytes()), &default);
        assert_eq!(outcome, LoadOutcome::Accepted);
        assert_eq!(active.len(), 2);
        assert_eq!(active.rows[0].date, date(2026, 3, 1));
        assert_eq!(active.rows[1].upper_bound, 13.25);
        assert!(active.extra_columns.is_empty());
    }

    #[test]
    fn each_missing_column_is_reported_exactly() {
        let default = default_ds();
        for skip in 0..REQUIRED_COLUMNS.len() {
            let cols: Vec<&str> = REQUIRED_COLUMNS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, c)| *c)
                .collect();
            let csv = format!("{}\n2026-01-01,1,2,3\n", cols.join(","));

            let (active, outcome) = resolve_active_dataset(Some(csv.as_bytes()), &default);
            assert!(Arc::ptr_eq(&active, &default));
            assert_eq!(
                outcome,
                LoadOutcome::MissingColumns(vec![REQUIRED_COLUMNS[skip].to_string()])
            );
        }
    }

    #[test]
    fn several_missing_columns_in_canonical_order() {
        let csv = "yhat_upper,date,value\n1,2026-01-01,3\n";
        let err = parse_forecast_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingColumns(vec![
                "ds".to_string(),
                "yhat".to_string(),
                "yhat_lower".to_string()
            ])
        );
    }

    #[test]
    fn malformed_inputs_fall_back_to_default() {
        let default = default_ds();
        let cases: Vec<Vec<u8>> = vec![
            Vec::new(),
            // truncated row
            b"ds,yhat,yhat_lower,yhat_upper\n2026-01-01,1,0\n".to_vec(),
            // not UTF-8
            b"ds,yhat,yhat_lower,yhat_upper\n2026-01-01,\xff\xfe,0,2\n".to_vec(),
            // unparseable number
            b"ds,yhat,yhat_lower,yhat_upper\n2026-01-01,abc,0,2\n".to_vec(),
            // unparseable date on a later row
            b"ds,yhat,yhat_lower,yhat_upper\n2026-01-01,1,0,2\nnot-a-date,1,0,2\n".to_vec(),
            // empty numeric cell
            b"ds,yhat,yhat_lower,yhat_upper\n2026-01-01,,0,2\n".to_vec(),
        ];

        for bytes in cases {
            let (active, outcome) = resolve_active_dataset(Some(&bytes), &default);
            assert!(Arc::ptr_eq(&active, &default), "input {bytes:?}");
            assert!(
                matches!(outcome, LoadOutcome::ParseFailed(_)),
                "input {bytes:?} gave {outcome:?}"
            );
        }
    }

    #[test]
    fn parse_failure_names_row_and_column() {
        let csv = "ds,yhat,yhat_lower,yhat_upper\n2026-01-01,1,0,2\n2026-01-02,1,x,2\n";
        let reason = match parse_forecast_csv(csv.as_bytes()) {
            Err(LoadError::Parse(reason)) => reason,
            other => panic!("expected parse error, got {other:?}"),
        };
        assert!(reason.contains("row 2"), "{reason}");
        assert!(reason.contains("yhat_lower"), "{reason}");
    }

    #[test]
    fn extra_columns_are_kept_in_source_order() {
        let csv = "trend,ds,yhat,note,yhat_lower,yhat_upper\n\
                   1.5,2026-01-01,10,a,9,11\n";
        let ds = parse_forecast_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.extra_columns, vec!["trend".to_string(), "note".to_string()]);
        assert_eq!(ds.rows[0].extra, vec!["1.5".to_string(), "a".to_string()]);
        assert_eq!(ds.rows[0].predicted, 10.0);
    }

    #[test]
    fn header_only_is_an_empty_dataset() {
        let ds = parse_forecast_csv(b"ds,yhat,yhat_lower,yhat_upper\n").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn headers_are_trimmed_and_bom_stripped() {
        let csv = "\u{feff}ds , yhat,yhat_lower,yhat_upper\n2026-01-01,1,0,2\n";
        let ds = parse_forecast_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn interval_violations_are_not_rejected() {
        let csv = "ds,yhat,yhat_lower,yhat_upper\n2026-01-01,50,60,70\n";
        let ds = parse_forecast_csv(csv.as_bytes()).unwrap();
        assert_eq!(ds.inconsistent_interval_count(), 1);
    }

    #[test]
    fn date_formats_drop_time_of_day() {
        let expected = date(2026, 5, 17);
        for raw in [
            "2026-05-17",
            "2026/05/17",
            " 2026-05-17 ",
            "2026-05-17 23:59:59",
            "2026-05-17T08:30:00.250",
            "2026-05-17 06:00",
            "2026-05-17T10:00:00+02:00",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(parse_date("17.05.2026"), None);
        assert_eq!(parse_date("2026-02-30"), None);
    }

    #[test]
    fn outcome_messages_name_the_problem() {
        let msg = LoadOutcome::MissingColumns(vec!["yhat_upper".into()]).message();
        assert!(msg.contains("Missing: yhat_upper"));
        assert!(LoadOutcome::ParseFailed("boom".into()).message().contains("boom"));
        assert!(LoadOutcome::ParseFailed("boom".into()).is_error());
        assert!(!LoadOutcome::Accepted.is_error());
    }

    #[test]
    fn bundled_default_parses() {
        let ds = load_default_dataset(DEFAULT_DATASET_CSV).unwrap();
        assert!(!ds.is_empty());
    }

    #[test]
    fn read_upload_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        std::fs::write(&path, VALID).unwrap();
        assert_eq!(read_upload(&path).unwrap(), VALID.as_bytes());
        assert!(read_upload(&dir.path().join("missing.csv")).is_err());
    }
}
