use std::path::Path;

use anyhow::{Context, Result, anyhow};

use super::model::{ForecastDataset, REQUIRED_COLUMNS};

/// Suggested file name for the download.
pub const EXPORT_FILE_NAME: &str = "filtered_forecast.csv";
/// Media type of the encoded bytes.
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encode a dataset as UTF-8 CSV: the four required columns, then any extras.
pub fn encode_csv(dataset: &ForecastDataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(
            REQUIRED_COLUMNS
                .iter()
                .copied()
                .chain(dataset.extra_columns.iter().map(String::as_str)),
        )
        .context("writing CSV header")?;

    for (i, row) in dataset.rows.iter().enumerate() {
        let mut record = vec![
            row.date.format(DATE_FORMAT).to_string(),
            row.predicted.to_string(),
            row.lower_bound.to_string(),
            row.upper_bound.to_string(),
        ];
        record.extend(row.extra.iter().cloned());
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {}", i + 1))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write already-encoded export bytes to `path`.
pub fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
