use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const DATE_COLUMN: &str = "ds";
pub const PREDICTED_COLUMN: &str = "yhat";
pub const LOWER_COLUMN: &str = "yhat_lower";
pub const UPPER_COLUMN: &str = "yhat_upper";

/// Columns every forecast table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 4] = [DATE_COLUMN, PREDICTED_COLUMN, LOWER_COLUMN, UPPER_COLUMN];

// ---------------------------------------------------------------------------
// ForecastRow – one row of the forecast table
// ---------------------------------------------------------------------------

/// A single time-stamped prediction with its confidence interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Calendar date of the prediction (day resolution).
    pub date: NaiveDate,
    /// Central estimate (`yhat`).
    pub predicted: f64,
    /// Lower confidence bound (`yhat_lower`).
    pub lower_bound: f64,
    /// Upper confidence bound (`yhat_upper`).
    pub upper_bound: f64,
    /// Raw text of any additional columns, aligned with
    /// [`ForecastDataset::extra_columns`].
    pub extra: Vec<String>,
}

impl ForecastRow {
    pub fn new(date: NaiveDate, predicted: f64, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            date,
            predicted,
            lower_bound,
            upper_bound,
            extra: Vec::new(),
        }
    }

    /// Whether `lower_bound <= predicted <= upper_bound` holds.
    ///
    /// This is advisory only: loading never rejects a row that fails it.
    pub fn interval_is_consistent(&self) -> bool {
        self.lower_bound <= self.predicted && self.predicted <= self.upper_bound
    }
}

// ---------------------------------------------------------------------------
// ForecastDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered sequence of forecast rows.
///
/// Row order is whatever the source file used; nothing here sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastDataset {
    pub rows: Vec<ForecastRow>,
    /// Names of the tolerated non-required columns, in source order.
    pub extra_columns: Vec<String>,
}

impl ForecastDataset {
    /// Dataset with only the four required columns.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<ForecastRow>) -> Self {
        Self {
            rows,
            extra_columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows where the predicted value lies outside its interval.
    pub fn inconsistent_interval_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.interval_is_consistent())
            .count()
    }

    /// An empty dataset with the same column layout.
    pub fn empty_like(&self) -> Self {
        Self {
            rows: Vec::new(),
            extra_columns: self.extra_columns.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// The three-row scenario used across the data layer tests.
    pub fn three_days() -> ForecastDataset {
        ForecastDataset::from_rows(vec![
            ForecastRow::new(date(2026, 1, 1), 100.0, 90.0, 110.0),
            ForecastRow::new(date(2026, 1, 2), 200.0, 180.0, 220.0),
            ForecastRow::new(date(2026, 1, 3), 50.0, 40.0, 60.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{date, three_days};
    use super::*;

    #[test]
    fn interval_consistency_is_inclusive() {
        let row = ForecastRow::new(date(2026, 1, 1), 10.0, 10.0, 10.0);
        assert!(row.interval_is_consistent());

        let above = ForecastRow::new(date(2026, 1, 1), 12.0, 5.0, 11.0);
        assert!(!above.interval_is_consistent());
    }

    #[test]
    fn counts_inconsistent_rows() {
        let mut ds = three_days();
        assert_eq!(ds.inconsistent_interval_count(), 0);

        ds.rows[1].lower_bound = 250.0;
        assert_eq!(ds.inconsistent_interval_count(), 1);
    }

    #[test]
    fn empty_like_keeps_extra_columns() {
        let mut ds = three_days();
        ds.extra_columns = vec!["trend".into()];
        let empty = ds.empty_like();
        assert!(empty.is_empty());
        assert_eq!(empty.extra_columns, vec!["trend".to_string()]);
    }
}
