use chrono::NaiveDate;

use super::model::ForecastDataset;
use super::summary::{EmptyDatasetError, date_bounds};

// ---------------------------------------------------------------------------
// Date range selection
// ---------------------------------------------------------------------------

/// An inclusive `[start, end]` range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range spanning every row of `dataset`.
    pub fn full(dataset: &ForecastDataset) -> Result<Self, EmptyDatasetError> {
        let (start, end) = date_bounds(dataset)?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Keep both endpoints inside `bounds` and `start <= end`.
    ///
    /// When the endpoints cross, `end` is pulled back to `start`.
    pub fn clamp_to(self, bounds: DateRange) -> Self {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(bounds.start, bounds.end).max(start);
        Self { start, end }
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows with `start <= date <= end`, in their original order.
///
/// An inverted range simply matches nothing.
pub fn filter_by_date_range(
    dataset: &ForecastDataset,
    start: NaiveDate,
    end: NaiveDate,
) -> ForecastDataset {
    let range = DateRange::new(start, end);
    ForecastDataset {
        rows: dataset
            .rows
            .iter()
            .filter(|row| range.contains(row.date))
            .cloned()
            .collect(),
        extra_columns: dataset.extra_columns.clone(),
    }
}
