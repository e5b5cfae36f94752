use chrono::NaiveDate;
use thiserror::Error;

use super::model::ForecastDataset;

/// Returned by reductions that have no meaning on zero rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dataset has no rows")]
pub struct EmptyDatasetError;

// ---------------------------------------------------------------------------
// Summary statistics over the predicted value
// ---------------------------------------------------------------------------

/// Headline numbers for the metrics row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSummary {
    pub max_predicted: f64,
    pub min_predicted: f64,
    pub avg_predicted: f64,
    pub row_count: usize,
}

/// Max, min and arithmetic mean of `predicted` across all rows.
pub fn compute_summary(dataset: &ForecastDataset) -> Result<ForecastSummary, EmptyDatasetError> {
    if dataset.is_empty() {
        return Err(EmptyDatasetError);
    }

    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    let mut sum = 0.0;
    for row in &dataset.rows {
        max = max.max(row.predicted);
        min = min.min(row.predicted);
        sum += row.predicted;
    }

    let n = dataset.len();
    // Rounding in the sum can push the mean a hair outside [min, max].
    let avg = (sum / n as f64).clamp(min, max);

    Ok(ForecastSummary {
        max_predicted: max,
        min_predicted: min,
        avg_predicted: avg,
        row_count: n,
    })
}

/// Earliest and latest date in the dataset, regardless of row order.
pub fn date_bounds(dataset: &ForecastDataset) -> Result<(NaiveDate, NaiveDate), EmptyDatasetError> {
    let first = dataset.rows.first().ok_or(EmptyDatasetError)?.date;
    Ok(dataset
        .rows
        .iter()
        .fold((first, first), |(lo, hi), row| (lo.min(row.date), hi.max(row.date))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, three_days};
    use crate::data::model::ForecastRow;

    #[test]
    fn summary_of_three_days() {
        let s = compute_summary(&three_days()).unwrap();
        assert_eq!(s.max_predicted, 200.0);
        assert_eq!(s.min_predicted, 50.0);
        assert!((s.avg_predicted - 116.666_666).abs() < 1e-3);
        assert_eq!(s.row_count, 3);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let empty = ForecastDataset::default();
        assert_eq!(compute_summary(&empty), Err(EmptyDatasetError));
        assert_eq!(date_bounds(&empty), Err(EmptyDatasetError));
    }

    #[test]
    fn average_stays_between_min_and_max() {
        let values = [0.1, 0.2, 0.30000000000000004, 1e-12, 7.5, 7.5, 1e9, -3.25];
        for n in 1..=values.len() {
            let rows = values[..n]
                .iter()
                .enumerate()
                .map(|(i, &v)| ForecastRow::new(date(2026, 1, 1 + i as u32), v, v - 1.0, v + 1.0))
                .collect();
            let s = compute_summary(&ForecastDataset::from_rows(rows)).unwrap();
            assert!(s.min_predicted <= s.avg_predicted, "{s:?}");
            assert!(s.avg_predicted <= s.max_predicted, "{s:?}");
        }
    }

    #[test]
    fn identical_values_give_identical_stats() {
        let rows = (1..=4)
            .map(|d| ForecastRow::new(date(2026, 2, d), 0.1, 0.0, 0.2))
            .collect();
        let s = compute_summary(&ForecastDataset::from_rows(rows)).unwrap();
        assert_eq!(s.min_predicted, 0.1);
        assert_eq!(s.max_predicted, 0.1);
        assert_eq!(s.avg_predicted, 0.1);
    }

    #[test]
    fn bounds_ignore_row_order() {
        let mut ds = three_days();
        ds.rows.reverse();
        ds.rows.swap(0, 1);
        assert_eq!(date_bounds(&ds).unwrap(), (date(2026, 1, 1), date(2026, 1, 3)));
    }
}
