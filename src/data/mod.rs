/// Data layer: core types, loading, filtering, summaries and export.
///
/// Architecture:
/// ```text
///  uploaded bytes (optional)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate, else fall back to the bundled default
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────┐
///   │ ForecastDataset  │  Vec<ForecastRow>, extra column names
///   └─────────────────┘
///        │
///        ├──▶ summary   max / min / mean of yhat, date bounds
///        ▼
///   ┌──────────┐
///   │  filter   │  inclusive date range → ForecastDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  CSV bytes for download
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
