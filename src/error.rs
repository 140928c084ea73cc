use std::path::PathBuf;

/// The dataset could not be loaded. Fatal: the dashboard never starts
/// with a partial dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataUnavailable {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("invalid Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The file parsed but does not hold a table of records.
    #[error("unexpected file layout: {0}")]
    Layout(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// None of the accepted header names for a required column is present.
    #[error("missing required column '{column}' (accepted headers: {accepted})")]
    MissingColumn {
        column: &'static str,
        accepted: String,
    },

    /// A cell could not be interpreted. `row` is the 1-based data row.
    #[error("row {row}, column '{column}': {reason}")]
    Malformed {
        row: usize,
        column: &'static str,
        reason: String,
    },
}
