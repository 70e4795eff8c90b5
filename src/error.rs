use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date \"{input}\" (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("Unsupported locale: {input}")]
    UnsupportedLocale { input: String },

    #[error("Invalid delimiter {input:?} (expected a single ASCII character)")]
    InvalidDelimiter { input: char },

    #[error("{command} output cannot be written as CSV; pick a single table")]
    UnsupportedFormat { command: &'static str },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load config {path}: {message}")]
    Config { path: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
