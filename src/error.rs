//! Error types for eurofx

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for eurofx
///
/// Query-level absence is not an error: queries return `Ok(None)` when no
/// data matches. Only rejected input and ingestion failures end up here.
#[derive(Error, Debug)]
pub enum RatesError {
    #[error("End date cannot be before start date.")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("No data from source: {0}")]
    NoDataFromSource(String),

    #[error("Download error: {0}")]
    DownloadError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Duplicate date in rate table: {0}")]
    DuplicateDate(NaiveDate),

    #[error("Invalid rate for {currency} on {date}: {rate} (rates must be positive)")]
    InvalidRate {
        date: NaiveDate,
        currency: String,
        rate: Decimal,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl RatesError {
    /// Whether the error was caused by the request rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RatesError::InvalidDateRange { .. } | RatesError::Overflow(_)
        )
    }
}

/// Result type alias for eurofx operations
pub type Result<T> = std::result::Result<T, RatesError>;
