//! Error types for the Faro workspace.
//!
//! Per-date and per-window shortfalls are not errors: they are skipped by the
//! component that meets them. The variants here abort a whole stage.

use thiserror::Error;

/// The main error type for Faro operations.
#[derive(Debug, Error)]
pub enum FaroError {
    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A stage finished without producing a single result row.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// A required input table or file from an upstream stage is absent.
    #[error("Missing upstream artifact: {0}")]
    MissingArtifact(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// The panel holds more than one row for a `(date, ticker)` key.
    #[error("Duplicate panel row for {ticker} on {date}")]
    DuplicateKey {
        /// Offending date.
        date: String,
        /// Offending ticker.
        ticker: String,
    },

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A configuration value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when a factor name cannot be resolved.
    #[error("Factor not found: {0}")]
    FactorNotFound(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error (de)serializing configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for Faro operations.
///
/// This is a convenience type that uses [`FaroError`] as the error type.
pub type Result<T> = std::result::Result<T, FaroError>;
