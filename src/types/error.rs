use std::io;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ListingError>;

/// Errors raised by metric derivation, ingestion and export.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A metric denominator (or the price itself) cannot produce a finite ordering key.
    #[error("invalid metric input: {field} must be positive and finite, got {value}")]
    InvalidMetricInput {
        /// Name of the offending field or field combination.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Caller supplied an argument outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// CSV parsing or writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
