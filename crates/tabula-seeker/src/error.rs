//! Error types for the seeker crate.

use thiserror::Error;

/// Errors that can occur when building queries from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeekerError {
    /// A date bound could not be parsed.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A sort direction string was not `asc` or `desc`.
    #[error("invalid sort direction '{0}': expected 'asc' or 'desc'")]
    InvalidDirection(String),

    /// A date range whose start lies after its end.
    #[error("date range starts ({start}) after it ends ({end})")]
    InvertedRange { start: String, end: String },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
