//! Error types for table construction and interaction.

use thiserror::Error;

/// Errors raised when a table is configured or driven with invalid input.
///
/// Interaction errors never modify view state: the call is rejected and the
/// previous state stays in place.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("rows-per-page {value} is not one of the offered options {options:?}")]
    InvalidRowsPerPage { value: usize, options: Vec<usize> },

    #[error("rows-per-page options must be non-empty and non-zero")]
    EmptyRowsPerPageOptions,

    #[error("filter field '{0}' collides with a reserved URL parameter")]
    ReservedFilterField(String),

    #[error("filter field '{0}' is configured twice")]
    DuplicateFilterField(String),

    #[error("no filter is configured for field '{0}'")]
    UnknownFilterField(String),

    #[error("no column with key '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' has no sort field")]
    UnsortableColumn(String),

    #[error(transparent)]
    Seeker(#[from] tabula_seeker::SeekerError),

    #[error("failed to parse table config: {0}")]
    Config(String),

    #[error("failed to read table config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
