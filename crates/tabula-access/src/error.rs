use thiserror::Error;

/// Errors from reading access data.
///
/// Denied access is never an error; it is a [`Decision::Redirect`](crate::Decision).
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid user payload: {0}")]
    InvalidUser(#[source] serde_json::Error),

    #[error("redirect route must start with '/': '{0}'")]
    InvalidRoute(String),
}

pub type Result<T> = std::result::Result<T, AccessError>;
