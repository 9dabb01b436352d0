//! Tabula Client - the REST boundary that feeds rows into table views.
//!
//! - [`ClientConfig`]: base URL from `TABULA_API_URL`, optional bearer token
//!   from `TABULA_API_TOKEN`
//! - [`ApiClient`]: JSON GETs raced against a `CancellationToken`
//! - [`report_error`]: the shared handler that logs every failure and turns
//!   it into a user notice unless hidden or cancelled
//!
//! There are no retries; a failed fetch leaves the caller's view as it was.

pub mod client;
pub mod config;
pub mod error;
pub mod report;

pub use client::{rows_from_json, ApiClient};
pub use config::{ClientConfig, API_TOKEN_VAR, API_URL_VAR};
pub use error::{error_message, ApiError, ConfigError, Result};
pub use report::{report_error, user_message};
pub use tokio_util::sync::CancellationToken;
