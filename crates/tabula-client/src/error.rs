//! Client error types.

use serde::Deserialize;

/// Errors reading client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success response from the API.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network error during API call.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        ApiError::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
    message: Option<serde_json::Value>,
}

/// Extracts the message from an error body shaped `{error}` or `{message}`.
///
/// `error` wins when both are present. Non-string values are rendered as
/// JSON. Returns `None` for bodies that are not such an object.
pub fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let value = parsed.error.or(parsed.message)?;
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::String(_) | serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_error_or_message() {
        assert_eq!(error_message(r#"{"error": "Not allowed"}"#).as_deref(), Some("Not allowed"));
        assert_eq!(error_message(r#"{"message": "Bad input"}"#).as_deref(), Some("Bad input"));
        assert_eq!(
            error_message(r#"{"error": "first", "message": "second"}"#).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn no_message_in_other_bodies() {
        assert_eq!(error_message("<html>oops</html>"), None);
        assert_eq!(error_message(r#"{"detail": "x"}"#), None);
        assert_eq!(error_message(r#"{"error": ""}"#), None);
        assert_eq!(error_message("[]"), None);
    }

    #[test]
    fn structured_error_is_rendered() {
        assert_eq!(
            error_message(r#"{"error": {"code": 7}}"#).as_deref(),
            Some(r#"{"code":7}"#)
        );
    }

    #[test]
    fn status_of_http_error() {
        assert_eq!(ApiError::http(404, "missing").status(), Some(404));
        assert_eq!(ApiError::Cancelled.status(), None);
        assert!(ApiError::Cancelled.is_cancelled());
    }
}
