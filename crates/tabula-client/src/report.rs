//! The shared error handler for API calls.

use tabula_view::Notice;

use crate::error::ApiError;

/// Logs `err` and returns the notice to show, if any.
///
/// Every failure is logged. Nothing is shown when `hide` is set or when the
/// request was cancelled on purpose.
pub fn report_error(err: &ApiError, hide: bool) -> Option<Notice> {
    if err.is_cancelled() {
        log::debug!("ignoring cancelled request");
        return None;
    }
    log::error!("API request failed: {}", err);
    if hide {
        return None;
    }
    Some(Notice::error(user_message(err)))
}

/// The text shown to the user for `err`.
pub fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Http { status: 401, .. } => "Your session has expired, please sign in again".into(),
        ApiError::Http { status: 403, .. } => "You do not have access to this resource".into(),
        ApiError::Http { message, .. } => message.clone(),
        ApiError::Network(_) => "Could not reach the server".into(),
        ApiError::Parse { .. } => "The server sent an unexpected response".into(),
        ApiError::Cancelled => "Request cancelled".into(),
        ApiError::Config(e) => e.to_string(),
    }
}
