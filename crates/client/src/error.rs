//! Error types for the store API client.
//!
//! The taxonomy mirrors how failures resolve for the user: transport and
//! decode problems, a terminal 401 after the single refresh retry, missing
//! resources, and server-side validation messages surfaced verbatim.

use reqwest::StatusCode;
use thiserror::Error;

use crate::session::StoreError;

/// Errors that can occur when talking to the store API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request was rejected with 401 and could not be recovered by a token
    /// refresh. The session has already been cleared when this is returned.
    #[error("unauthorized - please log in again")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server-side validation failure, message surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// Any other non-success response.
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Persisted session state could not be read or written.
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// Operation requires an authenticated user.
    #[error("this operation requires a logged-in user")]
    LoginRequired,

    /// Operation requires a vendor account.
    #[error("this operation requires a vendor account")]
    VendorRequired,
}

/// Map a non-success response to an [`ApiError`].
pub(crate) fn error_from_response(status: StatusCode, path: &str, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(path.to_owned()),
        StatusCode::BAD_REQUEST => ApiError::Validation(extract_detail(body)),
        _ => ApiError::Api {
            status: status.as_u16(),
            detail: extract_detail(body),
        },
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The API wraps most errors as `{"detail": "..."}` or `{"message": "..."}`;
/// field validation errors arrive as `{"field": ["msg", ...]}`. Anything else
/// falls back to the (truncated) raw body.
pub(crate) fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(serde_json::Value::as_str) {
            return detail.to_owned();
        }

        if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
            return message.to_owned();
        }

        if let Some(map) = value.as_object() {
            let parts: Vec<String> = map
                .iter()
                .map(|(field, errors)| format!("{field}: {}", flatten_messages(errors)))
                .collect();
            if !parts.is_empty() {
                return parts.join("; ");
            }
        }
    }

    body.chars().take(200).collect()
}

fn flatten_messages(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_messages)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_field() {
        let body = r#"{"detail": "No active account found with the given credentials"}"#;
        assert_eq!(
            extract_detail(body),
            "No active account found with the given credentials"
        );
    }

    #[test]
    fn test_extract_detail_message_field() {
        let body = r#"{"message": "Coupon not valid", "icon": "error"}"#;
        assert_eq!(extract_detail(body), "Coupon not valid");
    }

    #[test]
    fn test_extract_detail_field_errors() {
        let body = r#"{"email": ["This field is required."]}"#;
        assert_eq!(extract_detail(body), "email: This field is required.");
    }

    #[test]
    fn test_extract_detail_raw_fallback() {
        assert_eq!(extract_detail("<html>gateway timeout</html>"), "<html>gateway timeout</html>");
    }

    #[test]
    fn test_error_from_response_maps_statuses() {
        assert!(matches!(
            error_from_response(StatusCode::UNAUTHORIZED, "/x", ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            error_from_response(StatusCode::NOT_FOUND, "/products/missing/", ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::BAD_REQUEST, "/x", r#"{"detail":"bad"}"#),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "/x", "boom"),
            ApiError::Api { status: 500, .. }
        ));
    }
}
