//! Server error type.
//!
//! Maps handler failures to HTTP status codes with a plain-text body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// A numeric path or query parameter could not be parsed.
    #[error("Expected a number, but received '{0}'")]
    InvalidNumber(String),
    /// No example matches the requested path.
    #[error("Example not found: {0}")]
    ExampleNotFound(String),
    /// Unexpected failure while serving a request.
    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidNumber(_) => StatusCode::BAD_REQUEST,
            Self::ExampleNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_number_message() {
        let err = ServerError::InvalidNumber("abc".to_string());
        assert_eq!(err.to_string(), "Expected a number, but received 'abc'");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let err = ServerError::ExampleNotFound("/examples/nope".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_status() {
        let err = ServerError::Internal("boom".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
