//! Dispatcher error types.
//!
//! The dispatcher never lets an error escape as anything but a valid
//! response: an unresolvable listing id under bot classification is a
//! plain-text 404, an unexpected failure while building bot HTML is a
//! plain-text 500, and everything else degrades to a client-side redirect
//! long before it reaches this type.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Cache-Control value for every dispatcher response, errors included.
pub const NO_STORE: &str = "private, no-cache, no-store, must-revalidate";

/// Dispatcher error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// The requested listing does not exist.
    #[error("listing not found: {0}")]
    NotFound(String),

    /// Unexpected internal failure while building a response.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(id) => {
                tracing::debug!(id = %id, "listing not found");
                (StatusCode::NOT_FOUND, "Vehicle not found")
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal error building response");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                ),
                (header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE)),
            ],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = PreviewError::NotFound("kia-sportage-1".to_string());
        assert_eq!(err.to_string(), "listing not found: kia-sportage-1");
    }

    #[test]
    fn not_found_response_is_404() {
        let response = PreviewError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            NO_STORE
        );
    }

    #[test]
    fn internal_response_is_500() {
        let response = PreviewError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
