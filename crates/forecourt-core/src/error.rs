//! Error types shared across the Forecourt crates.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by core domain logic.
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or malformed.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// The name of the invalid field.
        field: &'static str,
        /// Description of what's wrong.
        reason: String,
    },

    /// An inline image payload could not be decoded.
    #[error("invalid inline image: {0}")]
    InvalidInlineImage(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_display() {
        let err = Error::InvalidField {
            field: "brand",
            reason: "must not be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("brand"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn invalid_inline_image_display() {
        let err = Error::InvalidInlineImage("missing comma".to_string());
        assert_eq!(err.to_string(), "invalid inline image: missing comma");
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }
}
