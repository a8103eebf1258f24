//! Error types for the listing store.

use thiserror::Error;

/// Errors produced by the store, its backend, or media storage.
///
/// Mutation failures are propagated to the caller exactly once; nothing in
/// this crate retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested listing does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was rejected before reaching the backend.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backing document collection rejected or failed an operation.
    #[error("backend error: {0}")]
    Backend(String),

    /// Object storage rejected or failed an upload.
    #[error("media storage error: {0}")]
    Storage(String),

    /// Core domain error (e.g. inline image decoding).
    #[error(transparent)]
    Core(#[from] forecourt_core::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound("kia-sportage-1".to_string());
        assert_eq!(err.to_string(), "not found: kia-sportage-1");
    }

    #[test]
    fn validation_display() {
        let err = StoreError::Validation("ids must be a permutation".to_string());
        assert!(err.to_string().contains("validation error"));
    }

    #[test]
    fn core_error_passes_through() {
        let core = forecourt_core::Error::InvalidInlineImage("bad".to_string());
        let err: StoreError = core.into();
        assert_eq!(err.to_string(), "invalid inline image: bad");
    }
}
