//! Image-reference classification and inline payload decoding.
//!
//! Admin submissions carry image references in two shapes: an already
//! retrievable URL (external `https://`, a storage URI like `gs://`, or a
//! site-relative asset path), or a transient inline `data:` URL produced by
//! client-side cropping. Inline payloads must be decoded to bytes plus a
//! MIME tag and uploaded to object storage before the listing is persisted;
//! everything else is stored as-is.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{Error, Result};

/// How an image reference should be handled before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRefKind {
    /// Inline `data:` payload — decode and upload.
    Inline,
    /// Already retrievable — persist unchanged, skip upload.
    External,
}

/// A decoded inline image: raw bytes plus the declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Declared MIME type (e.g. `image/jpeg`).
    pub mime: String,
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
}

/// Classify an image reference value.
///
/// Only `data:` URLs are inline; bare asset paths, remote-storage URIs,
/// and external URLs are all external — the prefix check is deliberately
/// the single decision point.
pub fn classify_image_ref(value: &str) -> ImageRefKind {
    if value.trim_start().starts_with("data:") {
        ImageRefKind::Inline
    } else {
        ImageRefKind::External
    }
}

/// Decode an inline `data:<mime>;base64,<payload>` URL.
///
/// # Errors
///
/// Returns [`Error::InvalidInlineImage`] if the value is not a `data:` URL,
/// declares no base64 encoding, lacks the payload separator, declares a
/// non-image MIME type, or the payload is not valid base64.
pub fn decode_inline(value: &str) -> Result<InlineImage> {
    let value = value.trim();
    let rest = value
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidInlineImage("not a data: URL".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInlineImage("missing payload separator".to_string()))?;

    let mime = match header.strip_suffix(";base64") {
        Some(mime) => mime,
        None => {
            return Err(Error::InvalidInlineImage(
                "payload is not base64-encoded".to_string(),
            ));
        }
    };

    if !mime.starts_with("image/") {
        return Err(Error::InvalidInlineImage(format!(
            "unsupported MIME type '{mime}'"
        )));
    }

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| Error::InvalidInlineImage(format!("base64 decode failed: {e}")))?;

    Ok(InlineImage {
        mime: mime.to_string(),
        bytes,
    })
}

/// File extension for a decoded image's MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}
