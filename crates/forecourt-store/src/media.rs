//! Listing image storage.
//!
//! Images are stored as blobs in an object-storage area; the listing
//! document stores the resulting retrievable URL, never the blob. Object
//! keys are namespaced by sanitized brand/model plus a purpose tag and a
//! timestamp:
//!
//! ```text
//! listings/kia-sportage/exterior-2-1719849600000.jpg
//! ```
//!
//! Inline data-URL payloads are decoded and uploaded; anything already
//! retrievable passes through untouched. The resize-proxy URL builder
//! lives here too, since it is the only other media concern.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use forecourt_core::{ImageRefKind, classify_image_ref, decode_inline, extension_for_mime};

use crate::error::StoreError;

/// What a stored image is for; part of its object key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPurpose {
    /// Main (hero) image.
    Main,
    /// Brand logo.
    Logo,
    /// Exterior gallery slot (0-based).
    Exterior(usize),
    /// Interior gallery slot (0-based).
    Interior(usize),
}

impl MediaPurpose {
    fn tag(self) -> String {
        match self {
            Self::Main => "main".to_string(),
            Self::Logo => "logo".to_string(),
            Self::Exterior(i) => format!("exterior-{i}"),
            Self::Interior(i) => format!("interior-{i}"),
        }
    }
}

/// Object storage for listing images.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a blob under `key` and return its retrievable URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError>;
}

/// Build the object key for a listing image.
pub fn media_key(
    brand: &str,
    model: &str,
    purpose: MediaPurpose,
    timestamp_millis: i64,
    extension: &str,
) -> String {
    format!(
        "listings/{}/{}-{}.{}",
        sanitize_segment(&format!("{brand} {model}")),
        purpose.tag(),
        timestamp_millis,
        extension
    )
}

/// Sanitize a path segment: lowercase, whitespace runs to single hyphens,
/// everything but ASCII alphanumerics and hyphens dropped.
fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_hyphen = true; // suppress a leading hyphen
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !last_was_hyphen {
            out.push('-');
            last_was_hyphen = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Resolve an image reference to a retrievable URL.
///
/// External references pass through unchanged. Inline payloads are decoded
/// and uploaded — but only once brand and model are present, since they
/// namespace the object key; a missing one is rejected before any storage
/// call.
pub async fn resolve_image_ref(
    storage: &dyn MediaStorage,
    brand: &str,
    model: &str,
    purpose: MediaPurpose,
    value: &str,
    timestamp_millis: i64,
) -> Result<String, StoreError> {
    match classify_image_ref(value) {
        ImageRefKind::External => Ok(value.to_string()),
        ImageRefKind::Inline => {
            if brand.trim().is_empty() || model.trim().is_empty() {
                return Err(StoreError::Validation(
                    "brand and model are required before uploading images".to_string(),
                ));
            }
            let image = decode_inline(value)?;
            let key = media_key(
                brand,
                model,
                purpose,
                timestamp_millis,
                extension_for_mime(&image.mime),
            );
            let url = storage.put(&key, image.bytes, &image.mime).await?;
            tracing::debug!(key = %key, "inline image uploaded");
            Ok(url)
        }
    }
}

/// Build a resize-proxy URL for `source` at the given dimensions.
///
/// The proxy takes the source URL and target size as query parameters. An
/// unparsable proxy base falls back to the source URL untouched.
pub fn resize_url(proxy_base: &str, source: &str, width: u32, height: u32) -> String {
    let Ok(mut url) = Url::parse(proxy_base) else {
        return source.to_string();
    };
    url.query_pairs_mut()
        .append_pair("url", source)
        .append_pair("w", &width.to_string())
        .append_pair("h", &height.to_string());
    url.to_string()
}

/// In-memory [`MediaStorage`] for tests and local development.
pub struct MemoryMediaStorage {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
}

struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

impl MemoryMediaStorage {
    /// Create storage that mints URLs under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Content type of a stored object, if present.
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.lock().get(key).map(|o| o.content_type.clone())
    }

    /// Bytes of a stored object, if present.
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().get(key).map(|o| o.bytes.clone())
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StoreError> {
        if bytes.is_empty() {
            return Err(StoreError::Storage("refusing to store empty blob".to_string()));
        }
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{}", self.base_url, key))
    }
}
