//! Standalone media upload endpoint.
//!
//! The admin panel can also upload an image before submitting the listing
//! form (cropping happens client-side, so each upload is one inline
//! payload). Brand and model are required up front — they namespace the
//! object key — and the payload must actually be inline; already-remote
//! URLs have nothing to upload.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use forecourt_core::{
    ImageRefKind, MAX_EXTERIOR_SLOTS, MAX_INTERIOR_SLOTS, classify_image_ref,
};
use forecourt_store::{MediaPurpose, resolve_image_ref};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /media`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUploadRequest {
    /// Listing brand (namespaces the object key).
    pub brand: String,
    /// Listing model (namespaces the object key).
    pub model: String,
    /// Purpose tag: "main", "logo", "exterior", or "interior".
    pub purpose: String,
    /// Gallery slot index, required for exterior/interior.
    #[serde(default)]
    pub slot: Option<usize>,
    /// Inline `data:` image payload.
    pub data: String,
}

/// Response body for `POST /media`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    /// Retrievable URL of the stored image.
    pub url: String,
}

/// `POST /media` - upload one inline image and return its URL.
pub async fn upload_media(
    State(state): State<AppState>,
    Json(request): Json<MediaUploadRequest>,
) -> Result<Json<MediaUploadResponse>, ApiError> {
    if classify_image_ref(&request.data) != ImageRefKind::Inline {
        return Err(ApiError::BadRequest(
            "data must be an inline data: URL".to_string(),
        ));
    }

    let purpose = parse_purpose(&request.purpose, request.slot)?;
    let url = resolve_image_ref(
        state.media.as_ref(),
        &request.brand,
        &request.model,
        purpose,
        &request.data,
        chrono::Utc::now().timestamp_millis(),
    )
    .await?;

    Ok(Json(MediaUploadResponse { url }))
}

/// Parse a purpose tag plus optional slot index.
fn parse_purpose(purpose: &str, slot: Option<usize>) -> Result<MediaPurpose, ApiError> {
    match purpose {
        "main" => Ok(MediaPurpose::Main),
        "logo" => Ok(MediaPurpose::Logo),
        "exterior" => {
            let slot = slot.ok_or_else(|| {
                ApiError::BadRequest("exterior uploads require a slot index".to_string())
            })?;
            if slot >= MAX_EXTERIOR_SLOTS {
                return Err(ApiError::BadRequest(format!(
                    "exterior slot must be below {MAX_EXTERIOR_SLOTS}"
                )));
            }
            Ok(MediaPurpose::Exterior(slot))
        }
        "interior" => {
            let slot = slot.ok_or_else(|| {
                ApiError::BadRequest("interior uploads require a slot index".to_string())
            })?;
            if slot >= MAX_INTERIOR_SLOTS {
                return Err(ApiError::BadRequest(format!(
                    "interior slot must be below {MAX_INTERIOR_SLOTS}"
                )));
            }
            Ok(MediaPurpose::Interior(slot))
        }
        other => Err(ApiError::BadRequest(format!(
            "unknown media purpose '{other}'"
        ))),
    }
}
