//! Listing CRUD and reorder endpoints.
//!
//! Payloads may carry inline `data:` image references; those are uploaded
//! to media storage first and the persisted listing stores the resulting
//! URL. Every handler propagates mutation failures to the caller exactly
//! once — the admin UI decides how to surface them.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use forecourt_core::{
    ImageSlot, Listing, ListingDraft, ListingPatch, MAX_EXTERIOR_SLOTS, MAX_INTERIOR_SLOTS,
};
use forecourt_store::{MediaPurpose, resolve_image_ref};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `PUT /listings/order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    /// The full desired id sequence, a permutation of the collection.
    pub ids: Vec<String>,
}

/// `GET /listings` - the full catalog, in collection order.
pub async fn list_listings(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.store.fetch_all().await?))
}

/// `GET /listings/{id}` - one listing.
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    let listing = state
        .store
        .fetch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id))?;
    Ok(Json(listing))
}

/// `POST /listings` - create a listing from a draft.
pub async fn create_listing(
    State(state): State<AppState>,
    Json(mut draft): Json<ListingDraft>,
) -> Result<(StatusCode, Json<Listing>), ApiError> {
    validate_gallery_sizes(draft.gallery_exterior.len(), draft.gallery_interior.len())?;

    let brand = draft.brand.clone();
    let model = draft.model.clone();
    resolve_images(
        &state,
        &brand,
        &model,
        &mut draft.image,
        &mut draft.logo,
        &mut draft.gallery_exterior,
        &mut draft.gallery_interior,
    )
    .await?;

    let listing = state.store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// `PATCH /listings/{id}` - merge-patch a listing.
///
/// Fields absent from the payload are untouched. Inline images in the
/// patch are namespaced by the patched brand/model when present, otherwise
/// by the existing listing's.
pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut patch): Json<ListingPatch>,
) -> Result<Json<Listing>, ApiError> {
    let existing = state
        .store
        .fetch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id.clone()))?;

    if let Some(gallery) = &patch.gallery_exterior {
        validate_gallery_sizes(gallery.len(), 0)?;
    }
    if let Some(gallery) = &patch.gallery_interior {
        validate_gallery_sizes(0, gallery.len())?;
    }

    let brand = patch.brand.clone().unwrap_or(existing.brand);
    let model = patch.model.clone().unwrap_or(existing.model);
    let now = chrono::Utc::now().timestamp_millis();

    if let Some(slot) = patch.image.as_mut() {
        resolve_slot(&state, &brand, &model, MediaPurpose::Main, slot, now).await?;
    }
    if let Some(slot) = patch.logo.as_mut() {
        resolve_slot(&state, &brand, &model, MediaPurpose::Logo, slot, now).await?;
    }
    if let Some(gallery) = patch.gallery_exterior.as_mut() {
        for (i, slot) in gallery.iter_mut().enumerate() {
            resolve_slot(&state, &brand, &model, MediaPurpose::Exterior(i), slot, now).await?;
        }
    }
    if let Some(gallery) = patch.gallery_interior.as_mut() {
        for (i, slot) in gallery.iter_mut().enumerate() {
            resolve_slot(&state, &brand, &model, MediaPurpose::Interior(i), slot, now).await?;
        }
    }

    state.store.update(&id, &patch).await?;
    let updated = state
        .store
        .fetch(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(id))?;
    Ok(Json(updated))
}

/// `DELETE /listings/{id}`.
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /listings/order` - rewrite the collection order.
pub async fn reorder_listings(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<StatusCode, ApiError> {
    state.store.reorder(&request.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_gallery_sizes(exterior: usize, interior: usize) -> Result<(), ApiError> {
    if exterior > MAX_EXTERIOR_SLOTS {
        return Err(ApiError::BadRequest(format!(
            "exterior gallery holds at most {MAX_EXTERIOR_SLOTS} slots"
        )));
    }
    if interior > MAX_INTERIOR_SLOTS {
        return Err(ApiError::BadRequest(format!(
            "interior gallery holds at most {MAX_INTERIOR_SLOTS} slots"
        )));
    }
    Ok(())
}

/// Resolve every inline image reference in a payload to a stored URL.
async fn resolve_images(
    state: &AppState,
    brand: &str,
    model: &str,
    image: &mut ImageSlot,
    logo: &mut ImageSlot,
    gallery_exterior: &mut [ImageSlot],
    gallery_interior: &mut [ImageSlot],
) -> Result<(), ApiError> {
    let now = chrono::Utc::now().timestamp_millis();

    resolve_slot(state, brand, model, MediaPurpose::Main, image, now).await?;
    resolve_slot(state, brand, model, MediaPurpose::Logo, logo, now).await?;
    for (i, slot) in gallery_exterior.iter_mut().enumerate() {
        resolve_slot(state, brand, model, MediaPurpose::Exterior(i), slot, now).await?;
    }
    for (i, slot) in gallery_interior.iter_mut().enumerate() {
        resolve_slot(state, brand, model, MediaPurpose::Interior(i), slot, now).await?;
    }
    Ok(())
}

async fn resolve_slot(
    state: &AppState,
    brand: &str,
    model: &str,
    purpose: MediaPurpose,
    slot: &mut ImageSlot,
    timestamp_millis: i64,
) -> Result<(), ApiError> {
    if let ImageSlot::Url(value) = slot {
        let resolved = resolve_image_ref(
            state.media.as_ref(),
            brand,
            model,
            purpose,
            value,
            timestamp_millis,
        )
        .await?;
        *slot = ImageSlot::Url(resolved);
    }
    Ok(())
}
