//! The vehicle listing record and its payload companions.
//!
//! A `Listing` is the sole persisted entity: one vehicle exposed to the
//! public catalog and the admin panel. Gallery slots are positionally
//! stable — an empty slot is an explicit marker, not an omission — so the
//! detail page's fixed layout blocks keep their positions when a photo in
//! the middle is removed.

use serde::{Deserialize, Serialize};

/// One image slot: either empty or a resolved image URL.
///
/// Serializes as `null` / string so gallery arrays keep their shape.
/// Inline data-URL payloads never reach a stored `ImageSlot`; they are
/// uploaded to media storage first and the resulting URL is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ImageSlot {
    /// No image in this slot.
    #[default]
    Empty,
    /// A retrievable image URL (or site-relative asset path).
    Url(String),
}

impl ImageSlot {
    /// The URL in this slot, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Url(u) => Some(u),
        }
    }

    /// Whether the slot holds an image.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl From<Option<String>> for ImageSlot {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => Self::Url(s),
            _ => Self::Empty,
        }
    }
}

impl From<ImageSlot> for Option<String> {
    fn from(slot: ImageSlot) -> Self {
        match slot {
            ImageSlot::Empty => None,
            ImageSlot::Url(u) => Some(u),
        }
    }
}

/// One vehicle listing.
///
/// The `id` is a slug, unique within the collection, and immutable after
/// creation — it doubles as the document key and the public detail-page
/// query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Slug identifier (e.g. `kia-sportage-1719849600000`).
    pub id: String,
    /// Manufacturer name.
    pub brand: String,
    /// Model name.
    pub model: String,
    /// Model year, free text.
    #[serde(default)]
    pub year: String,
    /// Fuel type (e.g. "Diesel", "Hybrid").
    #[serde(default)]
    pub fuel: String,
    /// Transmission type (e.g. "Auto", "Manual").
    #[serde(default)]
    pub transmission: String,
    /// Engine power, free text (e.g. "150 CV").
    #[serde(default)]
    pub horsepower: String,
    /// Asking price, free text (e.g. "28.500€").
    #[serde(default)]
    pub price: String,
    /// Distance driven, free text (e.g. "85.000 km").
    #[serde(default)]
    pub mileage: String,
    /// Free-text description shown on the detail page.
    #[serde(default)]
    pub description: String,
    /// Whether the vehicle has been sold.
    #[serde(default)]
    pub sold: bool,
    /// Main (hero) image.
    #[serde(default)]
    pub image: ImageSlot,
    /// Brand logo image.
    #[serde(default)]
    pub logo: ImageSlot,
    /// Optional logo display scale (CSS-ish value, e.g. "1.4").
    #[serde(default)]
    pub logo_scale: Option<String>,
    /// Optional logo display margin (CSS-ish value, e.g. "0 8px").
    #[serde(default)]
    pub logo_margin: Option<String>,
    /// Exterior gallery, up to [`crate::MAX_EXTERIOR_SLOTS`] slots.
    #[serde(default)]
    pub gallery_exterior: Vec<ImageSlot>,
    /// Interior gallery, up to [`crate::MAX_INTERIOR_SLOTS`] slots.
    #[serde(default)]
    pub gallery_interior: Vec<ImageSlot>,
}

impl Listing {
    /// Display name: brand + model + year, with empty parts skipped.
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {}", self.brand, self.model);
        if !self.year.trim().is_empty() {
            name.push(' ');
            name.push_str(self.year.trim());
        }
        name.trim().to_string()
    }

    /// The image a link-preview card should use: the third exterior gallery
    /// slot if filled, otherwise the main image.
    pub fn card_image(&self) -> Option<&str> {
        self.gallery_exterior
            .get(2)
            .and_then(ImageSlot::url)
            .or_else(|| self.image.url())
    }
}

/// Create payload: a listing without an identifier.
///
/// The store synthesizes the slug at creation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub fuel: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub horsepower: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub mileage: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sold: bool,
    #[serde(default)]
    pub image: ImageSlot,
    #[serde(default)]
    pub logo: ImageSlot,
    #[serde(default)]
    pub logo_scale: Option<String>,
    #[serde(default)]
    pub logo_margin: Option<String>,
    #[serde(default)]
    pub gallery_exterior: Vec<ImageSlot>,
    #[serde(default)]
    pub gallery_interior: Vec<ImageSlot>,
}

impl ListingDraft {
    /// Attach an identifier, producing a full listing.
    pub fn into_listing(self, id: String) -> Listing {
        Listing {
            id,
            brand: self.brand,
            model: self.model,
            year: self.year,
            fuel: self.fuel,
            transmission: self.transmission,
            horsepower: self.horsepower,
            price: self.price,
            mileage: self.mileage,
            description: self.description,
            sold: self.sold,
            image: self.image,
            logo: self.logo,
            logo_scale: self.logo_scale,
            logo_margin: self.logo_margin,
            gallery_exterior: self.gallery_exterior,
            gallery_interior: self.gallery_interior,
        }
    }
}

/// Merge patch: every field optional, absent fields untouched.
///
/// The `id` is deliberately not part of the patch — identifiers are
/// immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_scale: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_margin: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_exterior: Option<Vec<ImageSlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_interior: Option<Vec<ImageSlot>>,
}

impl ListingPatch {
    /// Merge this patch into an existing listing.
    pub fn apply(&self, listing: &mut Listing) {
        if let Some(v) = &self.brand {
            listing.brand = v.clone();
        }
        if let Some(v) = &self.model {
            listing.model = v.clone();
        }
        if let Some(v) = &self.year {
            listing.year = v.clone();
        }
        if let Some(v) = &self.fuel {
            listing.fuel = v.clone();
        }
        if let Some(v) = &self.transmission {
            listing.transmission = v.clone();
        }
        if let Some(v) = &self.horsepower {
            listing.horsepower = v.clone();
        }
        if let Some(v) = &self.price {
            listing.price = v.clone();
        }
        if let Some(v) = &self.mileage {
            listing.mileage = v.clone();
        }
        if let Some(v) = &self.description {
            listing.description = v.clone();
        }
        if let Some(v) = self.sold {
            listing.sold = v;
        }
        if let Some(v) = &self.image {
            listing.image = v.clone();
        }
        if let Some(v) = &self.logo {
            listing.logo = v.clone();
        }
        if let Some(v) = &self.logo_scale {
            listing.logo_scale = v.clone();
        }
        if let Some(v) = &self.logo_margin {
            listing.logo_margin = v.clone();
        }
        if let Some(v) = &self.gallery_exterior {
            listing.gallery_exterior = v.clone();
        }
        if let Some(v) = &self.gallery_interior {
            listing.gallery_interior = v.clone();
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().is_some_and(|m| m.is_empty()))
            .unwrap_or(false)
    }
}
