//! One-time seeding of default listings.
//!
//! A fresh deployment starts with a small demo inventory so the catalog is
//! never empty. Seeding is guarded by a persisted idempotency flag in the
//! backend: it runs at most once per collection, ever — not once per
//! process start.

use forecourt_core::{ImageSlot, Listing};

use crate::backend::ListingBackend;
use crate::error::StoreError;

/// Idempotency flag key. Versioned so a future default set can reseed.
pub const SEED_FLAG: &str = "seeded-defaults-v1";

/// The default demo inventory.
pub fn default_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "mercedes-a-200d-2019".to_string(),
            brand: "Mercedes".to_string(),
            model: "A 200d".to_string(),
            year: "2019".to_string(),
            fuel: "Diesel".to_string(),
            transmission: "Auto".to_string(),
            price: "28.500€".to_string(),
            image: ImageSlot::Url("assets/mercedes_a_class.png".to_string()),
            logo: ImageSlot::Url("assets/logo_mercedes.png".to_string()),
            ..Default::default()
        },
        Listing {
            id: "peugeot-3008-2016".to_string(),
            brand: "Peugeot".to_string(),
            model: "3008".to_string(),
            year: "2016".to_string(),
            fuel: "Diesel".to_string(),
            transmission: "Manual".to_string(),
            price: "18.900€".to_string(),
            image: ImageSlot::Url("assets/peugeot_3008.png".to_string()),
            logo: ImageSlot::Url("assets/logo_peugeot.png".to_string()),
            ..Default::default()
        },
        Listing {
            id: "kia-sportage-2020".to_string(),
            brand: "Kia".to_string(),
            model: "Sportage".to_string(),
            year: "2020".to_string(),
            fuel: "Hybrid".to_string(),
            transmission: "Auto".to_string(),
            price: "24.200€".to_string(),
            image: ImageSlot::Url("assets/kia_sportage.png".to_string()),
            logo: ImageSlot::Url("assets/logo_kia_white.png".to_string()),
            logo_scale: Some("1.3".to_string()),
            ..Default::default()
        },
    ]
}

/// Seed the default inventory if it has never been seeded.
///
/// Returns `true` if seeding ran, `false` if the flag was already set.
pub async fn ensure_seeded(backend: &dyn ListingBackend) -> Result<bool, StoreError> {
    if backend.get_flag(SEED_FLAG).await? {
        tracing::debug!("default listings already seeded");
        return Ok(false);
    }

    for listing in default_listings() {
        backend.insert(listing).await?;
    }
    backend.set_flag(SEED_FLAG).await?;
    tracing::info!("seeded default listings");
    Ok(true)
}
