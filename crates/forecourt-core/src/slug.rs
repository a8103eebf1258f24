//! Listing identifier synthesis.
//!
//! New listings get a slug derived from brand, model, and the creation
//! timestamp: lower-cased, whitespace runs collapsed to single hyphens.
//! The timestamp suffix keeps slugs unique without coordination; the slug
//! is immutable after creation.

/// Synthesize a listing slug from brand, model, and a Unix-millisecond
/// timestamp.
///
/// `"Kia"`, `"Sportage"`, `1719849600000` → `"kia-sportage-1719849600000"`.
pub fn listing_slug(brand: &str, model: &str, timestamp_millis: i64) -> String {
    let raw = format!("{} {} {}", brand.trim(), model.trim(), timestamp_millis);
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_hyphen = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_was_hyphen && !slug.is_empty() {
                slug.push('-');
                last_was_hyphen = true;
            }
        } else {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_was_hyphen = false;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_slug() {
        assert_eq!(
            listing_slug("Kia", "Sportage", 1719849600000),
            "kia-sportage-1719849600000"
        );
    }

    #[test]
    fn multi_word_model_hyphenated() {
        assert_eq!(
            listing_slug("Mercedes", "Clase A 200d", 1700000000000),
            "mercedes-clase-a-200d-1700000000000"
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            listing_slug("  Land  Rover ", "Defender", 1),
            "land-rover-defender-1"
        );
    }

    #[test]
    fn slug_matches_expected_pattern() {
        let slug = listing_slug("Kia", "Sportage", 1719849600123);
        let (prefix, digits) = slug.rsplit_once('-').unwrap();
        assert_eq!(prefix, "kia-sportage");
        assert!(!digits.is_empty());
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn uppercase_lowered() {
        assert_eq!(listing_slug("BMW", "X5", 7), "bmw-x5-7");
    }

    #[test]
    fn empty_brand_and_model() {
        // Degenerate input still yields a usable, unique slug
        assert_eq!(listing_slug("", "", 42), "42");
    }
}
