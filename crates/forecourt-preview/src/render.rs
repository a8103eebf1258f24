//! HTML rendering for the bot-facing card and the injected meta block.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time
//! HTML generation with automatic escaping of dynamic values.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use forecourt_core::{Listing, format_price};

use crate::config::Config;
use crate::shell;

/// Open Graph card dimensions requested from the resize proxy.
const CARD_IMAGE_WIDTH: u32 = 1200;
const CARD_IMAGE_HEIGHT: u32 = 630;

/// Compose the meta description: formatted price, then fuel and mileage
/// when present, then the fixed marketing suffix.
pub fn compose_description(listing: &Listing, site_name: &str) -> String {
    let mut price = format_price(&listing.price);
    if !price.contains('€') {
        price.push('€');
    }

    let mut description = price;
    if !listing.fuel.trim().is_empty() {
        description.push_str(" | ");
        description.push_str(listing.fuel.trim());
    }
    if !listing.mileage.trim().is_empty() {
        description.push_str(" | ");
        description.push_str(listing.mileage.trim());
    }
    description.push_str(&format!(
        " - Discover this {} at {}.",
        listing.display_name(),
        site_name
    ));
    description
}

/// Pick the card image and route it through the resize proxy.
///
/// Preference order: third exterior gallery slot, main image, the
/// configured generic brand image.
pub fn card_image_url(listing: &Listing, config: &Config) -> String {
    let source = listing
        .card_image()
        .unwrap_or(config.fallback_image_url.as_str());

    if config.resize_proxy_url.trim().is_empty() {
        source.to_string()
    } else {
        forecourt_store::resize_url(
            &config.resize_proxy_url,
            source,
            CARD_IMAGE_WIDTH,
            CARD_IMAGE_HEIGHT,
        )
    }
}

/// The lightweight bot card: a complete, self-contained HTML document
/// carrying exactly the tags a link-preview crawler needs.
///
/// The body still redirects a real browser to the app route, should one
/// ever land here.
pub fn listing_card(listing: &Listing, config: &Config) -> Markup {
    let name = listing.display_name();
    let title = format!("{} | {}", name, config.site_name);
    let description = compose_description(listing, &config.site_name);
    let image = card_image_url(listing, config);
    let canonical = config.canonical_url(&listing.id);
    let redirect = format!(
        "window.location.replace({});",
        serde_json::to_string(&shell::redirect_target(
            &config.app_detail_path,
            Some(&listing.id)
        ))
        .unwrap_or_else(|_| "\"/\"".to_string())
    );

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
                meta name="description" content=(description);

                // Open Graph (Facebook, WhatsApp)
                meta property="og:title" content=(format!("{} | {}", name, config.site_name));
                meta property="og:description" content=(description);
                meta property="og:image" content=(image);
                meta property="og:image:width" content=(CARD_IMAGE_WIDTH);
                meta property="og:image:height" content=(CARD_IMAGE_HEIGHT);
                meta property="og:url" content=(canonical);
                meta property="og:type" content="article";

                // Twitter Card
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(format!("{} | {}", name, config.site_name));
                meta name="twitter:description" content=(description);
                meta name="twitter:image" content=(image);

                // Explicit icon tags for messenger apps
                link rel="icon" href=(config.icon_url) sizes="48x48";
                link rel="apple-touch-icon" href=(config.icon_url);
            }
            body {
                h1 { (name) }
                p { (description) }
                img src=(image) alt=(name);
                script { (PreEscaped(redirect)) }
            }
        }
    }
}

/// The meta block spliced into the app shell for search crawlers.
///
/// The splice retains the shell's closing script tag (see
/// [`shell::inject_meta`]), so this block ends with a bare opening
/// `<script>` to pair with it.
pub fn injected_meta_tags(listing: &Listing, config: &Config) -> String {
    let name = listing.display_name();
    let title = format!("{} | {}", name, config.site_name);
    let description = compose_description(listing, &config.site_name);
    let image = card_image_url(listing, config);
    let canonical = config.canonical_url(&listing.id);

    let markup = html! {
        title { (title) }
        link rel="canonical" href=(canonical);
        meta name="description" content=(description);
        meta property="og:title" content=(title);
        meta property="og:description" content=(description);
        meta property="og:image" content=(image);
        meta property="og:url" content=(canonical);
    };

    let mut block = markup.into_string();
    block.push_str("<script>");
    block
}
