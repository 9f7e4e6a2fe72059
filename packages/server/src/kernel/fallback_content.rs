//! Deterministic fallback content synthesis.
//!
//! When the AI provider is down or unconfigured, the app still has to
//! hand back a complete, renderable content bundle. This module builds
//! one from the raw input text alone: fixed-length excerpts interpolated
//! into hard-coded templates. No I/O, no external calls, no failure mode.
//!
//! Note: `features` is always the fixed literal list here; it does not
//! run the regex-based extraction in `property.rs`. The two paths are
//! intentionally independent.

use serde::{Deserialize, Serialize};

use crate::common::ContentBundle;

/// Which shape of fallback bundle to synthesize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    #[default]
    Social,
    Listing,
}

const INSTAGRAM_EXCERPT_CHARS: usize = 150;
const SUMMARY_EXCERPT_CHARS: usize = 200;
const LONGFORM_EXCERPT_CHARS: usize = 300;

const FIXED_FEATURES: [&str; 3] = ["Beautiful Property", "Prime Location", "Excellent Features"];

const NEIGHBORHOOD_HIGHLIGHTS: [&str; 3] = [
    "Convenient Location",
    "Established Neighborhood",
    "Close to Amenities",
];

/// First `max_chars` characters of `input`.
fn excerpt(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}

/// Synthesize a complete content bundle from raw input text.
///
/// Every required string field is non-empty for any input, including the
/// empty string, because static template text surrounds each excerpt.
pub fn generate_fallback(input: &str, kind: FallbackKind) -> ContentBundle {
    // Summary must be non-empty even for empty input; the other fields
    // get that for free from their surrounding template text.
    let property_summary = if input.trim().is_empty() {
        "Contact us for full property details.".to_string()
    } else if input.chars().count() > SUMMARY_EXCERPT_CHARS {
        format!("{}...", excerpt(input, SUMMARY_EXCERPT_CHARS))
    } else {
        input.to_string()
    };

    let instagram = format!(
        "✨ Just Listed! ✨\n\n{}\n\n📍 Don't miss this one - book your private showing today!\n\n#JustListed #RealEstate #DreamHome #NewListing #HouseHunting",
        excerpt(input, INSTAGRAM_EXCERPT_CHARS)
    );

    let linkedin = format!(
        "New listing announcement.\n\n{}\n\nReach out today to arrange a tour or request the full property details.",
        excerpt(input, SUMMARY_EXCERPT_CHARS)
    );

    let tiktok = format!(
        "🏡 POV: you just found the one...\n\n{}\n\nComment \"TOUR\" and we'll send you the details! 🔑",
        excerpt(input, INSTAGRAM_EXCERPT_CHARS)
    );

    let mls_description = format!(
        "{} Contact the listing agent for complete details and to arrange a private showing. Offered subject to errors, omissions, and prior sale.",
        excerpt(input, LONGFORM_EXCERPT_CHARS)
    );

    let email_blast = format!(
        "Subject: New Listing Alert - Schedule Your Showing\n\nHello,\n\nA property just hit the market that deserves your attention:\n\n{}\n\nReply to this email or call us to book a private tour before it's gone.\n\nBest regards,\nYour Real Estate Team",
        excerpt(input, LONGFORM_EXCERPT_CHARS)
    );

    let mut bundle = ContentBundle {
        property_title: "Featured Property Listing".to_string(),
        property_summary,
        instagram,
        linkedin,
        tiktok,
        mls_description,
        email_blast,
        marketing_headline: "Your Next Home Awaits".to_string(),
        features: FIXED_FEATURES.iter().map(|f| f.to_string()).collect(),
        property_description: None,
        key_features: None,
        neighborhood_highlights: None,
    };

    if kind == FallbackKind::Listing {
        bundle.property_description = Some(input.to_string());
        bundle.key_features = Some(
            input
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .take(5)
                .map(str::to_string)
                .collect(),
        );
        bundle.neighborhood_highlights = Some(
            NEIGHBORHOOD_HIGHLIGHTS.iter().map(|h| h.to_string()).collect(),
        );
        // Listing callers want the raw text as the MLS body; keep the
        // template when there is nothing to substitute.
        if !input.trim().is_empty() {
            bundle.mls_description = input.to_string();
        }
    }

    bundle
}
