//! Regex-heuristic property field extraction.
//!
//! Pulls price, beds, baths, square footage, address, and feature
//! phrases out of scraped listing text. Heuristics only; a field that
//! doesn't match stays `None`. This is the content-driven extraction
//! path; the fallback synthesizer deliberately does not use it.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // $450,000 or $1,250,000.00
    static ref PRICE_REGEX: Regex = Regex::new(
        r"\$\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\$\d{4,}"
    ).unwrap();

    static ref BEDS_REGEX: Regex = Regex::new(
        r"(?i)\b(\d+)\s*(?:bed(?:room)?s?|br)\b"
    ).unwrap();

    // Allows half baths: 2.5 baths
    static ref BATHS_REGEX: Regex = Regex::new(
        r"(?i)\b(\d+(?:\.\d)?)\s*(?:bath(?:room)?s?|ba)\b"
    ).unwrap();

    static ref SQFT_REGEX: Regex = Regex::new(
        r"(?i)\b(\d{1,3}(?:,\d{3})*|\d+)\s*(?:sq\.?\s*ft\.?|sqft|square\s+feet)\b"
    ).unwrap();

    // Street address: number + capitalized words + street suffix
    static ref ADDRESS_REGEX: Regex = Regex::new(
        r"\b\d+\s+(?:[A-Z][A-Za-z]*\.?\s+)+(?:Street|St|Avenue|Ave|Road|Rd|Drive|Dr|Lane|Ln|Boulevard|Blvd|Court|Ct|Place|Pl|Way|Terrace|Ter|Circle|Cir)\b"
    ).unwrap();
}

/// Amenity phrases worth surfacing as features, checked case-insensitively.
const FEATURE_PHRASES: [&str; 12] = [
    "granite countertops",
    "hardwood floors",
    "stainless steel appliances",
    "updated kitchen",
    "walk-in closet",
    "fireplace",
    "fenced yard",
    "finished basement",
    "central air",
    "two car garage",
    "swimming pool",
    "mountain view",
];

/// Property facts extracted from listing text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropertyFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub features: Vec<String>,
}

impl PropertyFacts {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
            && self.beds.is_none()
            && self.baths.is_none()
            && self.square_feet.is_none()
            && self.address.is_none()
            && self.features.is_empty()
    }
}

/// Extract property facts from free-form listing text.
pub fn extract_property_facts(text: &str) -> PropertyFacts {
    let price = PRICE_REGEX.find(text).map(|m| m.as_str().to_string());

    let beds = BEDS_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let baths = BATHS_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let square_feet = SQFT_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok());

    let address = ADDRESS_REGEX.find(text).map(|m| m.as_str().to_string());

    let lower = text.to_lowercase();
    let features = FEATURE_PHRASES
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| title_case(phrase))
        .collect();

    PropertyFacts {
        price,
        beds,
        baths,
        square_feet,
        address,
        features,
    }
}

fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
