//! Request/response bodies and the generated-content value.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which content modules the caller wants generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentModule {
    Social,
    Listing,
    All,
}

/// The full content bundle handed back to the caller.
///
/// Produced either by the AI call or by the fallback synthesizer; every
/// required string field is populated before it leaves the kernel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentBundle {
    pub property_title: String,
    pub property_summary: String,
    pub instagram: String,
    pub linkedin: String,
    pub tiktok: String,
    pub mls_description: String,
    pub email_blast: String,
    pub marketing_headline: String,
    pub features: Vec<String>,

    // Listing-kind extras, absent on the social path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood_highlights: Option<Vec<String>>,
}

/// One scraped listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedListing {
    pub url: String,
    pub markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// `POST /api/generate` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "manualText")]
    pub manual_text: Option<String>,
    #[serde(default = "default_modules")]
    pub modules: Vec<ContentModule>,
}

fn default_modules() -> Vec<ContentModule> {
    vec![ContentModule::All]
}

/// `POST /api/generate` success body.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: ContentBundle,
    pub modules: Vec<ContentModule>,
    #[serde(rename = "scrapedData", skip_serializing_if = "Option::is_none")]
    pub scraped_data: Option<ScrapedListing>,
}

/// Error envelope for failed generation calls.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "serviceStatus")]
    pub service_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "fallbackAvailable")]
    pub fallback_available: bool,
}

/// `POST /api/fallback` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackRequest {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default, rename = "propertyData")]
    pub property_data: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<crate::kernel::fallback_content::FallbackKind>,
    #[serde(default)]
    pub modules: Option<Vec<ContentModule>>,
}

/// `POST /api/fallback` response body.
#[derive(Debug, Serialize)]
pub struct FallbackResponse {
    pub success: bool,
    pub data: ContentBundle,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}
