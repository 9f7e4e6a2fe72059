//! Mock infrastructure implementations for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::common::{ContentBundle, ContentModule, ScrapedListing};

use super::traits::{BaseContentGenerator, BaseWebScraper};

/// A complete bundle for use as a canned AI response.
pub fn sample_bundle() -> ContentBundle {
    ContentBundle {
        property_title: "Sunlit Craftsman Near the Park".to_string(),
        property_summary: "Three bedroom craftsman with a wraparound porch.".to_string(),
        instagram: "Just listed: sunlit craftsman!".to_string(),
        linkedin: "New on the market: a three bedroom craftsman.".to_string(),
        tiktok: "POV: your dream porch".to_string(),
        mls_description: "Classic craftsman offering three bedrooms and period detail.".to_string(),
        email_blast: "Subject: Just Listed\n\nA craftsman worth a look.".to_string(),
        marketing_headline: "Character Meets Comfort".to_string(),
        features: vec!["Wraparound Porch".to_string(), "Hardwood Floors".to_string()],
        property_description: None,
        key_features: None,
        neighborhood_highlights: None,
    }
}

/// Scraper returning a fixed page for any URL.
pub struct StaticScraper {
    markdown: String,
}

impl StaticScraper {
    pub fn with_markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
        }
    }
}

#[async_trait]
impl BaseWebScraper for StaticScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedListing> {
        Ok(ScrapedListing {
            url: url.to_string(),
            markdown: self.markdown.clone(),
            title: Some("Test Listing".to_string()),
        })
    }
}

/// Scraper that always fails with a fixed message.
pub struct FailingScraper {
    message: String,
}

impl FailingScraper {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl BaseWebScraper for FailingScraper {
    async fn scrape(&self, _url: &str) -> Result<ScrapedListing> {
        Err(anyhow!(self.message.clone()))
    }
}

/// Generator returning a fixed bundle.
pub struct StaticGenerator {
    bundle: ContentBundle,
    calls: AtomicU32,
}

impl StaticGenerator {
    pub fn new(bundle: ContentBundle) -> Self {
        Self {
            bundle,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseContentGenerator for StaticGenerator {
    async fn generate(&self, _text: &str, _module: ContentModule) -> Result<ContentBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bundle.clone())
    }
}

/// Generator that always fails with a fixed message.
pub struct FailingGenerator {
    message: String,
    calls: AtomicU32,
}

impl FailingGenerator {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseContentGenerator for FailingGenerator {
    async fn generate(&self, _text: &str, _module: ContentModule) -> Result<ContentBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!(self.message.clone()))
    }
}

/// Generator that fails `fail_times` times, then succeeds.
pub struct FlakyGenerator {
    fail_times: u32,
    message: String,
    bundle: ContentBundle,
    calls: AtomicU32,
}

impl FlakyGenerator {
    pub fn new(fail_times: u32, message: impl Into<String>, bundle: ContentBundle) -> Self {
        Self {
            fail_times,
            message: message.into(),
            bundle,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseContentGenerator for FlakyGenerator {
    async fn generate(&self, _text: &str, _module: ContentModule) -> Result<ContentBundle> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            Err(anyhow!(self.message.clone()))
        } else {
            Ok(self.bundle.clone())
        }
    }
}
