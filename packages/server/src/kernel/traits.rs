// Trait definitions for dependency injection
//
// Infrastructure traits only - business logic (prompts, templates) lives
// with the callers. Naming convention: Base* for trait names.

use anyhow::Result;
use async_trait::async_trait;

use crate::common::{ContentBundle, ContentModule, ScrapedListing};

#[async_trait]
pub trait BaseWebScraper: Send + Sync {
    /// Fetch one listing page and reduce it to markdown.
    async fn scrape(&self, url: &str) -> Result<ScrapedListing>;
}

#[async_trait]
pub trait BaseContentGenerator: Send + Sync {
    /// Produce a full content bundle from listing text.
    async fn generate(&self, listing_text: &str, module: ContentModule) -> Result<ContentBundle>;
}
