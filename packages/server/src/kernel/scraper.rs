//! Listing page scraper - HTTP fetch plus HTML to Markdown reduction.
//!
//! - reqwest for the fetch, routed through the retry executor
//! - scraper crate for CSS-selector content extraction
//! - htmd for HTML to Markdown conversion
//!
//! No JavaScript rendering; listing pages that require it surface as
//! scraping errors and the caller falls back to manual input.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::common::ScrapedListing;
use crate::kernel::resilience::{retry_with_backoff, RequestSpec, RetryPolicy};

use super::traits::BaseWebScraper;

/// Scraper for single listing pages.
pub struct ListingScraper {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl ListingScraper {
    pub fn new(retry_policy: RetryPolicy) -> Result<Self> {
        // Browser-like headers; listing portals reject obvious bots
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry_policy,
        })
    }

    /// Fetch raw HTML, retrying transient failures.
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let spec = RequestSpec::get(url);
        let response = retry_with_backoff(&self.client, &spec, &self.retry_policy)
            .await
            .with_context(|| format!("Unable to scrape {}", url))?;

        response.text().await.context("Failed to read response body")
    }

    fn extract_title(document: &Html) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;
        document
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Find the listing content region, preferring listing-specific
    /// containers before generic ones.
    fn extract_listing_content(document: &Html) -> String {
        let content_selectors = [
            "[class*='property-details']",
            "[class*='listing-detail']",
            "[data-testid*='description']",
            "main",
            "article",
            "#content",
            ".content",
        ];

        for selector_str in content_selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(region) = document.select(&selector).next() {
                    return region.html();
                }
            }
        }

        // Fall back to the body minus boilerplate
        if let Ok(body_selector) = Selector::parse("body") {
            if let Some(body) = document.select(&body_selector).next() {
                return Self::strip_boilerplate(&body.html());
            }
        }

        document.html()
    }

    fn strip_boilerplate(html: &str) -> String {
        let document = Html::parse_document(html);
        let unwanted = [
            "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe",
            ".navbar", ".footer", ".sidebar", ".ads",
        ];

        let mut result = html.to_string();
        for selector_str in unwanted {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    result = result.replace(&element.html(), "");
                }
            }
        }
        result
    }

    fn html_to_markdown(html: &str) -> String {
        htmd::convert(html).unwrap_or_else(|_| {
            // Strip tags and keep plain text
            let document = Html::parse_document(html);
            document.root_element().text().collect::<String>()
        })
    }

    /// Add https:// when the scheme is missing.
    fn normalize_url(url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }
}

#[async_trait]
impl BaseWebScraper for ListingScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedListing> {
        let url = Self::normalize_url(url);
        debug!(url = %url, "Scraping listing page");

        let html = self.fetch_html(&url).await?;
        let document = Html::parse_document(&html);

        let title = Self::extract_title(&document);
        let content = Self::extract_listing_content(&document);
        let markdown = Self::html_to_markdown(&content);

        if markdown.trim().len() < 100 {
            warn!(url = %url, "Listing page has minimal content");
        }

        Ok(ScrapedListing {
            url,
            markdown,
            title,
        })
    }
}
