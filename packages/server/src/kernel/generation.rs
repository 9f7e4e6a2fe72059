//! Content generation orchestration.
//!
//! Drives listing text acquisition (manual input or scrape), property
//! fact extraction, and the AI call. AI failures are categorized; only
//! retryable categories get another attempt, and the caller is told when
//! template fallback content is the right degradation path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use openai_client::OpenAIClient;
use serde::Serialize;
use tracing::{info, warn};

use crate::common::{ContentBundle, ContentModule, ScrapedListing};
use crate::kernel::fallback_content::{generate_fallback, FallbackKind};
use crate::kernel::property::{extract_property_facts, PropertyFacts};
use crate::kernel::resilience::{
    categorize, delay, is_retryable_category, ResilienceConfig, DEFAULT_BASE_DELAY_MS,
};
use crate::kernel::traits::{BaseContentGenerator, BaseWebScraper};

/// Cap on listing text sent to the LLM.
const MAX_PROMPT_CHARS: usize = 8000;

const SYSTEM_PROMPT: &str = "You are an expert real estate marketing copywriter. \
Given raw listing text, produce polished marketing content. Stay factual: never \
invent prices, room counts, or addresses that are not in the listing text.";

/// Where the returned bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Ai,
    Fallback,
}

/// Result of one orchestrated generation run.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub bundle: ContentBundle,
    pub scraped: Option<ScrapedListing>,
    pub facts: PropertyFacts,
    pub source: ContentSource,
    pub retry_count: u32,
}

/// Terminal generation failure plus the retries spent before giving up.
#[derive(Debug)]
pub struct GenerateFailure {
    pub error: anyhow::Error,
    pub retry_count: u32,
}

impl From<anyhow::Error> for GenerateFailure {
    fn from(error: anyhow::Error) -> Self {
        Self {
            error,
            retry_count: 0,
        }
    }
}

/// OpenAI-backed implementation of [`BaseContentGenerator`].
pub struct OpenAIContentGenerator {
    client: OpenAIClient,
    model: String,
}

impl OpenAIContentGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn user_prompt(listing_text: &str, module: ContentModule) -> String {
        let focus = match module {
            ContentModule::Social => "Focus on the social captions (instagram, linkedin, tiktok).",
            ContentModule::Listing => "Focus on the MLS description and key property details.",
            ContentModule::All => "Give every field equal care.",
        };
        let text: String = listing_text.chars().take(MAX_PROMPT_CHARS).collect();
        format!(
            "{}\n\nListing text:\n---\n{}\n---\n\nFill in every field of the response schema.",
            focus, text
        )
    }
}

#[async_trait]
impl BaseContentGenerator for OpenAIContentGenerator {
    async fn generate(&self, listing_text: &str, module: ContentModule) -> Result<ContentBundle> {
        let start = std::time::Instant::now();

        let bundle: ContentBundle = self
            .client
            .extract(
                &self.model,
                SYSTEM_PROMPT,
                Self::user_prompt(listing_text, module),
            )
            .await
            .context("AI service request failed")?;

        info!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "AI content generation complete"
        );

        Ok(bundle)
    }
}

/// Orchestrates scrape, parse, AI generation, and degradation.
pub struct ContentOrchestrator {
    scraper: Arc<dyn BaseWebScraper>,
    /// Absent when no API key is configured; generation then degrades to
    /// template fallback content.
    generator: Option<Arc<dyn BaseContentGenerator>>,
    config: ResilienceConfig,
}

impl ContentOrchestrator {
    pub fn new(
        scraper: Arc<dyn BaseWebScraper>,
        generator: Option<Arc<dyn BaseContentGenerator>>,
        config: ResilienceConfig,
    ) -> Self {
        Self {
            scraper,
            generator,
            config,
        }
    }

    pub fn has_ai(&self) -> bool {
        self.generator.is_some()
    }

    /// Run one generation request end to end.
    ///
    /// Exactly one of `url` / `manual_text` drives text acquisition;
    /// manual text wins when both are present.
    pub async fn generate(
        &self,
        url: Option<&str>,
        manual_text: Option<&str>,
        module: ContentModule,
    ) -> Result<GenerateOutcome, GenerateFailure> {
        let (text, scraped) = match manual_text.filter(|t| !t.trim().is_empty()) {
            Some(text) => (text.to_string(), None),
            None => {
                let url = match url {
                    Some(u) => u,
                    None => {
                        return Err(
                            anyhow!("Either a listing URL or manual text is required").into()
                        )
                    }
                };
                let listing = self.scraper.scrape(url).await?;
                (listing.markdown.clone(), Some(listing))
            }
        };

        let facts = extract_property_facts(&text);
        let kind = fallback_kind(module);

        let generator = match &self.generator {
            Some(generator) => generator,
            None => {
                info!("AI capability not configured, serving template content");
                return Ok(GenerateOutcome {
                    bundle: generate_fallback(&text, kind),
                    scraped,
                    facts,
                    source: ContentSource::Fallback,
                    retry_count: 0,
                });
            }
        };

        let mut attempt = 0;
        loop {
            match generator.generate(&text, module).await {
                Ok(mut bundle) => {
                    backfill(&mut bundle, &text, kind);
                    return Ok(GenerateOutcome {
                        bundle,
                        scraped,
                        facts,
                        source: ContentSource::Ai,
                        retry_count: attempt,
                    });
                }
                Err(err) => {
                    let message = format!("{:#}", err);
                    let category = categorize(&message, None);
                    if attempt < self.config.max_retries && is_retryable_category(&category) {
                        let wait_ms = delay(attempt, DEFAULT_BASE_DELAY_MS);
                        warn!(
                            error = %message,
                            attempt = attempt,
                            wait_ms = wait_ms,
                            "AI generation failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(GenerateFailure {
                        error: err,
                        retry_count: attempt,
                    });
                }
            }
        }
    }
}

fn fallback_kind(module: ContentModule) -> FallbackKind {
    match module {
        ContentModule::Listing => FallbackKind::Listing,
        ContentModule::Social | ContentModule::All => FallbackKind::Social,
    }
}

/// Fill any empty required field from the template synthesizer so the
/// bundle leaves the kernel fully populated.
fn backfill(bundle: &mut ContentBundle, text: &str, kind: FallbackKind) {
    let needs_backfill = bundle.property_title.is_empty()
        || bundle.property_summary.is_empty()
        || bundle.instagram.is_empty()
        || bundle.linkedin.is_empty()
        || bundle.tiktok.is_empty()
        || bundle.mls_description.is_empty()
        || bundle.email_blast.is_empty()
        || bundle.marketing_headline.is_empty()
        || bundle.features.is_empty();

    if !needs_backfill {
        return;
    }

    let filler = generate_fallback(text, kind);
    let fill = |field: &mut String, replacement: String| {
        if field.is_empty() {
            *field = replacement;
        }
    };

    fill(&mut bundle.property_title, filler.property_title);
    fill(&mut bundle.property_summary, filler.property_summary);
    fill(&mut bundle.instagram, filler.instagram);
    fill(&mut bundle.linkedin, filler.linkedin);
    fill(&mut bundle.tiktok, filler.tiktok);
    fill(&mut bundle.mls_description, filler.mls_description);
    fill(&mut bundle.email_blast, filler.email_blast);
    fill(&mut bundle.marketing_headline, filler.marketing_headline);
    if bundle.features.is_empty() {
        bundle.features = filler.features;
    }
}
