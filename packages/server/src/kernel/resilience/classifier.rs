//! Error categorization for failed outbound calls.
//!
//! The classifier is advisory: it never fails, and the flags it produces
//! are independent (several can be true for one error). Callers use the
//! first-match-wins helpers below to pick a severity, user message, and
//! retry advice from the flags.

use std::fmt;

/// Transport kind string for a request that hit its deadline.
pub const TIMEOUT_KIND: &str = "TimedOut";
/// Transport kind string for a connection-level failure.
pub const CONNECT_KIND: &str = "Connect";

/// Phrases that signal the scraping provider failed or was blocked.
const SCRAPING_PHRASES: [&str; 3] = [
    "Web scraping service unavailable",
    "Unable to scrape",
    "block automated access",
];

/// Phrases that signal the provider itself is down or out of budget.
const SERVICE_PHRASES: [&str; 4] = [
    "Service Unavailable",
    "temporarily unavailable",
    "quota",
    "billing",
];

const AI_PHRASES: [&str; 2] = ["OpenAI", "AI service"];

/// Independent boolean categories derived from one caught error.
///
/// All flags false means the error is unclassified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCategory {
    pub is_scraping_error: bool,
    pub is_timeout_error: bool,
    pub is_service_error: bool,
    pub is_ai_error: bool,
    pub is_network_error: bool,
}

/// Categorize an error message plus optional transport kind.
///
/// All checks are case-sensitive substring tests against the literal
/// message; the `kind` strings come from [`kind_of`].
pub fn categorize(message: &str, kind: Option<&str>) -> ErrorCategory {
    ErrorCategory {
        is_scraping_error: SCRAPING_PHRASES.iter().any(|p| message.contains(p)),
        is_timeout_error: message.contains("timeout") || kind == Some(TIMEOUT_KIND),
        is_service_error: SERVICE_PHRASES.iter().any(|p| message.contains(p)),
        is_ai_error: AI_PHRASES.iter().any(|p| message.contains(p)),
        is_network_error: kind == Some(CONNECT_KIND),
    }
}

/// Derive the transport kind string for a `reqwest` error.
pub fn kind_of(err: &reqwest::Error) -> Option<&'static str> {
    if err.is_timeout() {
        Some(TIMEOUT_KIND)
    } else if err.is_connect() {
        Some(CONNECT_KIND)
    } else {
        None
    }
}

/// Categorize a `reqwest` error directly.
pub fn categorize_reqwest(err: &reqwest::Error) -> ErrorCategory {
    categorize(&err.to_string(), kind_of(err))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

type Predicate = fn(&ErrorCategory) -> bool;

/// Evaluate ordered (predicate, result) rules; the first hit wins.
fn first_match<T: Copy>(rules: &[(Predicate, T)], category: &ErrorCategory, fallback: T) -> T {
    rules
        .iter()
        .find(|(matches, _)| matches(category))
        .map(|(_, result)| *result)
        .unwrap_or(fallback)
}

/// Severity of a categorized error. Service errors dominate scraping
/// errors even when both flags are set.
pub fn severity(category: &ErrorCategory) -> Severity {
    let rules: [(Predicate, Severity); 2] = [
        (|c| c.is_service_error, Severity::High),
        (|c| c.is_scraping_error, Severity::Medium),
    ];
    first_match(&rules, category, Severity::Low)
}

/// User-facing message for a categorized error. Exactly one template per
/// branch, checked in the order scraping, timeout, service, AI, network.
pub fn user_message(category: &ErrorCategory) -> &'static str {
    let rules: [(Predicate, &'static str); 5] = [
        (
            |c| c.is_scraping_error,
            "We couldn't automatically read that listing page. Real estate sites often block automated access.",
        ),
        (
            |c| c.is_timeout_error,
            "The request took too long to complete. Please try again.",
        ),
        (
            |c| c.is_service_error,
            "The content service is temporarily unavailable. Please try again in a few minutes.",
        ),
        (
            |c| c.is_ai_error,
            "The AI writing service had trouble generating content. Instant template content is available instead.",
        ),
        (
            |c| c.is_network_error,
            "We couldn't reach the server. Check your connection and try again.",
        ),
    ];
    first_match(
        &rules,
        category,
        "Something went wrong while generating content. Please try again.",
    )
}

/// Short advice on whether retrying is worthwhile.
pub fn retry_advice(category: &ErrorCategory) -> &'static str {
    let rules: [(Predicate, &'static str); 5] = [
        (
            |c| c.is_scraping_error,
            "Paste the listing details manually instead of retrying the URL.",
        ),
        (
            |c| c.is_timeout_error,
            "Retry now; timeouts are usually transient.",
        ),
        (
            |c| c.is_service_error,
            "Wait a few minutes before retrying.",
        ),
        (
            |c| c.is_ai_error,
            "Use the instant template content; retrying is unlikely to help.",
        ),
        (
            |c| c.is_network_error,
            "Check your connection, then retry.",
        ),
    ];
    first_match(&rules, category, "Retry once; if it fails again, use manual input.")
}

/// Suggested next steps for the UI to render.
pub fn next_steps(category: &ErrorCategory) -> &'static [&'static str] {
    let rules: [(Predicate, &'static [&'static str]); 5] = [
        (
            |c| c.is_scraping_error,
            &[
                "Copy the listing description from the page",
                "Paste it into the manual input box",
                "Generate content from the pasted text",
            ],
        ),
        (
            |c| c.is_timeout_error,
            &["Try the same request again", "If it keeps timing out, use manual input"],
        ),
        (
            |c| c.is_service_error,
            &["Wait a few minutes", "Try again", "Use instant templates if it persists"],
        ),
        (
            |c| c.is_ai_error,
            &["Use the instant template content", "Try AI generation again later"],
        ),
        (
            |c| c.is_network_error,
            &["Check your internet connection", "Retry the request"],
        ),
    ];
    first_match(
        &rules,
        category,
        &["Try again", "Use manual input if the problem persists"],
    )
}

/// Whether the category warrants another attempt.
///
/// AI errors are deliberately excluded: an AI failure routes to fallback
/// content rather than another retry round.
pub fn is_retryable_category(category: &ErrorCategory) -> bool {
    category.is_scraping_error
        || category.is_timeout_error
        || category.is_service_error
        || category.is_network_error
}
