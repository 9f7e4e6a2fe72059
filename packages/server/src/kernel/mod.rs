//! Kernel module - server infrastructure and dependencies.

pub mod fallback_content;
pub mod generation;
pub mod health;
pub mod property;
pub mod resilience;
pub mod scraper;
pub mod test_dependencies;
pub mod traits;

pub use fallback_content::{generate_fallback, FallbackKind};
pub use generation::{
    ContentOrchestrator, ContentSource, GenerateFailure, GenerateOutcome, OpenAIContentGenerator,
};
pub use health::{
    aggregate, check_service_health, HealthMonitor, HealthState, OverallHealth, ServiceStatus,
    ServiceStatusTracker, SystemHealth,
};
pub use property::{extract_property_facts, PropertyFacts};
pub use resilience::{
    categorize, categorize_reqwest, delay, is_retryable_category, retry_with_backoff,
    ErrorCategory, RequestSpec, ResilienceConfig, RetryPolicy, ServiceErrorInfo, Severity,
};
pub use scraper::ListingScraper;
pub use traits::*;
