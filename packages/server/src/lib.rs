// Listcast - listing marketing generator
//
// Backend for turning a listing URL or raw property text into social,
// MLS, and email marketing copy. Outbound calls to the scraping target
// and the LLM provider go through the resilience layer in kernel/.

pub mod common;
pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
