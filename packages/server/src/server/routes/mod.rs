pub mod fallback;
pub mod generate;
pub mod health;
pub mod status;

pub use fallback::fallback_handler;
pub use generate::generate_handler;
pub use health::{ai_health_handler, health_handler, scraping_health_handler};
pub use status::service_status_handler;
