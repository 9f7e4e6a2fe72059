//! HTTP server: application wiring and route handlers.

pub mod app;
pub mod routes;

pub use app::{build_app, AppDeps, AppState};
