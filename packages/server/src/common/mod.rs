//! Shared types used across the kernel and HTTP surface.

pub mod types;

pub use types::*;
