//! # API Shared
//!
//! Shared utilities and definitions for the Materna APIs.
//!
//! Contains:
//! - Request/response types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the root runner for common functionality.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
