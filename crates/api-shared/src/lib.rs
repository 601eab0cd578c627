//! # API Shared
//!
//! Shared utilities and definitions for the registry APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module)
//! - Session token issuing and verification (`auth` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the `agnos` CLI.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{AuthError, Claims, TokenSigner};
pub use health::{HealthRes, HealthService};
