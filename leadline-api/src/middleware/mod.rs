//! Middleware modules for the Leadline API
//!
//! - `auth`: bearer session token validation and internal user resolution
//!
//! # Middleware Order
//!
//! The auth layer applies to the `/api/v1` router only; telephony webhooks
//! under `/webhooks` are mounted outside it because the provider cannot send
//! a session token. The request trace layer (see `telemetry`) wraps both, so
//! rejected requests still produce a request span.

mod auth;

pub use auth::{auth_middleware, AuthExtractor, AuthMiddlewareState};
