//! Leadline API - REST API Layer
//!
//! This crate provides the HTTP backend for the Leadline CRM dashboard.
//! It exposes REST endpoints (Axum) for the lead pipeline, CSV import
//! jobs, the browser dialer, the sales scoreboard, and the telephony
//! webhook surface that tracks calls, recordings, and transcriptions.
//!
//! Authenticated traffic lives under `/api/v1` behind bearer session
//! tokens; provider callbacks are mounted unauthenticated under
//! `/webhooks` and always acknowledge with 200 so the provider never
//! retries into a failing store.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod telemetry;
pub mod telephony;
pub mod twiml;
pub mod types;

// Re-export commonly used types
pub use auth::{
    bearer_token, validate_session_token, AuthConfig, AuthContext, JwtSecret, SessionClaims,
};
pub use config::{ApiConfig, TwilioConfig};
pub use db::{DbClient, DbConfig, LeadFilter, ScoreboardRow};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::{create_api_router, ApiRouterBuilder};
pub use telemetry::{init_tracing, request_observability, TelemetryConfig};
pub use telephony::{RecordingAudio, TwilioClient, VoiceToken};
pub use types::*;
