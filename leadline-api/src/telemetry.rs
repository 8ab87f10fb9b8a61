//! Tracing Setup and Request Instrumentation
//!
//! Structured logging via `tracing-subscriber`, with an optional JSON
//! formatter for log shippers, plus an Axum middleware that wraps every
//! request in a span and logs its completion with method, route, status,
//! and latency.

use crate::error::{ApiError, ApiResult};
use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Logging configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on the startup log line.
    pub service_name: String,

    /// Environment (production, staging, development).
    pub environment: String,

    /// Emit JSON-formatted log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: std::env::var("LEADLINE_SERVICE_NAME")
                .unwrap_or_else(|_| "leadline-api".to_string()),
            environment: std::env::var("LEADLINE_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            json_logs: std::env::var("LEADLINE_LOG_JSON")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }
}

// ============================================================================
// SUBSCRIBER INITIALIZATION
// ============================================================================

/// Initialize the global tracing subscriber.
///
/// Call once at startup before anything logs. The filter comes from
/// `RUST_LOG` when set, otherwise a development default that keeps our own
/// crates at debug and everything else at info.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("leadline_api=debug,tower_http=debug,info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;
    }

    tracing::info!(
        service_name = config.service_name,
        environment = config.environment,
        json_logs = config.json_logs,
        "telemetry initialized"
    );

    Ok(())
}

// ============================================================================
// REQUEST INSTRUMENTATION MIDDLEWARE
// ============================================================================

/// Axum middleware that instruments every request.
///
/// Wraps the handler in an `http_request` span and logs completion with the
/// matched route template (falling back to the raw path for unrouted
/// requests), so IDs in paths do not fan out the route label.
pub async fn request_observability(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %route,
    );

    let response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        route = %route,
        status = status.as_u16(),
        duration_ms = duration.as_millis(),
        "request completed"
    );

    response
}

// ============================================================================
// TESTS
// ============================================================================
