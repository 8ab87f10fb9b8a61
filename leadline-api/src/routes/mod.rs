//! REST API Routes Module
//!
//! This module contains all route handlers organized by resource.
//!
//! Includes:
//! - Lead listing, detail, and tag aggregation
//! - Import job status, cancellation, and per-job lead pages
//! - Telephony provider webhooks (call lifecycle)
//! - Meeting recording listing and the call recording proxy
//! - Sales scoreboard aggregates
//! - Dialer token issuance and user profile
//! - Health check endpoints (Kubernetes-compatible)
//! - CORS support for the browser dashboard

pub mod dialer;
pub mod health;
pub mod import_job;
pub mod lead;
pub mod recording;
pub mod scoreboard;
pub mod user;
pub mod webhooks;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::AuthConfig;
use crate::config::{ApiConfig, TwilioConfig};
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::telemetry::request_observability;
use crate::telephony::TwilioClient;

// Re-export route creation functions for convenience
pub use dialer::create_router as dialer_router;
pub use health::create_router as health_router;
pub use import_job::create_router as import_job_router;
pub use lead::create_router as lead_router;
pub use recording::create_router as recording_router;
pub use scoreboard::create_router as scoreboard_router;
pub use user::create_router as user_router;
pub use webhooks::create_router as webhooks_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// PRODUCTION VALIDATION
// ============================================================================

/// Validate API configuration for production use.
///
/// Production needs explicit CORS origins and a publicly reachable base URL,
/// since the provider must be able to call the webhook endpoints back.
fn validate_api_config_for_production(config: &ApiConfig) -> ApiResult<()> {
    if config.cors_origins.is_empty() {
        return Err(ApiError::invalid_input(
            "CORS origins not configured for production. Set LEADLINE_CORS_ORIGINS.",
        ));
    }
    if config.app_base_url.contains("localhost") || config.app_base_url.contains("127.0.0.1") {
        return Err(ApiError::invalid_input(
            "LEADLINE_APP_BASE_URL points at localhost; provider callbacks cannot reach it.",
        ));
    }
    Ok(())
}

// ============================================================================
// API ROUTER BUILDER
// ============================================================================

/// Builder for the API router with the full security stack.
///
/// Routes under /api/v1 go through:
/// 1. CORS layer
/// 2. Observability middleware
/// 3. Session token authentication
///
/// Provider webhooks and health checks are mounted outside the auth
/// middleware; the provider does not carry our bearer tokens.
pub struct ApiRouterBuilder {
    db: DbClient,
    twilio: TwilioClient,
    twilio_config: TwilioConfig,
    api_config: ApiConfig,
    auth_state: AuthMiddlewareState,
}

impl ApiRouterBuilder {
    /// Create a new ApiRouterBuilder.
    ///
    /// In production environments this validates that security and callback
    /// configuration are usable, and refuses to start otherwise.
    pub fn new(
        db: DbClient,
        twilio_config: TwilioConfig,
        api_config: ApiConfig,
        auth_config: AuthConfig,
    ) -> ApiResult<Self> {
        let is_production = api_config.is_production();
        auth_config.validate_for_production(is_production)?;
        if is_production {
            validate_api_config_for_production(&api_config)?;
        }

        let twilio = TwilioClient::new(twilio_config.clone())?;
        let auth_state = AuthMiddlewareState::new(db.clone(), auth_config);

        Ok(Self {
            db,
            twilio,
            twilio_config,
            api_config,
            auth_state,
        })
    }

    /// Build the resource routes (require authentication).
    fn build_entity_routes(&self) -> Router {
        Router::new()
            .nest("/leads", lead::create_router(self.db.clone()))
            .nest("/import-jobs", import_job::create_router(self.db.clone()))
            .nest(
                "/recordings",
                recording::create_router(self.db.clone(), self.twilio.clone()),
            )
            .nest(
                "/calls",
                recording::create_call_router(self.db.clone(), self.twilio.clone()),
            )
            .nest("/scoreboard", scoreboard::create_router(self.db.clone()))
            .nest("/dialer", dialer::create_router(self.twilio.clone()))
            .nest("/users", user::create_router())
    }

    /// Build the complete router.
    ///
    /// # Middleware Order (outer to inner)
    /// 1. CORS (outermost) - handles preflight requests
    /// 2. Observability - request spans and completion logs
    /// 3. Auth (innermost, only on /api/v1/*) - validates session tokens
    pub fn build(self) -> ApiResult<Router> {
        // Protected API routes (auth required)
        let api_routes = self
            .build_entity_routes()
            .layer(from_fn_with_state(self.auth_state.clone(), auth_middleware));

        #[allow(unused_mut)]
        let mut router = Router::new()
            .nest("/api/v1", api_routes)
            // Provider webhooks (no session auth - the provider calls these)
            .nest(
                "/webhooks",
                webhooks::create_router(
                    self.db.clone(),
                    Arc::new(self.api_config.clone()),
                    self.twilio_config.caller_id.clone(),
                ),
            )
            // Health checks (no auth required)
            .nest("/health", health::create_router(self.db.clone()));

        // OpenAPI spec
        #[cfg(feature = "openapi")]
        {
            router = router.route("/openapi.json", axum::routing::get(openapi_json));
        }

        // Build CORS layer
        let cors = build_cors_layer(&self.api_config);

        // Apply layers (outer to inner in code = inner to outer in execution)
        // Execution order: CORS -> Observability -> Auth -> Handler
        Ok(router.layer(from_fn(request_observability)).layer(cors))
    }
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricting to configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

// ============================================================================
// ROUTER ENTRY POINTS
// ============================================================================

/// Create the complete API router with all routes and authentication.
///
/// - REST routes under /api/v1/* (session token required)
/// - Provider webhooks at /webhooks/* (public)
/// - Health checks at /health/* (public)
/// - OpenAPI spec at /openapi.json
pub fn create_api_router(
    db: DbClient,
    twilio_config: TwilioConfig,
    api_config: &ApiConfig,
    auth_config: AuthConfig,
) -> ApiResult<Router> {
    ApiRouterBuilder::new(db, twilio_config, api_config.clone(), auth_config)
        .and_then(|builder| builder.build())
}

/// Create an API router with a fixed development identity instead of
/// session token validation.
///
/// **WARNING**: Only for testing and local development. Every request runs
/// as a synthetic admin user, so role gates behave as if an admin called.
#[cfg(any(test, feature = "dev"))]
pub fn create_api_router_unauthenticated(
    db: DbClient,
    twilio_config: TwilioConfig,
    api_config: &ApiConfig,
) -> ApiResult<Router> {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Inject a synthetic admin identity the way the auth middleware would.
    async fn inject_dev_identity(mut request: Request, next: Next) -> Response {
        let identity = crate::auth::AuthContext {
            user_id: uuid::Uuid::nil(),
            provider_uid: uuid::Uuid::nil(),
            role: leadline_core::UserRole::Admin,
            email: "dev@leadline.local".to_string(),
            first_name: None,
            last_name: None,
        };
        request.extensions_mut().insert(identity);
        next.run(request).await
    }

    let twilio = TwilioClient::new(twilio_config.clone())?;

    let api_routes = Router::new()
        .nest("/leads", lead::create_router(db.clone()))
        .nest("/import-jobs", import_job::create_router(db.clone()))
        .nest("/recordings", recording::create_router(db.clone(), twilio.clone()))
        .nest("/calls", recording::create_call_router(db.clone(), twilio.clone()))
        .nest("/scoreboard", scoreboard::create_router(db.clone()))
        .nest("/dialer", dialer::create_router(twilio.clone()))
        .nest("/users", user::create_router())
        .layer(from_fn(inject_dev_identity));

    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .nest(
            "/webhooks",
            webhooks::create_router(
                db.clone(),
                Arc::new(api_config.clone()),
                twilio_config.caller_id.clone(),
            ),
        )
        .nest("/health", health::create_router(db.clone()));

    #[cfg(feature = "openapi")]
    {
        router = router.route("/openapi.json", axum::routing::get(openapi_json));
    }

    let cors = build_cors_layer(api_config);

    Ok(router.layer(from_fn(request_observability)).layer(cors))
}
