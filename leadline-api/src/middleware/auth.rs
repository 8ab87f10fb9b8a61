//! Axum Middleware for Authentication
//!
//! Validates the bearer session token on every request, resolves the
//! provider-side subject to an internal user row (including the legacy
//! auth id column), and injects [`AuthContext`] into request extensions.
//!
//! Failure mapping:
//! - missing, malformed, or expired token: 401
//! - token valid but no matching user row: 401
//! - user row found but deactivated: 403
//!
//! None of the rejections reveal whether a user row exists.

use crate::auth::{bearer_token, validate_session_token, AuthConfig, AuthContext};
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

// ============================================================================
// MIDDLEWARE STATE
// ============================================================================

/// Shared state for the authentication middleware.
///
/// Carries the verification settings and a database handle for resolving
/// the token subject to an internal user row.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub db: DbClient,
    pub auth_config: Arc<AuthConfig>,
}

impl AuthMiddlewareState {
    pub fn new(db: DbClient, auth_config: AuthConfig) -> Self {
        Self {
            db,
            auth_config: Arc::new(auth_config),
        }
    }
}

// ============================================================================
// MIDDLEWARE FUNCTION
// ============================================================================

/// Axum middleware that authenticates a request end to end.
///
/// 1. Extracts the `Authorization: Bearer` header
/// 2. Validates the session token signature, audience, and expiry
/// 3. Resolves the provider-side subject to an internal user row
/// 4. Rejects deactivated users with 403
/// 5. Injects [`AuthContext`] into request extensions on success
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use leadline_api::middleware::{auth_middleware, AuthMiddlewareState};
/// use leadline_api::{AuthConfig, DbClient};
///
/// let auth_state = AuthMiddlewareState::new(db, AuthConfig::from_env());
///
/// let app = Router::new()
///     .route("/api/v1/leads", axum::routing::get(|| async { "OK" }))
///     .layer(middleware::from_fn_with_state(auth_state.clone(), auth_middleware));
/// ```
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    // Token checks run before any database work.
    let token = bearer_token(auth_header)?;
    let claims = validate_session_token(&state.auth_config, token)?;
    let provider_uid = claims.provider_uid()?;

    let user = state
        .db
        .find_user_by_provider_id(provider_uid)
        .await?
        .ok_or_else(|| {
            tracing::debug!(
                provider_uid = %provider_uid,
                "session token valid but no matching user row"
            );
            ApiError::unauthorized("Unknown user")
        })?;

    if !user.is_active {
        tracing::debug!(user_id = %user.user_id, "rejected request from deactivated user");
        return Err(ApiError::forbidden("User account is inactive"));
    }

    request
        .extensions_mut()
        .insert(AuthContext::from_user(user, provider_uid));

    Ok(next.run(request).await)
}

// ============================================================================
// TYPED EXTRACTOR
// ============================================================================

/// Typed Axum extractor for the authentication context.
///
/// Implements `FromRequestParts` so handlers can require authentication in
/// their signature. The `auth_middleware` must be applied to the route for
/// this to succeed; without it the extractor rejects with a 500, which is a
/// wiring bug rather than a client error.
///
/// # Example
///
/// ```rust,no_run
/// use leadline_api::middleware::AuthExtractor;
///
/// async fn whoami(AuthExtractor(auth): AuthExtractor) -> String {
///     auth.email
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthExtractor(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthExtractor)
            .ok_or_else(|| {
                ApiError::internal_error(
                    "AuthContext missing from request extensions; auth middleware not applied",
                )
            })
    }
}

impl std::ops::Deref for AuthExtractor {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtSecret;
    use crate::db::DbConfig;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use leadline_core::UserRole;
    use tower::ServiceExt; // for `oneshot`
    use uuid::Uuid;

    /// Pool creation is lazy, so a dead address works for tests that are
    /// rejected before any query runs.
    fn dead_db() -> DbClient {
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DbConfig::default()
        };
        DbClient::from_config(&config).expect("pool should build without connecting")
    }

    fn test_auth_state() -> AuthMiddlewareState {
        let mut auth_config = AuthConfig::default();
        auth_config.jwt_secret = JwtSecret::new("test_secret".to_string());
        AuthMiddlewareState::new(dead_db(), auth_config)
    }

    fn test_app() -> Router {
        Router::new()
            .route("/protected", get(|| async { "Protected resource" }))
            .layer(middleware::from_fn_with_state(
                test_auth_state(),
                auth_middleware,
            ))
    }

    fn test_context() -> AuthContext {
        AuthContext {
            user_id: leadline_core::new_entity_id(),
            provider_uid: Uuid::now_v7(),
            role: UserRole::Rep,
            email: "rep@leadline.app".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Byron".to_string()),
        }
    }

    #[tokio::test]
    async fn test_request_without_token_is_unauthorized() -> Result<(), String> {
        let app = test_app();

        let request = Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_garbage_bearer_token_is_unauthorized() -> Result<(), String> {
        let app = test_app();

        let request = Request::builder()
            .uri("/protected")
            .header("authorization", "Bearer invalid.jwt.token")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() -> Result<(), String> {
        let app = test_app();

        let request = Request::builder()
            .uri("/protected")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_internal_error() -> Result<(), String> {
        async fn handler(AuthExtractor(auth): AuthExtractor) -> String {
            auth.email
        }

        // No auth layer applied: the extractor finds no context.
        let app = Router::new().route("/me", get(handler));

        let request = Request::builder()
            .uri("/me")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }

    #[tokio::test]
    async fn test_extractor_reads_injected_context() -> Result<(), String> {
        async fn handler(AuthExtractor(auth): AuthExtractor) -> String {
            auth.email
        }

        let app = Router::new()
            .route("/me", get(handler))
            .layer(Extension(test_context()));

        let request = Request::builder()
            .uri("/me")
            .body(Body::empty())
            .map_err(|e| e.to_string())?;

        let response = app
            .oneshot(request)
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| e.to_string())?;
        assert_eq!(&body[..], b"rep@leadline.app");
        Ok(())
    }
}
