//! User REST API Routes
//!
//! Profile information for the authenticated caller. The auth middleware
//! has already resolved the internal user row, so this surface reads
//! straight from the request's [`AuthContext`].

use axum::{response::IntoResponse, routing::get, Json, Router};

use crate::{
    error::{ApiResult, ErrorBody},
    middleware::AuthExtractor,
    types::MeResponse,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/users/me - Get current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Authenticated user's profile", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(AuthExtractor(auth): AuthExtractor) -> ApiResult<impl IntoResponse> {
    Ok(Json(MeResponse::from(&auth)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the user routes router.
pub fn create_router() -> Router {
    Router::new().route("/me", get(get_current_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use leadline_core::UserRole;

    #[tokio::test]
    async fn test_me_reflects_auth_context() -> Result<(), String> {
        let context = AuthContext {
            user_id: leadline_core::new_entity_id(),
            provider_uid: uuid::Uuid::now_v7(),
            role: UserRole::Manager,
            email: "manager@leadline.app".to_string(),
            first_name: Some("Grace".to_string()),
            last_name: Some("Hopper".to_string()),
        };

        let response = get_current_user(AuthExtractor(context.clone()))
            .await
            .map_err(|e| e.message)?
            .into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| e.to_string())?;
        let me: MeResponse = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
        assert_eq!(me.user_id, context.user_id);
        assert_eq!(me.email, "manager@leadline.app");
        assert_eq!(me.role, UserRole::Manager);
        Ok(())
    }
}
