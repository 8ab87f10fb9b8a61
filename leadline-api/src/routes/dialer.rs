//! Dialer REST API Routes
//!
//! Issues the short-lived provider access token the browser dialer needs to
//! place calls. The token identity is the caller's internal user id, which
//! is how outbound webhook callbacks are later tied back to a rep.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};

use crate::{
    error::{ApiResult, ErrorBody},
    middleware::AuthExtractor,
    telephony::TwilioClient,
    types::DialerTokenResponse,
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/dialer/token - Mint a browser dialer access token
#[utoipa::path(
    post,
    path = "/api/v1/dialer/token",
    tag = "Dialer",
    responses(
        (status = 200, description = "Short-lived voice token", body = DialerTokenResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Voice credentials not configured", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn mint_token(
    State(twilio): State<TwilioClient>,
    AuthExtractor(auth): AuthExtractor,
) -> ApiResult<impl IntoResponse> {
    let identity = auth.user_id.to_string();
    let token = twilio.mint_voice_token(&identity)?;

    tracing::info!(user_id = %auth.user_id, "dialer token issued");

    Ok(Json(DialerTokenResponse {
        token: token.token,
        identity,
        expires_at: token.expires_at,
    }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the dialer routes router.
pub fn create_router(twilio: TwilioClient) -> Router {
    Router::new()
        .route("/token", post(mint_token))
        .with_state(twilio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TwilioConfig;
    use crate::error::ErrorCode;
    use axum::extract::State;
    use leadline_core::UserRole;

    fn bare_client() -> TwilioClient {
        TwilioClient::new(TwilioConfig::default()).expect("client builds without credentials")
    }

    fn rep() -> AuthExtractor {
        AuthExtractor(crate::auth::AuthContext {
            user_id: leadline_core::new_entity_id(),
            provider_uid: uuid::Uuid::now_v7(),
            role: UserRole::Rep,
            email: "rep@leadline.app".to_string(),
            first_name: None,
            last_name: None,
        })
    }

    #[tokio::test]
    async fn test_unconfigured_credentials_map_to_internal_error() {
        let result = mint_token(State(bare_client()), rep()).await;

        let err = result.err().expect("bare client cannot mint tokens");
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
