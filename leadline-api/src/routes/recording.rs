//! Recording REST API Routes
//!
//! Two surfaces share the provider client here: the meeting recording
//! listing for the dashboard, and the per-call audio proxy that streams a
//! call recording through the API so provider credentials never reach the
//! browser.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult, ErrorBody},
    middleware::AuthExtractor,
    telephony::TwilioClient,
    types::{RecordingListQuery, RecordingListResponse},
};
use leadline_core::EntityId;
use uuid::Uuid;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared state for recording routes.
#[derive(Clone)]
pub struct RecordingState {
    pub db: DbClient,
    pub twilio: TwilioClient,
}

impl RecordingState {
    pub fn new(db: DbClient, twilio: TwilioClient) -> Self {
        Self { db, twilio }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/recordings - List meeting recordings, newest first
#[utoipa::path(
    get,
    path = "/api/v1/recordings",
    tag = "Recordings",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of results (default 25, max 100)"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination"),
    ),
    responses(
        (status = 200, description = "One page of meeting recordings", body = RecordingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recordings(
    State(state): State<Arc<RecordingState>>,
    AuthExtractor(_auth): AuthExtractor,
    Query(params): Query<RecordingListQuery>,
) -> ApiResult<impl IntoResponse> {
    let (recordings, total) = state
        .db
        .list_meeting_recordings(params.limit(), params.offset())
        .await?;

    Ok(Json(RecordingListResponse { recordings, total }))
}

/// GET /api/v1/calls/{id}/recording - Stream a call recording's audio
///
/// Resolves the stored recording URL for the call and proxies the audio
/// bytes from the provider with Basic auth, so the browser only ever talks
/// to this API. A missing row or missing recording is 404, unconfigured
/// provider credentials are 500, and an upstream fetch failure is 502.
#[utoipa::path(
    get,
    path = "/api/v1/calls/{id}/recording",
    tag = "Recordings",
    params(
        ("id" = Uuid, Path, description = "Call ID")
    ),
    responses(
        (status = 200, description = "Audio bytes", body = Vec<u8>, content_type = "audio/mpeg"),
        (status = 404, description = "Call or recording not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Provider credentials not configured", body = ErrorBody),
        (status = 502, description = "Provider fetch failed", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn fetch_call_recording(
    State(state): State<Arc<RecordingState>>,
    AuthExtractor(_auth): AuthExtractor,
    Path(id): Path<EntityId>,
) -> ApiResult<impl IntoResponse> {
    let call = state
        .db
        .get_call(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Call", id))?;

    let recording_url = call
        .recording_url
        .as_deref()
        .ok_or_else(|| ApiError::not_found("Call has no recording"))?;

    let audio = state.twilio.fetch_recording(recording_url).await?;

    tracing::debug!(
        call_id = %call.call_id,
        bytes = audio.bytes.len(),
        content_type = %audio.content_type,
        "recording proxied"
    );

    Ok((
        [
            (header::CONTENT_TYPE, audio.content_type),
            (header::CONTENT_LENGTH, audio.bytes.len().to_string()),
        ],
        audio.bytes,
    ))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the meeting recording routes router.
pub fn create_router(db: DbClient, twilio: TwilioClient) -> Router {
    let state = Arc::new(RecordingState::new(db, twilio));

    Router::new()
        .route("/", get(list_recordings))
        .with_state(state)
}

/// Create the call-scoped recording proxy router (nested under /calls).
pub fn create_call_router(db: DbClient, twilio: TwilioClient) -> Router {
    let state = Arc::new(RecordingState::new(db, twilio));

    Router::new()
        .route("/:id/recording", get(fetch_call_recording))
        .with_state(state)
}
