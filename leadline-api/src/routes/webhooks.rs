//! Telephony Provider Webhook Routes
//!
//! Form-encoded callbacks the provider POSTs over the life of a call:
//! dial control, status transitions, recordings, voicemail, and
//! transcription results. Every handler is keyed by the provider's
//! `CallSid` and updates at most one Call row; a SID we have no row for is
//! tolerated silently, since deliveries can outrun the insert.
//!
//! These endpoints answer success even when the update fails. The provider
//! retries non-2xx deliveries aggressively, and a retry storm against a
//! struggling database makes the outage worse. [`WebhookPolicy`] makes that
//! decision explicit and testable instead of burying it in the handlers.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::ApiConfig,
    db::DbClient,
    error::{ApiError, ApiResult},
    twiml,
    types::{
        parse_duration_secs, RecordingWebhookForm, StatusWebhookForm, TranscriptionWebhookForm,
        VoiceWebhookForm, VoicemailWebhookForm, WebhookAck,
    },
};
use leadline_core::{Call, CallDirection, CallStatus, EntityId, TranscriptionStatus};

/// Greeting spoken to inbound callers before the voicemail beep.
const VOICEMAIL_GREETING: &str =
    "Thank you for calling. No one is available right now. \
     Please leave a message after the beep.";

/// Spoken when the dialer posts a voice callback without a number to dial.
const MISSING_NUMBER_MESSAGE: &str = "No number was provided. Please try your call again.";

/// Spoken when call setup fails internally; the caller hears this instead
/// of a dropped connection.
const CALL_FAILED_MESSAGE: &str =
    "We are unable to place your call right now. Please try again later.";

// ============================================================================
// POLICY
// ============================================================================

/// Error-suppression policy for provider-facing handlers.
///
/// With `suppress_errors` set (the default), a failed handler logs the error
/// and still answers the provider's expected success response. Unset, errors
/// propagate as normal HTTP errors; tests use this to see the real failure.
#[derive(Debug, Clone, Copy)]
pub struct WebhookPolicy {
    pub suppress_errors: bool,
}

impl Default for WebhookPolicy {
    fn default() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}

impl WebhookPolicy {
    /// Apply the policy to a failed handler: log and substitute `fallback`,
    /// or let the error through.
    pub fn absorb(&self, handler: &'static str, err: ApiError, fallback: Response) -> Response {
        if self.suppress_errors {
            tracing::warn!(
                handler,
                code = ?err.code,
                message = %err.message,
                "webhook handler failed; acknowledging provider anyway"
            );
            fallback
        } else {
            err.into_response()
        }
    }
}

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub db: DbClient,
    pub api_config: Arc<ApiConfig>,
    /// Outbound caller id presented on dialed calls, when configured.
    pub caller_id: Option<String>,
    pub policy: WebhookPolicy,
}

impl WebhookState {
    pub fn new(db: DbClient, api_config: Arc<ApiConfig>, caller_id: Option<String>) -> Self {
        Self {
            db,
            api_config,
            caller_id,
            policy: WebhookPolicy::default(),
        }
    }
}

// ============================================================================
// RESPONSE HELPERS
// ============================================================================

/// Wrap a TwiML document in the content type the provider parses.
fn twiml_response(document: String) -> Response {
    ([(header::CONTENT_TYPE, "text/xml")], document).into_response()
}

/// The JSON acknowledgement non-TwiML handlers answer with.
fn ack() -> Response {
    Json(WebhookAck::received()).into_response()
}

/// Parse an entity id the dialer forwarded as a custom parameter.
fn parse_entity_id(value: Option<&str>) -> Option<EntityId> {
    value.and_then(|s| Uuid::parse_str(s.trim()).ok())
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /webhooks/voice - Dial control for outbound calls, voicemail for inbound
#[utoipa::path(
    post,
    path = "/webhooks/voice",
    tag = "Webhooks",
    request_body(content = VoiceWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML call instructions", body = String, content_type = "text/xml"),
    ),
)]
pub async fn voice(
    State(state): State<Arc<WebhookState>>,
    Form(form): Form<VoiceWebhookForm>,
) -> Response {
    match handle_voice(&state, form).await {
        Ok(response) => response,
        Err(err) => state
            .policy
            .absorb("voice", err, twiml_response(twiml::say(CALL_FAILED_MESSAGE))),
    }
}

async fn handle_voice(state: &WebhookState, form: VoiceWebhookForm) -> ApiResult<Response> {
    // Calls into the business number get the voicemail flow; the provider
    // reports these with an inbound direction.
    let inbound = form
        .direction
        .as_deref()
        .is_some_and(|d| d.to_ascii_lowercase().contains("inbound"));
    if inbound {
        let action = state.api_config.callback_url("/webhooks/voicemail");
        let transcribe = state.api_config.callback_url("/webhooks/transcription");
        return Ok(twiml_response(twiml::voicemail_greeting(
            VOICEMAIL_GREETING,
            &action,
            &transcribe,
        )));
    }

    let Some(to) = form.to.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        tracing::warn!("voice webhook without a destination number");
        return Ok(twiml_response(twiml::say(MISSING_NUMBER_MESSAGE)));
    };

    // Record the outbound leg before handing the provider its instructions,
    // so later status callbacks have a row to land on.
    if let Some(call_sid) = form.call_sid.as_deref().filter(|s| !s.is_empty()) {
        let status = form
            .call_status
            .as_deref()
            .and_then(CallStatus::from_provider)
            .unwrap_or(CallStatus::Queued);

        let mut call = Call::new(call_sid.to_string(), CallDirection::Outbound)
            .with_numbers(form.from.clone(), Some(to.to_string()))
            .with_status(status);
        if let Some(lead_id) = parse_entity_id(form.lead_id.as_deref()) {
            call = call.with_lead(lead_id);
        }
        if let Some(user_id) = parse_entity_id(form.user_id.as_deref()) {
            call = call.with_user(user_id);
        }

        state.db.insert_call(&call).await?;
        tracing::info!(call_sid, to, "outbound call row created");
    } else {
        tracing::warn!(to, "voice webhook without CallSid; dialing without a call row");
    }

    let recording_callback = state.api_config.callback_url("/webhooks/recording");
    Ok(twiml_response(twiml::dial_number(
        state.caller_id.as_deref(),
        to,
        &recording_callback,
    )))
}

/// POST /webhooks/status - Call status transition
#[utoipa::path(
    post,
    path = "/webhooks/status",
    tag = "Webhooks",
    request_body(content = StatusWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delivery acknowledged", body = WebhookAck),
    ),
)]
pub async fn status(
    State(state): State<Arc<WebhookState>>,
    Form(form): Form<StatusWebhookForm>,
) -> Response {
    match handle_status(&state, form).await {
        Ok(response) => response,
        Err(err) => state.policy.absorb("status", err, ack()),
    }
}

async fn handle_status(state: &WebhookState, form: StatusWebhookForm) -> ApiResult<Response> {
    let Some(call_sid) = form.call_sid.as_deref().filter(|s| !s.is_empty()) else {
        tracing::debug!("status webhook without CallSid ignored");
        return Ok(ack());
    };

    let status = form.call_status.as_deref().and_then(CallStatus::from_provider);
    let duration = parse_duration_secs(form.call_duration.as_deref());

    let updated = state.db.update_call_status(call_sid, status, duration).await?;
    if updated == 0 {
        tracing::debug!(call_sid, "status webhook for unknown call ignored");
    }

    Ok(ack())
}

/// POST /webhooks/recording - Recording available for a call
#[utoipa::path(
    post,
    path = "/webhooks/recording",
    tag = "Webhooks",
    request_body(content = RecordingWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delivery acknowledged", body = WebhookAck),
    ),
)]
pub async fn recording(
    State(state): State<Arc<WebhookState>>,
    Form(form): Form<RecordingWebhookForm>,
) -> Response {
    match handle_recording(&state, form).await {
        Ok(response) => response,
        Err(err) => state.policy.absorb("recording", err, ack()),
    }
}

async fn handle_recording(state: &WebhookState, form: RecordingWebhookForm) -> ApiResult<Response> {
    let Some(call_sid) = form.call_sid.as_deref().filter(|s| !s.is_empty()) else {
        tracing::debug!("recording webhook without CallSid ignored");
        return Ok(ack());
    };

    let duration = parse_duration_secs(form.recording_duration.as_deref());
    let updated = state
        .db
        .update_call_recording(
            call_sid,
            form.recording_sid.as_deref(),
            form.recording_url.as_deref(),
            duration,
        )
        .await?;
    if updated == 0 {
        tracing::debug!(call_sid, "recording webhook for unknown call ignored");
    }

    Ok(ack())
}

/// POST /webhooks/voicemail - `<Record>` action after a voicemail finishes
#[utoipa::path(
    post,
    path = "/webhooks/voicemail",
    tag = "Webhooks",
    request_body(content = VoicemailWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML hangup", body = String, content_type = "text/xml"),
    ),
)]
pub async fn voicemail(
    State(state): State<Arc<WebhookState>>,
    Form(form): Form<VoicemailWebhookForm>,
) -> Response {
    match handle_voicemail(&state, form).await {
        Ok(response) => response,
        Err(err) => state
            .policy
            .absorb("voicemail", err, twiml_response(twiml::hangup())),
    }
}

async fn handle_voicemail(state: &WebhookState, form: VoicemailWebhookForm) -> ApiResult<Response> {
    // Whatever happens to the row, the caller's leg ends with a hangup.
    if let Some(call_sid) = form.call_sid.as_deref().filter(|s| !s.is_empty()) {
        let duration = parse_duration_secs(form.recording_duration.as_deref());
        let updated = state
            .db
            .mark_voicemail(call_sid, form.recording_url.as_deref(), duration)
            .await?;
        if updated == 0 {
            tracing::debug!(call_sid, "voicemail webhook for unknown call ignored");
        }
    } else {
        tracing::debug!("voicemail webhook without CallSid ignored");
    }

    Ok(twiml_response(twiml::hangup()))
}

/// POST /webhooks/transcription - Voicemail transcription result
#[utoipa::path(
    post,
    path = "/webhooks/transcription",
    tag = "Webhooks",
    request_body(content = TranscriptionWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Delivery acknowledged", body = WebhookAck),
    ),
)]
pub async fn transcription(
    State(state): State<Arc<WebhookState>>,
    Form(form): Form<TranscriptionWebhookForm>,
) -> Response {
    match handle_transcription(&state, form).await {
        Ok(response) => response,
        Err(err) => state.policy.absorb("transcription", err, ack()),
    }
}

async fn handle_transcription(
    state: &WebhookState,
    form: TranscriptionWebhookForm,
) -> ApiResult<Response> {
    let Some(call_sid) = form.call_sid.as_deref().filter(|s| !s.is_empty()) else {
        tracing::debug!("transcription webhook without CallSid ignored");
        return Ok(ack());
    };

    // Intermediate and failed statuses are acknowledged but never persisted;
    // only the terminal success carries usable text.
    let terminal = form
        .transcription_status
        .as_deref()
        .and_then(TranscriptionStatus::from_provider)
        .is_some_and(|s| s.is_terminal_success());
    if !terminal {
        tracing::debug!(
            call_sid,
            status = form.transcription_status.as_deref().unwrap_or("<missing>"),
            "non-terminal transcription status ignored"
        );
        return Ok(ack());
    }

    let text = form.transcription_text.as_deref().unwrap_or_default();
    let updated = state.db.update_call_transcription(call_sid, text).await?;
    if updated == 0 {
        tracing::debug!(call_sid, "transcription webhook for unknown call ignored");
    }

    Ok(ack())
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the webhook routes router (mounted outside the session-token
/// middleware; the provider does not carry our bearer tokens).
pub fn create_router(db: DbClient, api_config: Arc<ApiConfig>, caller_id: Option<String>) -> Router {
    let state = Arc::new(WebhookState::new(db, api_config, caller_id));

    Router::new()
        .route("/voice", post(voice))
        .route("/status", post(status))
        .route("/recording", post(recording))
        .route("/voicemail", post(voicemail))
        .route("/transcription", post(transcription))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConfig;
    use axum::http::StatusCode;

    /// Pool creation is lazy; a dead address gives fast connection failures
    /// for the error-path tests.
    fn dead_state() -> WebhookState {
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DbConfig::default()
        };
        let db = DbClient::from_config(&config).expect("pool should build without connecting");
        WebhookState::new(
            db,
            Arc::new(ApiConfig::default()),
            Some("+15550001111".to_string()),
        )
    }

    #[test]
    fn test_policy_suppresses_by_default() {
        let policy = WebhookPolicy::default();
        let response = policy.absorb("status", ApiError::internal_error("boom"), ack());
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_policy_propagates_when_disabled() {
        let policy = WebhookPolicy {
            suppress_errors: false,
        };
        let response = policy.absorb("status", ApiError::internal_error("boom"), ack());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_twiml_response_content_type() {
        let response = twiml_response(twiml::hangup());
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/xml")
        );
    }

    #[test]
    fn test_parse_entity_id_tolerates_garbage() {
        let id = leadline_core::new_entity_id();
        assert_eq!(parse_entity_id(Some(&id.to_string())), Some(id));
        assert_eq!(parse_entity_id(Some("not-a-uuid")), None);
        assert_eq!(parse_entity_id(Some("")), None);
        assert_eq!(parse_entity_id(None), None);
    }

    #[tokio::test]
    async fn test_inbound_call_gets_voicemail_greeting() -> ApiResult<()> {
        let state = dead_state();
        let form = VoiceWebhookForm {
            call_sid: Some("CA100".to_string()),
            from: Some("+15550002222".to_string()),
            to: None,
            direction: Some("inbound".to_string()),
            call_status: Some("ringing".to_string()),
            lead_id: None,
            user_id: None,
        };

        // Inbound handling never touches the store, so the dead pool is fine.
        let response = handle_voice(&state, form).await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ApiError::internal_error(e.to_string()))?;
        let xml = String::from_utf8_lossy(&body);
        assert!(xml.contains("<Record"));
        assert!(xml.contains("/webhooks/voicemail"));
        assert!(xml.contains("/webhooks/transcription"));
        Ok(())
    }

    #[tokio::test]
    async fn test_outbound_call_without_number_gets_spoken_error() -> ApiResult<()> {
        let state = dead_state();
        let form = VoiceWebhookForm {
            call_sid: Some("CA101".to_string()),
            from: None,
            to: Some("   ".to_string()),
            direction: Some("outbound-api".to_string()),
            call_status: None,
            lead_id: None,
            user_id: None,
        };

        let response = handle_voice(&state, form).await?;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ApiError::internal_error(e.to_string()))?;
        let xml = String::from_utf8_lossy(&body);
        assert!(xml.contains("<Say>"));
        assert!(!xml.contains("<Dial"));
        Ok(())
    }

    #[tokio::test]
    async fn test_store_failure_still_answers_success() {
        // Full handler path: the insert fails against the dead pool, and the
        // policy converts that into a spoken TwiML response, not a 500.
        let state = Arc::new(dead_state());
        let form = VoiceWebhookForm {
            call_sid: Some("CA102".to_string()),
            from: Some("+15550002222".to_string()),
            to: Some("+15550003333".to_string()),
            direction: Some("outbound-api".to_string()),
            call_status: Some("queued".to_string()),
            lead_id: None,
            user_id: None,
        };

        let response = voice(State(state), Form(form)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_without_sid_is_acknowledged() -> ApiResult<()> {
        let state = dead_state();
        let form = StatusWebhookForm {
            call_sid: None,
            call_status: Some("completed".to_string()),
            call_duration: Some("42".to_string()),
        };

        // No SID means no query, so the dead pool is never touched.
        let response = handle_status(&state, form).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_terminal_transcription_is_ignored() -> ApiResult<()> {
        let state = dead_state();
        let form = TranscriptionWebhookForm {
            call_sid: Some("CA103".to_string()),
            transcription_status: Some("in-progress".to_string()),
            transcription_text: Some("partial text".to_string()),
        };

        // A non-terminal status short-circuits before the store, so this
        // passes even against the dead pool.
        let response = handle_transcription(&state, form).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }
}
