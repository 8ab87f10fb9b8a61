//! OpenAPI Specification for the Leadline API
//!
//! This module defines the OpenAPI document for the REST API. It uses
//! utoipa to generate the specification from Rust types and route
//! annotations.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::types::{
    CancelJobResponse, DialerTokenResponse, JobLeadsPageResponse, JobListResponse,
    LeadListResponse, MeResponse, RecordingListResponse, RecordingWebhookForm, ScoreboardEntry,
    ScoreboardResponse, StatusWebhookForm, TagCountsResponse, TranscriptionWebhookForm,
    VoiceWebhookForm, VoicemailWebhookForm, WebhookAck,
};

// Import route modules for path references
use crate::routes::{dialer, health, import_job, lead, recording, scoreboard, user, webhooks};

// Import domain types from leadline-core
use leadline_core::{
    AiTag, Call, CallDirection, CallStatus, ImportJob, ImportJobStatus, Lead, MeetingRecording,
    TagCount, TranscriptionStatus, User, UserRole,
};

/// OpenAPI document for the Leadline API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leadline API",
        version = "0.2.0",
        description = "CRM dashboard backend - leads, CSV import jobs, browser dialer, call webhooks, recordings, and the sales scoreboard",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Leadline", url = "https://leadline.app")
    ),
    servers(
        (url = "https://api.leadline.app", description = "Production"),
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Leads", description = "Lead pipeline listing, detail, and tag aggregation"),
        (name = "Import Jobs", description = "CSV import job status, cancellation, and per-job lead pages"),
        (name = "Webhooks", description = "Telephony provider callbacks over the call lifecycle"),
        (name = "Recordings", description = "Meeting recordings and the call recording proxy"),
        (name = "Scoreboard", description = "Per-rep call activity aggregates"),
        (name = "Dialer", description = "Browser dialer token issuance"),
        (name = "Users", description = "Authenticated user profile"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        // === Lead Routes ===
        lead::list_leads,
        lead::list_tags,
        lead::get_lead,

        // === Import Job Routes ===
        import_job::list_jobs,
        import_job::get_job,
        import_job::cancel_job,
        import_job::list_job_leads,

        // === Webhook Routes ===
        webhooks::voice,
        webhooks::status,
        webhooks::recording,
        webhooks::voicemail,
        webhooks::transcription,

        // === Recording Routes ===
        recording::list_recordings,
        recording::fetch_call_recording,

        // === Scoreboard Routes ===
        scoreboard::get_scoreboard,

        // === Dialer Routes ===
        dialer::mint_token,

        // === User Routes ===
        user::get_current_user,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            // === Error Types ===
            ErrorBody,

            // === Lead Types ===
            LeadListResponse, TagCountsResponse,

            // === Import Job Types ===
            JobListResponse, CancelJobResponse, JobLeadsPageResponse,

            // === Webhook Types ===
            VoiceWebhookForm, StatusWebhookForm, RecordingWebhookForm,
            VoicemailWebhookForm, TranscriptionWebhookForm, WebhookAck,

            // === Recording / Scoreboard / Dialer / User Types ===
            RecordingListResponse, ScoreboardEntry, ScoreboardResponse,
            DialerTokenResponse, MeResponse,

            // === Health Types ===
            health::HealthResponse, health::HealthStatus,
            health::HealthDetails, health::ComponentHealth,

            // === Core Domain Types (from leadline-core) ===
            Lead, ImportJob, ImportJobStatus, Call, CallStatus, CallDirection,
            TranscriptionStatus, MeetingRecording, User, UserRole,
            AiTag, TagCount
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier for OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Session token authentication (JWT minted by the auth provider)
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Auth provider session token"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_generation() -> Result<(), String> {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "Leadline API");
        assert_eq!(openapi.info.version, "0.2.0");

        let servers = openapi
            .servers
            .as_ref()
            .ok_or_else(|| "OpenAPI servers missing".to_string())?;
        assert_eq!(servers.len(), 2);

        let tags = openapi
            .tags
            .as_ref()
            .ok_or_else(|| "OpenAPI tags missing".to_string())?;
        assert_eq!(tags.len(), 8);

        let components = openapi
            .components
            .as_ref()
            .ok_or_else(|| "OpenAPI components missing".to_string())?;
        assert!(components.security_schemes.contains_key("bearer_auth"));
        Ok(())
    }

    #[test]
    fn test_openapi_json_serialization() -> Result<(), String> {
        let json = ApiDoc::to_json().map_err(|e| format!("Failed to serialize OpenAPI: {}", e))?;

        serde_json::from_str::<serde_json::Value>(&json)
            .map_err(|e| format!("Generated JSON invalid: {}", e))?;

        assert!(json.contains("Leadline API"));
        assert!(json.contains("\"bearer_auth\""));
        Ok(())
    }

    #[test]
    fn test_openapi_paths_exist() {
        let openapi = ApiDoc::openapi();

        assert!(!openapi.paths.paths.is_empty());

        assert!(openapi.paths.paths.contains_key("/api/v1/leads"));
        assert!(openapi.paths.paths.contains_key("/api/v1/leads/tags"));
        assert!(openapi.paths.paths.contains_key("/api/v1/import-jobs"));
        assert!(openapi
            .paths
            .paths
            .contains_key("/api/v1/import-jobs/{id}/leads"));
        assert!(openapi.paths.paths.contains_key("/webhooks/voice"));
        assert!(openapi.paths.paths.contains_key("/webhooks/transcription"));
        assert!(openapi.paths.paths.contains_key("/api/v1/recordings"));
        assert!(openapi
            .paths
            .paths
            .contains_key("/api/v1/calls/{id}/recording"));
        assert!(openapi.paths.paths.contains_key("/api/v1/scoreboard"));
        assert!(openapi.paths.paths.contains_key("/api/v1/dialer/token"));
        assert!(openapi.paths.paths.contains_key("/api/v1/users/me"));
        assert!(openapi.paths.paths.contains_key("/health/ready"));
    }
}
