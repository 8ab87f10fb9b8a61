//! Core entity structures
//!
//! Row shapes for the hosted Postgres store. Most of these are read-side
//! projections; the only rows this service writes are calls (created by the
//! dialer webhook) and import-job cancellations.

use crate::{
    AiTag, CallDirection, CallStatus, EntityId, ImportJobStatus, Timestamp, TranscriptionStatus,
    UserRole,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// User - a dashboard account.
/// Carries both identity columns from the auth-provider migration; either
/// may hold the provider UID for a given row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub user_id: EntityId,
    /// Current auth-provider UID column.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub auth_user_id: Option<EntityId>,
    /// Legacy auth-provider UID column, still populated on older rows.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub auth_id: Option<EntityId>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

impl User {
    /// Human-readable name, falling back to the email address.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Lead - a CRM contact record.
/// Rows are soft-deleted; `is_deleted = true` rows never leave the store
/// through this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Lead {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub lead_id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    /// Pipeline status. The vocabulary is owned by the dashboard, so it
    /// flows through as text rather than an enum.
    pub status: Option<String>,
    /// Acquisition channel, free text ("import", "manual", ...).
    pub source: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub owner_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub import_job_id: Option<EntityId>,
    /// AI-assigned tags in model output order. `None` when the enrichment
    /// pipeline has not run for this row.
    pub ai_tags: Option<Vec<AiTag>>,
    pub is_deleted: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Lead {
    /// Human-readable name for call screens and logs.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self
                .email
                .clone()
                .or_else(|| self.phone.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// ImportJob - a CSV import tracked through its lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImportJob {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub import_job_id: EntityId,
    pub file_name: String,
    pub status: ImportJobStatus,
    pub total_rows: Option<i32>,
    pub processed_rows: Option<i32>,
    pub failed_rows: Option<i32>,
    pub error_message: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub created_by: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub completed_at: Option<Timestamp>,
}

/// Call - one telephony call leg and its recording/transcription state.
/// Updated in place by provider webhooks; last write wins per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Call {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub call_id: EntityId,
    /// Provider call identifier, the correlation key for every webhook.
    pub call_sid: String,
    pub direction: CallDirection,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    pub status: CallStatus,
    pub duration_secs: Option<i32>,
    pub recording_sid: Option<String>,
    pub recording_url: Option<String>,
    pub recording_duration_secs: Option<i32>,
    pub is_voicemail: bool,
    /// Free-text outcome entered by the rep after the call.
    pub disposition: Option<String>,
    pub transcription_text: Option<String>,
    pub transcription_status: Option<TranscriptionStatus>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub lead_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub user_id: Option<EntityId>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

impl Call {
    /// Create a new call row at dial time.
    pub fn new(call_sid: String, direction: CallDirection) -> Self {
        let now = Utc::now();
        Self {
            call_id: crate::new_entity_id(),
            call_sid,
            direction,
            from_number: None,
            to_number: None,
            status: CallStatus::Initiated,
            duration_secs: None,
            recording_sid: None,
            recording_url: None,
            recording_duration_secs: None,
            is_voicemail: false,
            disposition: None,
            transcription_text: None,
            transcription_status: None,
            lead_id: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the dialed endpoints.
    pub fn with_numbers(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from_number = from;
        self.to_number = to;
        self
    }

    /// Associate the call with the lead being dialed.
    pub fn with_lead(mut self, lead_id: EntityId) -> Self {
        self.lead_id = Some(lead_id);
        self
    }

    /// Associate the call with the rep placing it.
    pub fn with_user(mut self, user_id: EntityId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Override the initial status, e.g. with the provider-reported one.
    pub fn with_status(mut self, status: CallStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the provider has reported a stored recording for this call.
    pub fn has_recording(&self) -> bool {
        self.recording_url.is_some()
    }
}

/// MeetingRecording - a stored meeting recording joined to its meeting
/// and host for list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MeetingRecording {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub recording_id: EntityId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub meeting_id: EntityId,
    pub recording_url: String,
    pub duration_secs: Option<i32>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    /// Topic of the owning meeting.
    pub meeting_topic: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "date-time"))]
    pub meeting_started_at: Option<Timestamp>,
    /// Display name of the hosting user, when the join finds one.
    pub host_name: Option<String>,
    pub host_email: Option<String>,
}
