//! Call webhook payload types
//!
//! Form-encoded payloads POSTed by the telephony provider. Field names are
//! the provider's PascalCase vocabulary; numeric values arrive as strings
//! and are parsed leniently, since webhook bodies are externally controlled
//! and a malformed field must not fail the delivery.

use serde::{Deserialize, Serialize};

/// Form posted to the voice webhook when the browser dialer places a call.
///
/// `LeadId`/`UserId` are custom parameters the dialer attaches so the call
/// row can be linked to the lead and rep; the provider forwards them
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct VoiceWebhookForm {
    pub call_sid: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub direction: Option<String>,
    pub call_status: Option<String>,
    pub lead_id: Option<String>,
    pub user_id: Option<String>,
}

/// Form posted on every call status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct StatusWebhookForm {
    pub call_sid: Option<String>,
    pub call_status: Option<String>,
    pub call_duration: Option<String>,
}

/// Form posted when a call recording reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct RecordingWebhookForm {
    pub call_sid: Option<String>,
    pub recording_sid: Option<String>,
    pub recording_url: Option<String>,
    pub recording_duration: Option<String>,
    pub recording_status: Option<String>,
}

/// Form posted by the `<Record>` action when a voicemail finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct VoicemailWebhookForm {
    pub call_sid: Option<String>,
    pub recording_url: Option<String>,
    pub recording_duration: Option<String>,
}

/// Form posted when a voicemail transcription job settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct TranscriptionWebhookForm {
    pub call_sid: Option<String>,
    pub transcription_status: Option<String>,
    pub transcription_text: Option<String>,
}

/// The JSON body acknowledging a webhook delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Parse a provider-supplied duration field.
///
/// Durations arrive as decimal strings; anything unparseable is treated as
/// absent rather than failing the webhook.
pub fn parse_duration_secs(value: Option<&str>) -> Option<i32> {
    value.and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forms_deserialize_provider_field_names() -> Result<(), String> {
        let form: StatusWebhookForm =
            serde_urlencoded::from_str("CallSid=CA123&CallStatus=completed&CallDuration=42")
                .map_err(|e| e.to_string())?;
        assert_eq!(form.call_sid.as_deref(), Some("CA123"));
        assert_eq!(form.call_status.as_deref(), Some("completed"));
        assert_eq!(form.call_duration.as_deref(), Some("42"));
        Ok(())
    }

    #[test]
    fn test_missing_fields_are_none() -> Result<(), String> {
        let form: VoiceWebhookForm =
            serde_urlencoded::from_str("CallSid=CA123").map_err(|e| e.to_string())?;
        assert_eq!(form.call_sid.as_deref(), Some("CA123"));
        assert!(form.to.is_none());
        assert!(form.lead_id.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_duration_tolerates_garbage() {
        assert_eq!(parse_duration_secs(Some("42")), Some(42));
        assert_eq!(parse_duration_secs(Some(" 7 ")), Some(7));
        assert_eq!(parse_duration_secs(Some("fortytwo")), None);
        assert_eq!(parse_duration_secs(Some("")), None);
        assert_eq!(parse_duration_secs(None), None);
    }

    #[test]
    fn test_ack_wire_shape() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&WebhookAck::received())?;
        assert_eq!(json, r#"{"received":true}"#);
        Ok(())
    }
}
