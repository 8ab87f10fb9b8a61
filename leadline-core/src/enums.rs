//! Enum types for Leadline entities
//!
//! Every enum here maps onto a lowercase text column in the hosted store;
//! `as_str` returns exactly the stored form and `Display` mirrors it so the
//! values can be spliced into query parameters and log lines unchanged.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// USER ROLES
// ============================================================================

/// Role of a dashboard user.
///
/// The hosted schema models roles as admin/manager/other; every
/// unprivileged spelling collapses to [`UserRole::Rep`] via
/// [`UserRole::parse_lenient`] so role gates only ever compare against
/// these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Rep,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Rep => "rep",
        }
    }

    /// Parse a role column value, mapping anything that is not
    /// admin/manager to `Rep`. Row data is externally owned and may carry
    /// legacy spellings; lookups must not fail on them.
    pub fn parse_lenient(s: &str) -> UserRole {
        match normalize_token(s).as_str() {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            _ => UserRole::Rep,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "rep" => Ok(UserRole::Rep),
            _ => Err(CoreError::InvalidEnumValue {
                kind: "UserRole",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// IMPORT JOBS
// ============================================================================

/// Status of a CSV import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ImportJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl ImportJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportJobStatus::Pending => "pending",
            ImportJobStatus::Processing => "processing",
            ImportJobStatus::Completed => "completed",
            ImportJobStatus::Failed => "failed",
            ImportJobStatus::Cancelled => "cancelled",
        }
    }

    /// Whether a DELETE may transition this job to `cancelled`.
    /// Only jobs that have not reached a terminal state qualify.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, ImportJobStatus::Pending | ImportJobStatus::Processing)
    }
}

impl fmt::Display for ImportJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportJobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(ImportJobStatus::Pending),
            "processing" => Ok(ImportJobStatus::Processing),
            "completed" | "complete" => Ok(ImportJobStatus::Completed),
            "failed" | "failure" => Ok(ImportJobStatus::Failed),
            "cancelled" | "canceled" => Ok(ImportJobStatus::Cancelled),
            _ => Err(CoreError::InvalidEnumValue {
                kind: "ImportJobStatus",
                value: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// CALLS
// ============================================================================

/// Direction of a call relative to the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl CallDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDirection::Inbound => "inbound",
            CallDirection::Outbound => "outbound",
        }
    }
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "inbound" => Ok(CallDirection::Inbound),
            "outbound" => Ok(CallDirection::Outbound),
            _ => Err(CoreError::InvalidEnumValue {
                kind: "CallDirection",
                value: s.to_string(),
            }),
        }
    }
}

/// Call progress status, the provider's published vocabulary.
///
/// The canonical stored form is the `as_str` value, hyphens included
/// (`in-progress`, `no-answer`); parsing flattens hyphens so provider
/// variants land on the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Initiated,
    Ringing,
    InProgress,
    Completed,
    Busy,
    NoAnswer,
    Failed,
    Canceled,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Queued => "queued",
            CallStatus::Initiated => "initiated",
            CallStatus::Ringing => "ringing",
            CallStatus::InProgress => "in-progress",
            CallStatus::Completed => "completed",
            CallStatus::Busy => "busy",
            CallStatus::NoAnswer => "no-answer",
            CallStatus::Failed => "failed",
            CallStatus::Canceled => "canceled",
        }
    }

    /// Lenient parse of a provider-reported status. Webhook payloads are
    /// externally controlled; unknown values yield `None` and the caller
    /// skips the field instead of failing the delivery.
    pub fn from_provider(s: &str) -> Option<CallStatus> {
        match normalize_token(s).as_str() {
            "queued" => Some(CallStatus::Queued),
            "initiated" => Some(CallStatus::Initiated),
            "ringing" => Some(CallStatus::Ringing),
            "inprogress" => Some(CallStatus::InProgress),
            "completed" => Some(CallStatus::Completed),
            "busy" => Some(CallStatus::Busy),
            "noanswer" => Some(CallStatus::NoAnswer),
            "failed" => Some(CallStatus::Failed),
            "canceled" | "cancelled" => Some(CallStatus::Canceled),
            _ => None,
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CallStatus::from_provider(s).ok_or_else(|| CoreError::InvalidEnumValue {
            kind: "CallStatus",
            value: s.to_string(),
        })
    }
}

/// Transcription lifecycle status reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum TranscriptionStatus {
    InProgress,
    Completed,
    Failed,
}

impl TranscriptionStatus {
    pub fn from_provider(s: &str) -> Option<TranscriptionStatus> {
        match normalize_token(s).as_str() {
            "inprogress" => Some(TranscriptionStatus::InProgress),
            "completed" => Some(TranscriptionStatus::Completed),
            "failed" => Some(TranscriptionStatus::Failed),
            _ => None,
        }
    }

    /// Transcription text is persisted only on this status.
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, TranscriptionStatus::Completed)
    }
}

impl fmt::Display for TranscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TranscriptionStatus::InProgress => "in-progress",
            TranscriptionStatus::Completed => "completed",
            TranscriptionStatus::Failed => "failed",
        };
        write!(f, "{}", value)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Normalize a token for case-insensitive enum parsing: strips whitespace,
/// underscores and hyphens, and lowercases.
fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_lenient_collapses_unknown_to_rep() {
        assert_eq!(UserRole::parse_lenient("admin"), UserRole::Admin);
        assert_eq!(UserRole::parse_lenient("Manager"), UserRole::Manager);
        assert_eq!(UserRole::parse_lenient("sdr"), UserRole::Rep);
        assert_eq!(UserRole::parse_lenient(""), UserRole::Rep);
    }

    #[test]
    fn test_import_job_cancellable_set() {
        assert!(ImportJobStatus::Pending.is_cancellable());
        assert!(ImportJobStatus::Processing.is_cancellable());
        assert!(!ImportJobStatus::Completed.is_cancellable());
        assert!(!ImportJobStatus::Failed.is_cancellable());
        assert!(!ImportJobStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_import_job_status_round_trips_column_form() {
        for status in [
            ImportJobStatus::Pending,
            ImportJobStatus::Processing,
            ImportJobStatus::Completed,
            ImportJobStatus::Failed,
            ImportJobStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ImportJobStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn test_call_status_accepts_provider_spellings() {
        assert_eq!(CallStatus::from_provider("in-progress"), Some(CallStatus::InProgress));
        assert_eq!(CallStatus::from_provider("no-answer"), Some(CallStatus::NoAnswer));
        assert_eq!(CallStatus::from_provider("NO-ANSWER"), Some(CallStatus::NoAnswer));
        assert_eq!(CallStatus::from_provider("cancelled"), Some(CallStatus::Canceled));
        assert_eq!(CallStatus::from_provider("ring-storm"), None);
    }

    #[test]
    fn test_transcription_terminal_success_is_completed_only() {
        assert!(TranscriptionStatus::Completed.is_terminal_success());
        assert!(!TranscriptionStatus::InProgress.is_terminal_success());
        assert!(!TranscriptionStatus::Failed.is_terminal_success());
    }

    #[test]
    fn test_serde_uses_column_forms() {
        let json = serde_json::to_string(&ImportJobStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let json = serde_json::to_string(&CallStatus::NoAnswer).unwrap();
        assert_eq!(json, "\"no-answer\"");
        let role: UserRole = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, UserRole::Manager);
    }
}
