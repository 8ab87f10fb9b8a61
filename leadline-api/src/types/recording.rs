//! Meeting-recording-related API types

use super::{clamp_limit, clamp_offset};
use leadline_core::MeetingRecording;
use serde::{Deserialize, Serialize};

/// Query parameters for the recording listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordingListQuery {
    /// Maximum rows to return (default 25, capped at 100)
    pub limit: Option<i64>,
    /// Rows to skip
    pub offset: Option<i64>,
}

impl RecordingListQuery {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Response for the recording listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordingListResponse {
    /// One page of recordings with meeting and host context, newest first
    pub recordings: Vec<MeetingRecording>,
    /// Total recordings before pagination
    pub total: u64,
}
