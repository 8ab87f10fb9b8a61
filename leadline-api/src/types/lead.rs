//! Lead-related API types

use super::{clamp_limit, clamp_offset};
use leadline_core::{EntityId, Lead, TagCount};
use serde::{Deserialize, Serialize};

/// Query parameters for the lead listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeadListQuery {
    /// Maximum rows to return (default 25, capped at 100)
    pub limit: Option<i64>,
    /// Rows to skip
    pub offset: Option<i64>,
    /// Exact pipeline status to filter on
    pub status: Option<String>,
    /// Free-text search across name, email, company, and phone
    pub search: Option<String>,
    /// Restrict to one owner (admin/manager only; reps are always scoped
    /// to themselves)
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = "uuid"))]
    pub owner_id: Option<EntityId>,
}

impl LeadListQuery {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Response for the lead listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeadListResponse {
    /// One page of leads, newest first
    pub leads: Vec<Lead>,
    /// Total matching rows before pagination
    pub total: u64,
}

/// Response for the tag aggregation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TagCountsResponse {
    /// Aggregated counts, descending by count then ascending by label
    pub tags: Vec<TagCount>,
}
