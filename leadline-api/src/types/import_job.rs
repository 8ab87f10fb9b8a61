//! Import-job-related API types

use super::{clamp_limit, clamp_offset};
use leadline_core::{ImportJob, Lead, PageRequest};
use serde::{Deserialize, Serialize};

/// Query parameters for the import-job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobListQuery {
    /// Maximum rows to return (default 25, capped at 100)
    pub limit: Option<i64>,
    /// Rows to skip
    pub offset: Option<i64>,
}

impl JobListQuery {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// Query parameters for the job-scoped lead page listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobLeadsQuery {
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Rows per page (default 10, capped at 100)
    #[serde(alias = "perPage")]
    pub per_page: Option<u32>,
    /// Free-text search across name, email, company, and phone
    pub search: Option<String>,
}

impl JobLeadsQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Response for the import-job listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobListResponse {
    /// One page of jobs, newest first
    pub jobs: Vec<ImportJob>,
    /// Total jobs before pagination
    pub total: u64,
}

/// Response to a cancellation request.
///
/// `cancelled` is false when the job was already terminal; the request is
/// still a success and `job` holds the untouched row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelJobResponse {
    pub job: ImportJob,
    pub cancelled: bool,
}

/// Page envelope for the leads belonging to one import job.
///
/// Field spelling is what the dashboard consumes: `perPage` and
/// `totalPages` are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct JobLeadsPageResponse {
    /// The requested page slice, newest first
    pub leads: Vec<Lead>,
    /// Total matching rows across all pages
    pub total: u64,
    /// The 1-based page this slice came from
    pub page: u32,
    /// Page size the slice was cut with
    #[serde(rename = "perPage")]
    pub per_page: u32,
    /// Total page count: `ceil(total / perPage)`, zero when empty
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl JobLeadsPageResponse {
    /// Assemble the envelope from a query result and the page it answered.
    pub fn new(leads: Vec<Lead>, total: u64, page: &PageRequest) -> Self {
        Self {
            leads,
            total,
            page: page.page(),
            per_page: page.per_page(),
            total_pages: page.total_pages(total),
        }
    }
}
