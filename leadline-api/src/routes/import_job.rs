//! Import Job REST API Routes
//!
//! Listing, status, cancellation, and the per-job lead page for CSV import
//! jobs. Import tooling is an admin surface: every handler runs the
//! admin/manager role gate before touching the store.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult, ErrorBody},
    middleware::AuthExtractor,
    types::{CancelJobResponse, JobLeadsPageResponse, JobLeadsQuery, JobListQuery, JobListResponse},
};
use leadline_core::{EntityId, UserRole};
use uuid::Uuid;

/// Roles allowed to see and manage import jobs.
const IMPORT_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Manager];

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/import-jobs - List import jobs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/import-jobs",
    tag = "Import Jobs",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of results (default 25, max 100)"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination"),
    ),
    responses(
        (status = 200, description = "One page of import jobs", body = JobListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not an admin or manager", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_jobs(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Query(params): Query<JobListQuery>,
) -> ApiResult<impl IntoResponse> {
    auth.ensure_any_role(IMPORT_ROLES)?;

    let (jobs, total) = db.list_import_jobs(params.limit(), params.offset()).await?;

    Ok(Json(JobListResponse { jobs, total }))
}

/// GET /api/v1/import-jobs/{id} - Get import job by ID
#[utoipa::path(
    get,
    path = "/api/v1/import-jobs/{id}",
    tag = "Import Jobs",
    params(
        ("id" = Uuid, Path, description = "Import job ID")
    ),
    responses(
        (status = 200, description = "Import job details", body = leadline_core::ImportJob),
        (status = 404, description = "Import job not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not an admin or manager", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_job(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<EntityId>,
) -> ApiResult<impl IntoResponse> {
    auth.ensure_any_role(IMPORT_ROLES)?;

    let job = db
        .get_import_job(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Import job", id))?;

    Ok(Json(job))
}

/// DELETE /api/v1/import-jobs/{id} - Cancel an import job
///
/// Only pending and processing jobs transition to cancelled; a job that
/// already finished is left untouched and reported with `cancelled: false`.
#[utoipa::path(
    delete,
    path = "/api/v1/import-jobs/{id}",
    tag = "Import Jobs",
    params(
        ("id" = Uuid, Path, description = "Import job ID")
    ),
    responses(
        (status = 200, description = "Cancellation outcome and the resulting job row", body = CancelJobResponse),
        (status = 404, description = "Import job not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not an admin or manager", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn cancel_job(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<EntityId>,
) -> ApiResult<impl IntoResponse> {
    auth.ensure_any_role(IMPORT_ROLES)?;

    let (job, cancelled) = db
        .cancel_import_job(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Import job", id))?;

    if cancelled {
        tracing::info!(import_job_id = %job.import_job_id, "import job cancelled");
    }

    Ok(Json(CancelJobResponse { job, cancelled }))
}

/// GET /api/v1/import-jobs/{id}/leads - Page through one job's leads
#[utoipa::path(
    get,
    path = "/api/v1/import-jobs/{id}/leads",
    tag = "Import Jobs",
    params(
        ("id" = Uuid, Path, description = "Import job ID"),
        ("page" = Option<u32>, Query, description = "1-based page number (default 1)"),
        ("perPage" = Option<u32>, Query, description = "Rows per page (default 10, max 100)"),
        ("search" = Option<String>, Query, description = "Free-text search across name, email, company, and phone"),
    ),
    responses(
        (status = 200, description = "One page of the job's leads", body = JobLeadsPageResponse),
        (status = 404, description = "Import job not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not an admin or manager", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_job_leads(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<EntityId>,
    Query(params): Query<JobLeadsQuery>,
) -> ApiResult<impl IntoResponse> {
    auth.ensure_any_role(IMPORT_ROLES)?;

    // The page for a missing job is a 404, not an empty page.
    db.get_import_job(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Import job", id))?;

    let page = params.page_request();
    let (leads, total) = db.list_job_leads(id, page, params.search.as_deref()).await?;

    Ok(Json(JobLeadsPageResponse::new(leads, total, &page)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the import job routes router.
pub fn create_router(db: DbClient) -> Router {
    Router::new()
        .route("/", get(list_jobs))
        .route("/:id", get(get_job).delete(cancel_job))
        .route("/:id/leads", get(list_job_leads))
        .with_state(db)
}
