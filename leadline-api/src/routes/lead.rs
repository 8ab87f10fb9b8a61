//! Lead REST API Routes
//!
//! Listing, detail, and tag aggregation for the lead pipeline. Role scoping
//! happens here rather than in the store: reps are forced onto their own
//! slice of the pipeline, admins and managers see everything and may narrow
//! to one owner with the `owner_id` query parameter.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::{
    db::{DbClient, LeadFilter},
    error::{ApiError, ApiResult, ErrorBody},
    middleware::AuthExtractor,
    types::{LeadListQuery, LeadListResponse, TagCountsResponse},
};
use leadline_core::{aggregate_tags, parse_tag_list, EntityId, UserRole};
use uuid::Uuid;

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/leads - List leads with filters
#[utoipa::path(
    get,
    path = "/api/v1/leads",
    tag = "Leads",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of results (default 25, max 100)"),
        ("offset" = Option<i64>, Query, description = "Offset for pagination"),
        ("status" = Option<String>, Query, description = "Filter by pipeline status"),
        ("search" = Option<String>, Query, description = "Free-text search across name, email, company, and phone"),
        ("owner_id" = Option<String>, Query, description = "Filter by owner (admin/manager only)"),
    ),
    responses(
        (status = 200, description = "One page of leads", body = LeadListResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_leads(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Query(params): Query<LeadListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = LeadFilter {
        owner_id: effective_owner(&auth, params.owner_id),
        status: params.status.as_deref(),
        search: params.search.as_deref(),
    };

    let (leads, total) = db.list_leads(filter, params.limit(), params.offset()).await?;

    Ok(Json(LeadListResponse { leads, total }))
}

/// GET /api/v1/leads/tags - Aggregate AI tag counts across the pipeline
#[utoipa::path(
    get,
    path = "/api/v1/leads/tags",
    tag = "Leads",
    responses(
        (status = 200, description = "Tag counts, descending by count", body = TagCountsResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_tags(
    State(db): State<DbClient>,
    AuthExtractor(_auth): AuthExtractor,
) -> ApiResult<impl IntoResponse> {
    let rows = db.lead_tag_rows().await?;
    let tags = aggregate_tags(rows.iter().map(parse_tag_list));

    Ok(Json(TagCountsResponse { tags }))
}

/// GET /api/v1/leads/{id} - Get lead by ID
#[utoipa::path(
    get,
    path = "/api/v1/leads/{id}",
    tag = "Leads",
    params(
        ("id" = Uuid, Path, description = "Lead ID")
    ),
    responses(
        (status = 200, description = "Lead details", body = leadline_core::Lead),
        (status = 404, description = "Lead not found", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_lead(
    State(db): State<DbClient>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<EntityId>,
) -> ApiResult<impl IntoResponse> {
    let lead = db
        .get_lead(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found("Lead", id))?;

    // A rep probing another rep's lead gets the same 404 as a missing row,
    // so the response does not confirm the lead exists.
    if auth.has_role(UserRole::Rep) && lead.owner_id != Some(auth.user_id) {
        return Err(ApiError::entity_not_found("Lead", id));
    }

    Ok(Json(lead))
}

// ============================================================================
// HELPERS
// ============================================================================

/// Resolve the owner filter a caller is actually allowed to use.
///
/// Reps never see past their own pipeline, whatever they pass; other roles
/// get the filter they asked for.
fn effective_owner(auth: &crate::auth::AuthContext, requested: Option<EntityId>) -> Option<EntityId> {
    if auth.has_role(UserRole::Rep) {
        Some(auth.user_id)
    } else {
        requested
    }
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the lead routes router.
pub fn create_router(db: DbClient) -> Router {
    Router::new()
        .route("/", get(list_leads))
        .route("/tags", get(list_tags))
        .route("/:id", get(get_lead))
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_list_query_defaults() {
        let params: LeadListQuery = serde_json::from_str("{}").expect("empty query should parse");

        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 0);
        assert!(params.status.is_none());
        assert!(params.owner_id.is_none());
    }

    #[test]
    fn test_lead_list_query_caps_limit() {
        let params = LeadListQuery {
            limit: Some(10_000),
            offset: Some(-5),
            status: None,
            search: None,
            owner_id: None,
        };

        assert_eq!(params.limit(), 100);
        assert_eq!(params.offset(), 0);
    }

    fn context_with_role(role: UserRole) -> crate::auth::AuthContext {
        crate::auth::AuthContext {
            user_id: leadline_core::new_entity_id(),
            provider_uid: uuid::Uuid::now_v7(),
            role,
            email: "someone@leadline.app".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_rep_owner_scope_overrides_query() {
        let rep = context_with_role(UserRole::Rep);
        let other_id = leadline_core::new_entity_id();

        assert_eq!(effective_owner(&rep, Some(other_id)), Some(rep.user_id));
        assert_eq!(effective_owner(&rep, None), Some(rep.user_id));
    }

    #[test]
    fn test_manager_owner_scope_passes_through() {
        let manager = context_with_role(UserRole::Manager);
        let other_id = leadline_core::new_entity_id();

        assert_eq!(effective_owner(&manager, Some(other_id)), Some(other_id));
        assert_eq!(effective_owner(&manager, None), None);
    }
}
