//! Scoreboard REST API Routes
//!
//! Per-rep call activity aggregates over a trailing window, for the sales
//! scoreboard page. The aggregation query fans out over the calls table, so
//! it is the one store call in the API that runs under a bounded timeout: a
//! slow scoreboard must not hold a request slot for the pool's full wait.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use std::time::Duration;

use crate::{
    db::DbClient,
    error::{ApiError, ApiResult, ErrorBody},
    middleware::AuthExtractor,
    types::{ScoreboardEntry, ScoreboardQuery, ScoreboardResponse},
};

/// Upper bound on the aggregation query.
const SCOREBOARD_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/v1/scoreboard - Team call activity over a trailing window
#[utoipa::path(
    get,
    path = "/api/v1/scoreboard",
    tag = "Scoreboard",
    params(
        ("days" = Option<i64>, Query, description = "Trailing window in days (default 7, max 90)"),
    ),
    responses(
        (status = 200, description = "Per-rep activity aggregates", body = ScoreboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 500, description = "Aggregation timed out", body = ErrorBody),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_scoreboard(
    State(db): State<DbClient>,
    AuthExtractor(_auth): AuthExtractor,
    Query(params): Query<ScoreboardQuery>,
) -> ApiResult<impl IntoResponse> {
    let window_days = params.window_days();
    let since = Utc::now() - chrono::Duration::days(window_days);

    let rows = tokio::time::timeout(SCOREBOARD_TIMEOUT, db.scoreboard_rows(since))
        .await
        .map_err(|_| {
            tracing::warn!(window_days, "scoreboard aggregation timed out");
            ApiError::internal_error("Scoreboard aggregation timed out")
        })??;

    let entries: Vec<ScoreboardEntry> = rows.into_iter().map(ScoreboardEntry::from).collect();

    Ok(Json(ScoreboardResponse {
        entries,
        window_days,
    }))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the scoreboard routes router.
pub fn create_router(db: DbClient) -> Router {
    Router::new().route("/", get(get_scoreboard)).with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConfig;
    use crate::error::ErrorCode;
    use axum::extract::State;

    #[test]
    fn test_window_clamps() {
        assert_eq!(ScoreboardQuery { days: None }.window_days(), 7);
        assert_eq!(ScoreboardQuery { days: Some(30) }.window_days(), 30);
        assert_eq!(ScoreboardQuery { days: Some(0) }.window_days(), 1);
        assert_eq!(ScoreboardQuery { days: Some(365) }.window_days(), 90);
    }

    #[tokio::test]
    async fn test_dead_store_maps_to_internal_error() {
        // The dead pool fails the aggregation fast; the handler surfaces it
        // as a plain 500 rather than hanging on the timeout.
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DbConfig::default()
        };
        let db = DbClient::from_config(&config).expect("pool should build without connecting");

        let auth = crate::middleware::AuthExtractor(crate::auth::AuthContext {
            user_id: leadline_core::new_entity_id(),
            provider_uid: uuid::Uuid::now_v7(),
            role: leadline_core::UserRole::Rep,
            email: "rep@leadline.app".to_string(),
            first_name: None,
            last_name: None,
        });

        let result = get_scoreboard(State(db), auth, Query(ScoreboardQuery { days: None })).await;
        let err = result.err().expect("dead store should fail the handler");
        assert_eq!(err.code, ErrorCode::Internal);
    }
}
