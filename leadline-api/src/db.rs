//! Database Connection Pool Module
//!
//! PostgreSQL access for the hosted CRM store using deadpool-postgres.
//! Every handler receives a [`DbClient`] by injection; nothing in this
//! service holds mutable state outside the pool, so instances can be
//! cloned freely across routes and tasks.
//!
//! The schema is owned by the dashboard's migration pipeline. This service
//! reads most tables and writes only `calls` rows and import-job
//! cancellations, always last-write-wins per row.

use crate::error::{ApiError, ApiResult};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use leadline_core::{
    parse_tag_list, Call, CallDirection, CallStatus, EntityId, ImportJob, Lead, MeetingRecording,
    PageRequest, Timestamp, TranscriptionStatus, User, UserRole,
};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};
use uuid::Uuid;

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Full connection URL; takes precedence over the discrete fields.
    pub url: Option<String>,
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Connection timeout
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            dbname: "leadline".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    ///
    /// `LEADLINE_DATABASE_URL` wins when set; otherwise the discrete
    /// `LEADLINE_DB_*` variables are used.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("LEADLINE_DATABASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            host: std::env::var("LEADLINE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("LEADLINE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("LEADLINE_DB_NAME").unwrap_or_else(|_| "leadline".to_string()),
            user: std::env::var("LEADLINE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("LEADLINE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("LEADLINE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("LEADLINE_DB_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        if let Some(url) = &self.url {
            cfg.url = Some(url.clone());
        } else {
            cfg.host = Some(self.host.clone());
            cfg.port = Some(self.port);
            cfg.dbname = Some(self.dbname.clone());
            cfg.user = Some(self.user.clone());
            cfg.password = Some(self.password.clone());
        }
        cfg.connect_timeout = Some(self.timeout);

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(self.max_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and provides
/// the query surface the route handlers need.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

const USER_COLUMNS: &str =
    "id, auth_user_id, auth_id, email, first_name, last_name, role, is_active, created_at";

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, company, title, status, \
     source, owner_id, import_job_id, ai_tags, is_deleted, created_at, updated_at";

const IMPORT_JOB_COLUMNS: &str = "id, file_name, status, total_rows, processed_rows, \
     failed_rows, error_message, created_by, created_at, updated_at, completed_at";

const CALL_COLUMNS: &str = "id, call_sid, direction, from_number, to_number, status, \
     duration_secs, recording_sid, recording_url, recording_duration_secs, is_voicemail, \
     disposition, transcription_text, transcription_status, lead_id, user_id, created_at, \
     updated_at";

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        let status = self.pool.status();
        status.size
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> ApiResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Verify the store answers a trivial query.
    pub async fn health_check(&self) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.query_one("SELECT 1", &[]).await?;
        Ok(())
    }

    // ========================================================================
    // USER OPERATIONS
    // ========================================================================

    /// Resolve an auth-provider UID to an internal user row.
    ///
    /// The users table carries two identity columns from the provider
    /// migration: `auth_user_id` is authoritative, `auth_id` still holds
    /// the UID on rows the backfill never reached. Reads try the current
    /// column first and fall back to the legacy one.
    pub async fn find_user_by_provider_id(&self, provider_uid: Uuid) -> ApiResult<Option<User>> {
        let conn = self.get_conn().await?;

        let sql = format!("SELECT {} FROM users WHERE auth_user_id = $1", USER_COLUMNS);
        if let Some(row) = conn.query_opt(&sql, &[&provider_uid]).await? {
            return Ok(Some(row_to_user(&row)?));
        }

        let sql = format!("SELECT {} FROM users WHERE auth_id = $1", USER_COLUMNS);
        match conn.query_opt(&sql, &[&provider_uid]).await? {
            Some(row) => {
                tracing::debug!(
                    provider_uid = %provider_uid,
                    "user resolved via legacy auth_id column"
                );
                Ok(Some(row_to_user(&row)?))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // LEAD OPERATIONS
    // ========================================================================

    /// List non-deleted leads, newest first, with optional owner scoping,
    /// status filter, and free-text search.
    ///
    /// Returns the slice and the total matching row count. An offset past
    /// the end of the data yields an empty slice with the true total.
    pub async fn list_leads(
        &self,
        filter: LeadFilter<'_>,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<Lead>, u64)> {
        let conn = self.get_conn().await?;

        let pattern = search_pattern(filter.search);

        // The WHERE clause grows with the filters that are actually set, so
        // placeholders are numbered as parameters are pushed.
        let mut conditions = vec!["is_deleted = FALSE".to_string()];
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

        if let Some(owner_id) = filter.owner_id.as_ref() {
            params.push(owner_id);
            conditions.push(format!("owner_id = ${}", params.len()));
        }
        if let Some(status) = filter.status.as_ref() {
            params.push(status);
            conditions.push(format!("status = ${}", params.len()));
        }
        if let Some(pattern) = pattern.as_ref() {
            params.push(pattern);
            conditions.push(lead_search_predicate(params.len()));
        }

        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM leads WHERE {}", where_clause);
        let total: i64 = conn.query_one(&count_sql, &params).await?.get(0);

        params.push(&limit);
        let limit_pos = params.len();
        params.push(&offset);
        let offset_pos = params.len();
        let list_sql = format!(
            "SELECT {} FROM leads WHERE {} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            LEAD_COLUMNS, where_clause, limit_pos, offset_pos
        );
        let rows = conn.query(&list_sql, &params).await?;

        let leads = rows
            .iter()
            .map(row_to_lead)
            .collect::<ApiResult<Vec<_>>>()?;
        Ok((leads, total.max(0) as u64))
    }

    /// Get a non-deleted lead by id.
    pub async fn get_lead(&self, id: EntityId) -> ApiResult<Option<Lead>> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "SELECT {} FROM leads WHERE id = $1 AND is_deleted = FALSE",
            LEAD_COLUMNS
        );
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.map(|r| row_to_lead(&r)).transpose()
    }

    /// List the non-deleted leads belonging to one import job.
    pub async fn list_job_leads(
        &self,
        job_id: EntityId,
        page: PageRequest,
        search: Option<&str>,
    ) -> ApiResult<(Vec<Lead>, u64)> {
        let conn = self.get_conn().await?;

        let (total, rows) = match search_pattern(search) {
            Some(pattern) => {
                let predicate = lead_search_predicate(2);
                let count_sql = format!(
                    "SELECT COUNT(*) FROM leads \
                     WHERE is_deleted = FALSE AND import_job_id = $1 AND {}",
                    predicate
                );
                let list_sql = format!(
                    "SELECT {} FROM leads \
                     WHERE is_deleted = FALSE AND import_job_id = $1 AND {} \
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4",
                    LEAD_COLUMNS, predicate
                );
                let total: i64 = conn
                    .query_one(&count_sql, &[&job_id, &pattern])
                    .await?
                    .get(0);
                let rows = conn
                    .query(
                        &list_sql,
                        &[&job_id, &pattern, &page.limit(), &page.offset()],
                    )
                    .await?;
                (total, rows)
            }
            None => {
                let count_sql =
                    "SELECT COUNT(*) FROM leads WHERE is_deleted = FALSE AND import_job_id = $1";
                let list_sql = format!(
                    "SELECT {} FROM leads WHERE is_deleted = FALSE AND import_job_id = $1 \
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3",
                    LEAD_COLUMNS
                );
                let total: i64 = conn.query_one(count_sql, &[&job_id]).await?.get(0);
                let rows = conn
                    .query(&list_sql, &[&job_id, &page.limit(), &page.offset()])
                    .await?;
                (total, rows)
            }
        };

        let leads = rows
            .iter()
            .map(row_to_lead)
            .collect::<ApiResult<Vec<_>>>()?;
        Ok((leads, total.max(0) as u64))
    }

    /// Fetch the raw `ai_tags` column of every non-deleted lead that has one.
    ///
    /// Aggregation happens in [`leadline_core::aggregate_tags`]; this method
    /// only narrows the scan to rows that can contribute.
    pub async fn lead_tag_rows(&self) -> ApiResult<Vec<JsonValue>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT ai_tags FROM leads WHERE is_deleted = FALSE AND ai_tags IS NOT NULL",
                &[],
            )
            .await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    // ========================================================================
    // IMPORT JOB OPERATIONS
    // ========================================================================

    /// List import jobs, newest first.
    pub async fn list_import_jobs(
        &self,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<ImportJob>, u64)> {
        let conn = self.get_conn().await?;

        let total: i64 = conn
            .query_one("SELECT COUNT(*) FROM import_jobs", &[])
            .await?
            .get(0);
        let sql = format!(
            "SELECT {} FROM import_jobs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            IMPORT_JOB_COLUMNS
        );
        let rows = conn.query(&sql, &[&limit, &offset]).await?;

        let jobs = rows
            .iter()
            .map(row_to_import_job)
            .collect::<ApiResult<Vec<_>>>()?;
        Ok((jobs, total.max(0) as u64))
    }

    /// Get an import job by id.
    pub async fn get_import_job(&self, id: EntityId) -> ApiResult<Option<ImportJob>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM import_jobs WHERE id = $1", IMPORT_JOB_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.map(|r| row_to_import_job(&r)).transpose()
    }

    /// Cancel an import job if it has not reached a terminal state.
    ///
    /// The transition is guarded in SQL so concurrent cancels and worker
    /// completions cannot race: only a `pending` or `processing` row is
    /// updated, and cancellation stamps `completed_at`. When the guard does
    /// not fire the current row is returned unchanged with `cancelled`
    /// false, making repeat cancels a no-op. `None` means the job does not
    /// exist.
    pub async fn cancel_import_job(
        &self,
        id: EntityId,
    ) -> ApiResult<Option<(ImportJob, bool)>> {
        let conn = self.get_conn().await?;

        let updated = conn
            .execute(
                "UPDATE import_jobs \
                 SET status = 'cancelled', completed_at = NOW(), updated_at = NOW() \
                 WHERE id = $1 AND status IN ('pending', 'processing')",
                &[&id],
            )
            .await?;

        if updated == 0 {
            tracing::debug!(job_id = %id, "cancel was a no-op");
        } else {
            tracing::info!(job_id = %id, "import job cancelled");
        }

        let job = self.get_import_job(id).await?;
        Ok(job.map(|job| (job, updated > 0)))
    }

    // ========================================================================
    // CALL OPERATIONS
    // ========================================================================

    /// Insert a call row at dial time.
    ///
    /// Re-delivery of the originating webhook is tolerated: the provider
    /// call SID is unique and a duplicate insert is dropped.
    pub async fn insert_call(&self, call: &Call) -> ApiResult<()> {
        let conn = self.get_conn().await?;
        conn.execute(
            "INSERT INTO calls (id, call_sid, direction, from_number, to_number, status, \
             is_voicemail, lead_id, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (call_sid) DO NOTHING",
            &[
                &call.call_id,
                &call.call_sid,
                &call.direction.as_str(),
                &call.from_number,
                &call.to_number,
                &call.status.as_str(),
                &call.is_voicemail,
                &call.lead_id,
                &call.user_id,
                &call.created_at,
                &call.updated_at,
            ],
        )
        .await?;
        Ok(())
    }

    /// Get a call by id.
    pub async fn get_call(&self, id: EntityId) -> ApiResult<Option<Call>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM calls WHERE id = $1", CALL_COLUMNS);
        let row = conn.query_opt(&sql, &[&id]).await?;
        row.map(|r| row_to_call(&r)).transpose()
    }

    /// Find a call by its provider SID.
    pub async fn find_call_by_sid(&self, call_sid: &str) -> ApiResult<Option<Call>> {
        let conn = self.get_conn().await?;
        let sql = format!("SELECT {} FROM calls WHERE call_sid = $1", CALL_COLUMNS);
        let row = conn.query_opt(&sql, &[&call_sid]).await?;
        row.map(|r| row_to_call(&r)).transpose()
    }

    /// Apply a status callback to the matching call row.
    ///
    /// Absent fields keep their stored values. Returns the number of rows
    /// touched, which is at most one since the SID is unique; zero means
    /// the SID matched nothing and the caller moves on.
    pub async fn update_call_status(
        &self,
        call_sid: &str,
        status: Option<CallStatus>,
        duration_secs: Option<i32>,
    ) -> ApiResult<u64> {
        let conn = self.get_conn().await?;
        let status_str = status.map(|s| s.as_str());
        let updated = conn
            .execute(
                "UPDATE calls SET status = COALESCE($2, status), \
                 duration_secs = COALESCE($3, duration_secs), updated_at = NOW() \
                 WHERE call_sid = $1",
                &[&call_sid, &status_str, &duration_secs],
            )
            .await?;
        Ok(updated)
    }

    /// Attach a finished recording to the matching call row.
    pub async fn update_call_recording(
        &self,
        call_sid: &str,
        recording_sid: Option<&str>,
        recording_url: Option<&str>,
        duration_secs: Option<i32>,
    ) -> ApiResult<u64> {
        let conn = self.get_conn().await?;
        let updated = conn
            .execute(
                "UPDATE calls SET recording_sid = COALESCE($2, recording_sid), \
                 recording_url = COALESCE($3, recording_url), \
                 recording_duration_secs = COALESCE($4, recording_duration_secs), \
                 updated_at = NOW() \
                 WHERE call_sid = $1",
                &[&call_sid, &recording_sid, &recording_url, &duration_secs],
            )
            .await?;
        Ok(updated)
    }

    /// Flag the matching call as a voicemail and attach its recording.
    pub async fn mark_voicemail(
        &self,
        call_sid: &str,
        recording_url: Option<&str>,
        duration_secs: Option<i32>,
    ) -> ApiResult<u64> {
        let conn = self.get_conn().await?;
        let updated = conn
            .execute(
                "UPDATE calls SET is_voicemail = TRUE, \
                 recording_url = COALESCE($2, recording_url), \
                 recording_duration_secs = COALESCE($3, recording_duration_secs), \
                 updated_at = NOW() \
                 WHERE call_sid = $1",
                &[&call_sid, &recording_url, &duration_secs],
            )
            .await?;
        Ok(updated)
    }

    /// Persist a completed transcription on the matching call row.
    pub async fn update_call_transcription(
        &self,
        call_sid: &str,
        transcription_text: &str,
    ) -> ApiResult<u64> {
        let conn = self.get_conn().await?;
        let updated = conn
            .execute(
                "UPDATE calls SET transcription_text = $2, \
                 transcription_status = 'completed', updated_at = NOW() \
                 WHERE call_sid = $1",
                &[&call_sid, &transcription_text],
            )
            .await?;
        Ok(updated)
    }

    // ========================================================================
    // MEETING RECORDING OPERATIONS
    // ========================================================================

    /// List meeting recordings joined to their meeting and host, newest first.
    pub async fn list_meeting_recordings(
        &self,
        limit: i64,
        offset: i64,
    ) -> ApiResult<(Vec<MeetingRecording>, u64)> {
        let conn = self.get_conn().await?;

        let total: i64 = conn
            .query_one("SELECT COUNT(*) FROM meeting_recordings", &[])
            .await?
            .get(0);

        let rows = conn
            .query(
                "SELECT r.id, r.meeting_id, r.recording_url, r.duration_secs, r.created_at, \
                 m.topic AS meeting_topic, m.started_at AS meeting_started_at, \
                 u.first_name AS host_first_name, u.last_name AS host_last_name, \
                 u.email AS host_email \
                 FROM meeting_recordings r \
                 JOIN meetings m ON m.id = r.meeting_id \
                 LEFT JOIN users u ON u.id = m.host_id \
                 ORDER BY r.created_at DESC LIMIT $1 OFFSET $2",
                &[&limit, &offset],
            )
            .await?;

        let recordings = rows
            .iter()
            .map(row_to_meeting_recording)
            .collect::<ApiResult<Vec<_>>>()?;
        Ok((recordings, total.max(0) as u64))
    }

    // ========================================================================
    // SCOREBOARD OPERATIONS
    // ========================================================================

    /// Per-rep call activity since the given instant.
    ///
    /// One row per active user, including users with no calls in the
    /// window. Ordering puts the busiest reps first.
    pub async fn scoreboard_rows(&self, since: Timestamp) -> ApiResult<Vec<ScoreboardRow>> {
        let conn = self.get_conn().await?;
        let rows = conn
            .query(
                "SELECT u.id AS user_id, u.first_name, u.last_name, u.email, \
                 COUNT(c.id) AS total_calls, \
                 COUNT(c.id) FILTER (WHERE c.status = 'completed') AS completed_calls, \
                 COUNT(c.id) FILTER (WHERE c.is_voicemail) AS voicemails, \
                 COALESCE(SUM(c.duration_secs), 0)::BIGINT AS total_talk_secs, \
                 COUNT(DISTINCT c.lead_id) AS leads_touched \
                 FROM users u \
                 LEFT JOIN calls c ON c.user_id = u.id AND c.created_at >= $1 \
                 WHERE u.is_active \
                 GROUP BY u.id, u.first_name, u.last_name, u.email \
                 ORDER BY total_calls DESC, u.id",
                &[&since],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ScoreboardRow {
                user_id: row.get("user_id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                email: row.get("email"),
                total_calls: row.get("total_calls"),
                completed_calls: row.get("completed_calls"),
                voicemails: row.get("voicemails"),
                total_talk_secs: row.get("total_talk_secs"),
                leads_touched: row.get("leads_touched"),
            })
            .collect())
    }
}

/// Filters applied by [`DbClient::list_leads`]. Unset fields do not
/// constrain the listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadFilter<'a> {
    /// Restrict to leads owned by one user.
    pub owner_id: Option<EntityId>,
    /// Exact match on the free-text status column.
    pub status: Option<&'a str>,
    /// Free-text term matched against name, email, company, and phone.
    pub search: Option<&'a str>,
}

/// One aggregated scoreboard row, as produced by the store.
#[derive(Debug, Clone)]
pub struct ScoreboardRow {
    pub user_id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub total_calls: i64,
    pub completed_calls: i64,
    pub voicemails: i64,
    pub total_talk_secs: i64,
    pub leads_touched: i64,
}

// ============================================================================
// ROW MAPPERS
// ============================================================================

fn row_to_user(row: &Row) -> ApiResult<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        user_id: row.try_get("id")?,
        auth_user_id: row.try_get("auth_user_id")?,
        auth_id: row.try_get("auth_id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: UserRole::parse_lenient(&role),
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_lead(row: &Row) -> ApiResult<Lead> {
    let tags_json: Option<JsonValue> = row.try_get("ai_tags")?;
    Ok(Lead {
        lead_id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        company: row.try_get("company")?,
        title: row.try_get("title")?,
        status: row.try_get("status")?,
        source: row.try_get("source")?,
        owner_id: row.try_get("owner_id")?,
        import_job_id: row.try_get("import_job_id")?,
        ai_tags: tags_json.as_ref().map(parse_tag_list),
        is_deleted: row.try_get("is_deleted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_import_job(row: &Row) -> ApiResult<ImportJob> {
    let status: String = row.try_get("status")?;
    Ok(ImportJob {
        import_job_id: row.try_get("id")?,
        file_name: row.try_get("file_name")?,
        status: status.parse()?,
        total_rows: row.try_get("total_rows")?,
        processed_rows: row.try_get("processed_rows")?,
        failed_rows: row.try_get("failed_rows")?,
        error_message: row.try_get("error_message")?,
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}

fn row_to_call(row: &Row) -> ApiResult<Call> {
    let direction: String = row.try_get("direction")?;
    let status: String = row.try_get("status")?;
    let transcription_status: Option<String> = row.try_get("transcription_status")?;
    Ok(Call {
        call_id: row.try_get("id")?,
        call_sid: row.try_get("call_sid")?,
        direction: direction.parse::<CallDirection>()?,
        from_number: row.try_get("from_number")?,
        to_number: row.try_get("to_number")?,
        status: status.parse::<CallStatus>()?,
        duration_secs: row.try_get("duration_secs")?,
        recording_sid: row.try_get("recording_sid")?,
        recording_url: row.try_get("recording_url")?,
        recording_duration_secs: row.try_get("recording_duration_secs")?,
        is_voicemail: row.try_get("is_voicemail")?,
        disposition: row.try_get("disposition")?,
        transcription_text: row.try_get("transcription_text")?,
        transcription_status: transcription_status
            .as_deref()
            .and_then(TranscriptionStatus::from_provider),
        lead_id: row.try_get("lead_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_meeting_recording(row: &Row) -> ApiResult<MeetingRecording> {
    let host_first: Option<String> = row.try_get("host_first_name")?;
    let host_last: Option<String> = row.try_get("host_last_name")?;
    let host_name = match (host_first.as_deref(), host_last.as_deref()) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first.to_string()),
        (None, Some(last)) => Some(last.to_string()),
        (None, None) => None,
    };
    Ok(MeetingRecording {
        recording_id: row.try_get("id")?,
        meeting_id: row.try_get("meeting_id")?,
        recording_url: row.try_get("recording_url")?,
        duration_secs: row.try_get("duration_secs")?,
        created_at: row.try_get("created_at")?,
        meeting_topic: row.try_get("meeting_topic")?,
        meeting_started_at: row.try_get("meeting_started_at")?,
        host_name,
        host_email: row.try_get("host_email")?,
    })
}

// ============================================================================
// SEARCH HELPERS
// ============================================================================

/// SQL predicate matching a lead against the ILIKE pattern bound at
/// placeholder `n`.
fn lead_search_predicate(n: usize) -> String {
    format!(
        "(first_name ILIKE ${0} OR last_name ILIKE ${0} OR email ILIKE ${0} \
         OR company ILIKE ${0} OR phone ILIKE ${0})",
        n
    )
}

/// Turn a raw search term into an ILIKE pattern, or `None` when the term
/// is empty after trimming.
fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    Some(format!("%{}%", escape_like(term)))
}

/// Escape LIKE/ILIKE metacharacters so a search term matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("under_score"), "under\\_score");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_search_pattern_wraps_and_filters() {
        assert_eq!(search_pattern(Some("acme")), Some("%acme%".to_string()));
        assert_eq!(search_pattern(Some("  acme  ")), Some("%acme%".to_string()));
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some("")), None);
        assert_eq!(search_pattern(None), None);
    }

    #[test]
    fn test_lead_search_predicate_numbers_placeholder() {
        let predicate = lead_search_predicate(3);
        assert!(predicate.contains("first_name ILIKE $3"));
        assert!(predicate.contains("phone ILIKE $3"));
        assert!(!predicate.contains("$1"));
    }

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "leadline");
        assert_eq!(config.max_size, 16);
        assert!(config.url.is_none());
    }

    #[test]
    fn test_pool_creation_is_lazy() {
        // Pool construction must not touch the network; connections are
        // only dialed on first checkout.
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..DbConfig::default()
        };
        let client = DbClient::from_config(&config);
        assert!(client.is_ok());
    }
}
