//! Leadline Test Utilities
//!
//! Centralized test infrastructure for the Leadline workspace:
//! - Proptest generators for all entity types
//! - A session token minter standing in for the hosted auth provider
//! - Test fixtures for common scenarios
//! - Custom assertions for Leadline-specific invariants

// Re-export core types for convenience
pub use leadline_core::{
    aggregate_tags, new_entity_id, parse_tag_list, AiTag, Call, CallDirection, CallStatus,
    CoreError, CoreResult, EntityId, ImportJob, ImportJobStatus, Lead, MeetingRecording,
    PageRequest, TagCount, Timestamp, TranscriptionStatus, User, UserRole, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// SESSION TOKEN MINTER (AUTH PROVIDER STAND-IN)
// ============================================================================

/// Claims shape of a provider-minted session token.
///
/// Mirrors what the hosted auth provider puts in its HS256 tokens: the
/// provider-side user id in `sub`, the audience, expiry, and optionally the
/// issue time and email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintedClaims {
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Mints session tokens the way the hosted auth provider would.
///
/// Tests that drive the API router need real HS256 tokens; this minter signs
/// them with a known secret so the API's verification path runs unchanged.
#[derive(Debug, Clone)]
pub struct TokenMinter {
    secret: String,
    audience: String,
}

impl TokenMinter {
    /// Minter for the default "authenticated" audience.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            audience: "authenticated".to_string(),
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Mint a token for `provider_uid` valid for one hour.
    pub fn mint(&self, provider_uid: Uuid) -> String {
        self.mint_with_ttl(provider_uid, 3600)
    }

    /// Mint a token expiring `ttl_secs` from now. Negative values produce an
    /// already-expired token.
    pub fn mint_with_ttl(&self, provider_uid: Uuid, ttl_secs: i64) -> String {
        let now = Utc::now().timestamp();
        self.encode(&MintedClaims {
            sub: provider_uid.to_string(),
            aud: self.audience.clone(),
            exp: now + ttl_secs,
            iat: Some(now),
            email: None,
        })
    }

    /// Mint a token that expired well past any clock skew tolerance.
    pub fn mint_expired(&self, provider_uid: Uuid) -> String {
        self.mint_with_ttl(provider_uid, -86_400)
    }

    /// Mint a valid token carrying an email claim.
    pub fn mint_with_email(&self, provider_uid: Uuid, email: &str) -> String {
        let now = Utc::now().timestamp();
        self.encode(&MintedClaims {
            sub: provider_uid.to_string(),
            aud: self.audience.clone(),
            exp: now + 3600,
            iat: Some(now),
            email: Some(email.to_string()),
        })
    }

    /// Mint a token with arbitrary claims, for malformed-claim tests.
    pub fn mint_claims(&self, claims: &MintedClaims) -> String {
        self.encode(claims)
    }

    fn encode(&self, claims: &MintedClaims) -> String {
        let key = jsonwebtoken::EncodingKey::from_secret(self.secret.as_bytes());
        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
        jsonwebtoken::encode(&header, claims, &key).expect("HS256 signing cannot fail")
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating Leadline entity types.

    use super::*;
    use proptest::prelude::*;

    // === Identity Generators ===

    /// Generate a random UUID.
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a random EntityId.
    pub fn arb_entity_id() -> impl Strategy<Value = EntityId> {
        arb_uuid()
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64)
            .prop_map(|secs| chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now))
    }

    // === Provider Identifier Generators ===

    /// Generate a provider call SID ("CA" + 32 hex chars).
    pub fn arb_call_sid() -> impl Strategy<Value = String> {
        "[0-9a-f]{32}".prop_map(|hex| format!("CA{}", hex))
    }

    /// Generate a provider recording SID ("RE" + 32 hex chars).
    pub fn arb_recording_sid() -> impl Strategy<Value = String> {
        "[0-9a-f]{32}".prop_map(|hex| format!("RE{}", hex))
    }

    /// Generate an E.164-shaped North American phone number.
    pub fn arb_phone_number() -> impl Strategy<Value = String> {
        "[2-9][0-9]{9}".prop_map(|digits| format!("+1{}", digits))
    }

    /// Generate a plausible email address.
    pub fn arb_email() -> impl Strategy<Value = String> {
        "[a-z]{3,12}".prop_map(|user| format!("{}@example.com", user))
    }

    // === Enum Generators ===

    /// Generate a UserRole variant.
    pub fn arb_user_role() -> impl Strategy<Value = UserRole> {
        prop_oneof![
            Just(UserRole::Admin),
            Just(UserRole::Manager),
            Just(UserRole::Rep),
        ]
    }

    /// Generate an ImportJobStatus variant.
    pub fn arb_import_job_status() -> impl Strategy<Value = ImportJobStatus> {
        prop_oneof![
            Just(ImportJobStatus::Pending),
            Just(ImportJobStatus::Processing),
            Just(ImportJobStatus::Completed),
            Just(ImportJobStatus::Failed),
            Just(ImportJobStatus::Cancelled),
        ]
    }

    /// Generate a CallDirection variant.
    pub fn arb_call_direction() -> impl Strategy<Value = CallDirection> {
        prop_oneof![Just(CallDirection::Inbound), Just(CallDirection::Outbound)]
    }

    /// Generate a CallStatus variant.
    pub fn arb_call_status() -> impl Strategy<Value = CallStatus> {
        prop_oneof![
            Just(CallStatus::Queued),
            Just(CallStatus::Initiated),
            Just(CallStatus::Ringing),
            Just(CallStatus::InProgress),
            Just(CallStatus::Completed),
            Just(CallStatus::Busy),
            Just(CallStatus::NoAnswer),
            Just(CallStatus::Failed),
            Just(CallStatus::Canceled),
        ]
    }

    /// Generate a TranscriptionStatus variant.
    pub fn arb_transcription_status() -> impl Strategy<Value = TranscriptionStatus> {
        prop_oneof![
            Just(TranscriptionStatus::InProgress),
            Just(TranscriptionStatus::Completed),
            Just(TranscriptionStatus::Failed),
        ]
    }

    /// Generate a pipeline status from the dashboard's vocabulary.
    pub fn arb_lead_status() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("new".to_string()),
            Just("contacted".to_string()),
            Just("qualified".to_string()),
            Just("unqualified".to_string()),
            Just("customer".to_string()),
        ]
    }

    // === Tag Generators ===

    /// Generate an AiTag with non-empty label and category.
    pub fn arb_ai_tag() -> impl Strategy<Value = AiTag> {
        ("[A-Za-z]{1,24}", "[a-z]{1,16}")
            .prop_map(|(label, category)| AiTag::new(label, category))
    }

    /// Generate a lead's tag list (0-5 tags).
    pub fn arb_tag_list() -> impl Strategy<Value = Vec<AiTag>> {
        prop::collection::vec(arb_ai_tag(), 0..6)
    }

    // === Pagination Generators ===

    /// Generate a PageRequest from raw, possibly-missing query values.
    pub fn arb_page_request() -> impl Strategy<Value = PageRequest> {
        (
            prop::option::of(0u32..1_000),
            prop::option::of(0u32..500),
        )
            .prop_map(|(page, per_page)| PageRequest::new(page, per_page))
    }

    // === Entity Generators ===

    /// Generate a Lead. Generated rows are never soft-deleted, matching what
    /// the store hands back to list queries.
    pub fn arb_lead() -> impl Strategy<Value = Lead> {
        (
            arb_entity_id(),
            prop::option::of("[A-Z][a-z]{2,10}"),
            prop::option::of("[A-Z][a-z]{2,12}"),
            prop::option::of(arb_email()),
            prop::option::of(arb_phone_number()),
            prop::option::of("[A-Z][a-z]{2,14}"),
            prop::option::of(arb_lead_status()),
            prop::option::of(arb_entity_id()),
            prop::option::of(arb_tag_list()),
            arb_timestamp(),
        )
            .prop_map(
                |(
                    lead_id,
                    first_name,
                    last_name,
                    email,
                    phone,
                    company,
                    status,
                    owner_id,
                    ai_tags,
                    created_at,
                )| {
                    Lead {
                        lead_id,
                        first_name,
                        last_name,
                        email,
                        phone,
                        company,
                        title: None,
                        status,
                        source: Some("import".to_string()),
                        owner_id,
                        import_job_id: None,
                        ai_tags,
                        is_deleted: false,
                        created_at,
                        updated_at: created_at,
                    }
                },
            )
    }

    /// Generate an ImportJob whose row counters and completion time are
    /// consistent with its status.
    pub fn arb_import_job() -> impl Strategy<Value = ImportJob> {
        (
            arb_entity_id(),
            "[a-z0-9_-]{4,20}",
            arb_import_job_status(),
            prop::option::of(0i32..10_000),
            prop::option::of(arb_entity_id()),
            arb_timestamp(),
        )
            .prop_map(
                |(import_job_id, file_stem, status, total_rows, created_by, created_at)| {
                    let terminal = !status.is_cancellable();
                    ImportJob {
                        import_job_id,
                        file_name: format!("{}.csv", file_stem),
                        status,
                        total_rows,
                        processed_rows: total_rows.map(|t| {
                            if status == ImportJobStatus::Completed {
                                t
                            } else {
                                t / 2
                            }
                        }),
                        failed_rows: Some(0),
                        error_message: (status == ImportJobStatus::Failed)
                            .then(|| "row 7: invalid email".to_string()),
                        created_by,
                        created_at,
                        updated_at: created_at,
                        completed_at: terminal.then_some(created_at),
                    }
                },
            )
    }

    /// Generate a Call with a provider-shaped SID.
    pub fn arb_call() -> impl Strategy<Value = Call> {
        (
            arb_call_sid(),
            arb_call_direction(),
            arb_call_status(),
            prop::option::of(arb_phone_number()),
            prop::option::of(arb_phone_number()),
            prop::option::of(0i32..7_200),
            prop::option::of(arb_entity_id()),
            prop::option::of(arb_entity_id()),
            any::<bool>(),
        )
            .prop_map(
                |(call_sid, direction, status, from, to, duration, lead_id, user_id, voicemail)| {
                    let mut call = Call::new(call_sid, direction)
                        .with_numbers(from, to)
                        .with_status(status);
                    call.duration_secs = duration;
                    call.lead_id = lead_id;
                    call.user_id = user_id;
                    call.is_voicemail = voicemail;
                    call
                },
            )
    }

    /// Generate a User row.
    pub fn arb_user() -> impl Strategy<Value = User> {
        (
            arb_entity_id(),
            prop::option::of(arb_uuid()),
            arb_email(),
            prop::option::of("[A-Z][a-z]{2,10}"),
            prop::option::of("[A-Z][a-z]{2,12}"),
            arb_user_role(),
            any::<bool>(),
            arb_timestamp(),
        )
            .prop_map(
                |(user_id, auth_user_id, email, first_name, last_name, role, is_active, created_at)| {
                    User {
                        user_id,
                        auth_user_id,
                        auth_id: None,
                        email,
                        first_name,
                        last_name,
                        role,
                        is_active,
                        created_at,
                    }
                },
            )
    }

    /// Generate a MeetingRecording joined row.
    pub fn arb_meeting_recording() -> impl Strategy<Value = MeetingRecording> {
        (
            arb_entity_id(),
            arb_entity_id(),
            "[a-z0-9]{8,16}",
            prop::option::of(60i32..7_200),
            arb_timestamp(),
            prop::option::of("[A-Z][a-z ]{4,30}"),
        )
            .prop_map(
                |(recording_id, meeting_id, slug, duration_secs, created_at, meeting_topic)| {
                    MeetingRecording {
                        recording_id,
                        meeting_id,
                        recording_url: format!("https://media.example.com/recordings/{}.mp4", slug),
                        duration_secs,
                        created_at,
                        meeting_topic,
                        meeting_started_at: Some(created_at),
                        host_name: None,
                        host_email: None,
                    }
                },
            )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;

    /// Shared secret for router tests; long enough to pass production checks.
    pub const TEST_JWT_SECRET: &str = "leadline-test-secret-0123456789abcdef";

    /// An active user row with the given role.
    pub fn user_with_role(role: UserRole) -> User {
        let now = Utc::now();
        User {
            user_id: new_entity_id(),
            auth_user_id: Some(Uuid::now_v7()),
            auth_id: None,
            email: format!("{}@leadline.test", role.as_str()),
            first_name: Some("Test".to_string()),
            last_name: Some(role.as_str().to_string()),
            role,
            is_active: true,
            created_at: now,
        }
    }

    pub fn admin_user() -> User {
        user_with_role(UserRole::Admin)
    }

    pub fn manager_user() -> User {
        user_with_role(UserRole::Manager)
    }

    pub fn rep_user() -> User {
        user_with_role(UserRole::Rep)
    }

    /// A minimal unowned lead.
    pub fn sample_lead() -> Lead {
        let now = Utc::now();
        Lead {
            lead_id: new_entity_id(),
            first_name: Some("Jordan".to_string()),
            last_name: Some("Vale".to_string()),
            email: Some("jordan.vale@example.com".to_string()),
            phone: Some("+15550100200".to_string()),
            company: Some("Vale Logistics".to_string()),
            title: Some("VP Operations".to_string()),
            status: Some("new".to_string()),
            source: Some("import".to_string()),
            owner_id: None,
            import_job_id: None,
            ai_tags: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// A lead assigned to a specific rep.
    pub fn owned_lead(owner_id: EntityId) -> Lead {
        let mut lead = sample_lead();
        lead.owner_id = Some(owner_id);
        lead
    }

    /// A lead that arrived through a specific import job.
    pub fn imported_lead(import_job_id: EntityId) -> Lead {
        let mut lead = sample_lead();
        lead.import_job_id = Some(import_job_id);
        lead
    }

    /// A lead carrying enrichment tags.
    pub fn tagged_lead(tags: Vec<AiTag>) -> Lead {
        let mut lead = sample_lead();
        lead.ai_tags = Some(tags);
        lead
    }

    /// An import job in the given status with consistent counters.
    pub fn import_job_with_status(status: ImportJobStatus) -> ImportJob {
        let now = Utc::now();
        let terminal = !status.is_cancellable();
        ImportJob {
            import_job_id: new_entity_id(),
            file_name: "q3-leads.csv".to_string(),
            status,
            total_rows: Some(120),
            processed_rows: Some(if status == ImportJobStatus::Completed {
                120
            } else {
                48
            }),
            failed_rows: Some(0),
            error_message: (status == ImportJobStatus::Failed)
                .then(|| "row 7: invalid email".to_string()),
            created_by: Some(new_entity_id()),
            created_at: now - chrono::Duration::minutes(10),
            updated_at: now,
            completed_at: terminal.then_some(now),
        }
    }

    pub fn pending_job() -> ImportJob {
        import_job_with_status(ImportJobStatus::Pending)
    }

    pub fn processing_job() -> ImportJob {
        import_job_with_status(ImportJobStatus::Processing)
    }

    pub fn completed_job() -> ImportJob {
        import_job_with_status(ImportJobStatus::Completed)
    }

    /// An outbound call as the dial webhook first records it.
    pub fn outbound_call(call_sid: &str) -> Call {
        Call::new(call_sid.to_string(), CallDirection::Outbound)
            .with_numbers(Some("+15550100300".to_string()), Some("+15550100400".to_string()))
    }

    /// A completed call with a stored recording.
    pub fn recorded_call(call_sid: &str) -> Call {
        let mut call = outbound_call(call_sid).with_status(CallStatus::Completed);
        call.duration_secs = Some(245);
        call.recording_sid = Some("RE00000000000000000000000000000001".to_string());
        call.recording_url =
            Some("https://api.twilio.com/recordings/RE00000000000000000000000000000001".to_string());
        call.recording_duration_secs = Some(243);
        call
    }

    /// An inbound call that went to voicemail and was transcribed.
    pub fn voicemail_call(call_sid: &str) -> Call {
        let mut call = Call::new(call_sid.to_string(), CallDirection::Inbound)
            .with_status(CallStatus::Completed);
        call.is_voicemail = true;
        call.transcription_text = Some("Hi, please call me back about the quote.".to_string());
        call.transcription_status = Some(TranscriptionStatus::Completed);
        call
    }

    /// A meeting recording joined to its meeting and host.
    pub fn meeting_recording() -> MeetingRecording {
        let now = Utc::now();
        MeetingRecording {
            recording_id: new_entity_id(),
            meeting_id: new_entity_id(),
            recording_url: "https://media.example.com/recordings/kickoff.mp4".to_string(),
            duration_secs: Some(1800),
            created_at: now,
            meeting_topic: Some("Quarterly kickoff".to_string()),
            meeting_started_at: Some(now - chrono::Duration::minutes(30)),
            host_name: Some("Sam Ortiz".to_string()),
            host_email: Some("sam@leadline.test".to_string()),
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for Leadline-specific invariants.

    use super::*;

    /// Assert that a Result is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug, E: std::fmt::Debug>(result: &Result<T, E>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a Result is Err.
    #[track_caller]
    pub fn assert_err<T: std::fmt::Debug, E: std::fmt::Debug>(result: &Result<T, E>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    /// Assert the tag aggregation ordering: descending count, then ascending
    /// label, then ascending category.
    #[track_caller]
    pub fn assert_tag_counts_sorted(counts: &[TagCount]) {
        for pair in counts.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let in_order = a.count > b.count
                || (a.count == b.count
                    && (a.label.as_str(), a.category.as_str())
                        <= (b.label.as_str(), b.category.as_str()));
            assert!(in_order, "tag counts out of order: {:?} before {:?}", a, b);
        }
    }

    /// Assert that every tag has non-empty label and category.
    #[track_caller]
    pub fn assert_tags_well_formed(tags: &[AiTag]) {
        for tag in tags {
            assert!(!tag.label.trim().is_empty(), "tag with empty label: {:?}", tag);
            assert!(
                !tag.category.trim().is_empty(),
                "tag with empty category: {:?}",
                tag
            );
        }
    }

    /// Assert that a page of rows fits the request that produced it.
    #[track_caller]
    pub fn assert_page_fits(page: &PageRequest, returned: usize) {
        assert!(
            returned as i64 <= page.limit(),
            "page returned {} rows, limit is {}",
            returned,
            page.limit()
        );
    }

    /// Assert that an import job's counters are internally consistent.
    #[track_caller]
    pub fn assert_job_counters_consistent(job: &ImportJob) {
        if let (Some(total), Some(processed)) = (job.total_rows, job.processed_rows) {
            assert!(
                processed <= total,
                "job {} processed {} of {} rows",
                job.import_job_id,
                processed,
                total
            );
        }
        let terminal = !job.status.is_cancellable();
        assert_eq!(
            job.completed_at.is_some(),
            terminal,
            "job {} completed_at does not match status {:?}",
            job.import_job_id,
            job.status
        );
    }

    /// Assert that a call row can be correlated with provider webhooks.
    #[track_caller]
    pub fn assert_call_correlatable(call: &Call) {
        assert!(
            !call.call_sid.trim().is_empty(),
            "call {} has no provider SID",
            call.call_id
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_fixtures() {
        assert_eq!(fixtures::admin_user().role, UserRole::Admin);
        assert_eq!(fixtures::manager_user().role, UserRole::Manager);
        assert_eq!(fixtures::rep_user().role, UserRole::Rep);
        assert!(fixtures::rep_user().is_active);
    }

    #[test]
    fn test_owned_lead_fixture() {
        let owner = new_entity_id();
        let lead = fixtures::owned_lead(owner);
        assert_eq!(lead.owner_id, Some(owner));
        assert!(!lead.is_deleted);
    }

    #[test]
    fn test_job_fixtures_are_consistent() {
        for status in [
            ImportJobStatus::Pending,
            ImportJobStatus::Processing,
            ImportJobStatus::Completed,
            ImportJobStatus::Failed,
            ImportJobStatus::Cancelled,
        ] {
            assertions::assert_job_counters_consistent(&fixtures::import_job_with_status(status));
        }
    }

    #[test]
    fn test_recorded_call_fixture_has_recording() {
        let call = fixtures::recorded_call("CA00000000000000000000000000000001");
        assert!(call.has_recording());
        assert_eq!(call.status, CallStatus::Completed);
        assertions::assert_call_correlatable(&call);
    }

    #[test]
    fn test_voicemail_call_fixture() {
        let call = fixtures::voicemail_call("CA00000000000000000000000000000002");
        assert!(call.is_voicemail);
        assert_eq!(call.direction, CallDirection::Inbound);
        assert_eq!(
            call.transcription_status,
            Some(TranscriptionStatus::Completed)
        );
    }

    #[test]
    fn test_minted_token_decodes_with_same_secret() {
        let minter = TokenMinter::new(fixtures::TEST_JWT_SECRET);
        let uid = Uuid::now_v7();
        let token = minter.mint_with_email(uid, "rep@leadline.test");

        let key = jsonwebtoken::DecodingKey::from_secret(fixtures::TEST_JWT_SECRET.as_bytes());
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_audience(&["authenticated"]);

        let data = jsonwebtoken::decode::<MintedClaims>(&token, &key, &validation)
            .expect("minted token should decode");
        assert_eq!(data.claims.sub, uid.to_string());
        assert_eq!(data.claims.email.as_deref(), Some("rep@leadline.test"));
    }

    #[test]
    fn test_expired_token_is_in_the_past() {
        let minter = TokenMinter::new("secret");
        let token = minter.mint_expired(Uuid::now_v7());

        let key = jsonwebtoken::DecodingKey::from_secret(b"secret");
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_audience(&["authenticated"]);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<MintedClaims>(&token, &key, &validation)
            .expect("expired token still decodes with exp validation off");
        assert!(data.claims.exp < Utc::now().timestamp());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_generated_leads_are_live_rows(lead in generators::arb_lead()) {
            prop_assert!(!lead.is_deleted);
            if let Some(tags) = &lead.ai_tags {
                assertions::assert_tags_well_formed(tags);
            }
        }

        #[test]
        fn prop_generated_jobs_are_consistent(job in generators::arb_import_job()) {
            assertions::assert_job_counters_consistent(&job);
        }

        #[test]
        fn prop_generated_calls_carry_provider_sids(call in generators::arb_call()) {
            prop_assert!(call.call_sid.starts_with("CA"));
            prop_assert_eq!(call.call_sid.len(), 34);
        }

        #[test]
        fn prop_aggregation_of_generated_tags_is_sorted(
            rows in prop::collection::vec(generators::arb_tag_list(), 0..12)
        ) {
            let counts = aggregate_tags(rows);
            assertions::assert_tag_counts_sorted(&counts);
        }

        #[test]
        fn prop_page_request_bounds_hold(page in generators::arb_page_request()) {
            prop_assert!(page.page() >= 1);
            prop_assert!(page.per_page() >= 1);
            prop_assert!(page.per_page() <= MAX_PAGE_SIZE);
            prop_assert!(page.offset() >= 0);
        }
    }
}
