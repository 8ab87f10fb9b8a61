//! End-to-end smoke tests for the Leadline API
//!
//! These run against a real PostgreSQL instance and are gated behind the
//! `db-tests` feature. `LEADLINE_DB_*` environment variables point them at
//! the store; rows they create are tagged with fresh UUIDs so reruns do not
//! collide.

use leadline_api::{ApiResult, DbClient, DbConfig, LeadFilter};
use leadline_core::*;
use uuid::Uuid;

fn test_db() -> ApiResult<DbClient> {
    let config = DbConfig::from_env();
    DbClient::from_config(&config)
}

#[tokio::test]
#[cfg(feature = "db-tests")]
async fn smoke_test_store_connectivity() -> ApiResult<()> {
    let db = test_db()?;

    db.health_check().await?;

    // A provider UID nobody has maps to no user, via both identity columns.
    let missing = db.find_user_by_provider_id(Uuid::now_v7()).await?;
    assert!(missing.is_none());

    println!("✅ Store connectivity verified");
    Ok(())
}

#[tokio::test]
#[cfg(feature = "db-tests")]
async fn smoke_test_call_lifecycle_chain() -> ApiResult<()> {
    let db = test_db()?;
    let call_sid = format!("CA{}", Uuid::now_v7().simple());
    let recording_sid = format!("RE{}", Uuid::now_v7().simple());

    // Insert the row the voice webhook would create.
    let call = Call::new(call_sid.clone(), CallDirection::Outbound)
        .with_numbers(
            Some("+15550001111".to_string()),
            Some("+15550002222".to_string()),
        )
        .with_status(CallStatus::Queued);
    db.insert_call(&call).await?;

    // Re-delivery of the same SID must not duplicate the row.
    db.insert_call(&call).await?;

    let found = db
        .find_call_by_sid(&call_sid)
        .await?
        .expect("inserted call should be found by SID");
    assert_eq!(found.call_sid, call_sid);
    assert_eq!(found.direction, CallDirection::Outbound);
    assert_eq!(found.status, CallStatus::Queued);

    // Status, recording, and transcription callbacks, in delivery order.
    assert_eq!(
        db.update_call_status(&call_sid, Some(CallStatus::Completed), Some(42))
            .await?,
        1
    );
    assert_eq!(
        db.update_call_recording(
            &call_sid,
            Some(&recording_sid),
            Some("https://media.example.com/recordings/smoke.mp3"),
            Some(40),
        )
        .await?,
        1
    );
    assert_eq!(
        db.update_call_transcription(&call_sid, "Smoke test transcription")
            .await?,
        1
    );

    let settled = db
        .find_call_by_sid(&call_sid)
        .await?
        .expect("settled call should still be found");
    assert_eq!(settled.status, CallStatus::Completed);
    assert_eq!(settled.duration_secs, Some(42));
    assert!(settled.has_recording());
    assert_eq!(settled.recording_sid.as_deref(), Some(recording_sid.as_str()));
    assert_eq!(
        settled.transcription_status,
        Some(TranscriptionStatus::Completed)
    );
    assert_eq!(
        settled.transcription_text.as_deref(),
        Some("Smoke test transcription")
    );

    println!("✅ Call lifecycle chain passed");
    Ok(())
}

#[tokio::test]
#[cfg(feature = "db-tests")]
async fn smoke_test_voicemail_flow() -> ApiResult<()> {
    let db = test_db()?;
    let call_sid = format!("CA{}", Uuid::now_v7().simple());

    let call = Call::new(call_sid.clone(), CallDirection::Inbound)
        .with_status(CallStatus::InProgress);
    db.insert_call(&call).await?;

    let updated = db
        .mark_voicemail(
            &call_sid,
            Some("https://media.example.com/recordings/voicemail.mp3"),
            Some(21),
        )
        .await?;
    assert_eq!(updated, 1);

    let row = db
        .find_call_by_sid(&call_sid)
        .await?
        .expect("voicemail call should be found");
    assert!(row.is_voicemail);
    assert_eq!(row.recording_duration_secs, Some(21));

    // Callbacks for SIDs we never saw are a no-op, not an error.
    let phantom = format!("CA{}", Uuid::now_v7().simple());
    assert_eq!(db.mark_voicemail(&phantom, None, None).await?, 0);

    println!("✅ Voicemail flow passed");
    Ok(())
}

#[tokio::test]
#[cfg(feature = "db-tests")]
async fn smoke_test_listing_surfaces() -> ApiResult<()> {
    let db = test_db()?;

    let (leads, total) = db.list_leads(LeadFilter::default(), 10, 0).await?;
    assert!(leads.len() <= 10);
    assert!(total >= leads.len() as u64);
    assert!(leads.iter().all(|lead| !lead.is_deleted));

    let tag_rows = db.lead_tag_rows().await?;
    let tags = aggregate_tags(tag_rows.iter().map(parse_tag_list));
    for pair in tags.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }

    let (jobs, job_total) = db.list_import_jobs(10, 0).await?;
    assert!(jobs.len() <= 10);
    assert!(job_total >= jobs.len() as u64);

    let (recordings, recording_total) = db.list_meeting_recordings(10, 0).await?;
    assert!(recordings.len() <= 10);
    assert!(recording_total >= recordings.len() as u64);

    println!("✅ Listing surfaces passed");
    Ok(())
}

#[tokio::test]
#[cfg(feature = "db-tests")]
async fn smoke_test_scoreboard_window() -> ApiResult<()> {
    let db = test_db()?;

    let since = chrono::Utc::now() - chrono::Duration::days(7);
    let rows = db.scoreboard_rows(since).await?;

    for row in &rows {
        assert!(row.completed_calls <= row.total_calls);
        assert!(row.voicemails <= row.total_calls);
        assert!(row.total_talk_secs >= 0);
        assert!(row.leads_touched <= row.total_calls);
    }

    // Busiest reps first.
    for pair in rows.windows(2) {
        assert!(pair[0].total_calls >= pair[1].total_calls);
    }

    println!("✅ Scoreboard window passed");
    Ok(())
}
