//! Scoreboard API types

use crate::db::ScoreboardRow;
use leadline_core::EntityId;
use serde::{Deserialize, Serialize};

/// Default activity window in days.
pub const DEFAULT_SCOREBOARD_DAYS: i64 = 7;

/// Longest selectable activity window in days.
pub const MAX_SCOREBOARD_DAYS: i64 = 90;

/// Query parameters for the scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreboardQuery {
    /// Activity window in days (default 7, clamped to 1..=90)
    pub days: Option<i64>,
}

impl ScoreboardQuery {
    pub fn window_days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_SCOREBOARD_DAYS)
            .clamp(1, MAX_SCOREBOARD_DAYS)
    }
}

/// One rep's aggregated call activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreboardEntry {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub user_id: EntityId,
    /// Display name, falling back to the email address
    pub name: String,
    /// Calls placed in the window
    pub calls: i64,
    /// Calls that completed (connected and ended normally)
    pub connected: i64,
    /// Total talk time across completed calls, in seconds
    pub talk_secs: i64,
    /// Voicemails left
    pub voicemails: i64,
    /// Distinct leads dialed
    pub leads_dialed: i64,
}

impl From<ScoreboardRow> for ScoreboardEntry {
    fn from(row: ScoreboardRow) -> Self {
        let name = match (row.first_name.as_deref(), row.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => row.email.clone(),
        };

        Self {
            user_id: row.user_id,
            name,
            calls: row.total_calls,
            connected: row.completed_calls,
            talk_secs: row.total_talk_secs,
            voicemails: row.voicemails,
            leads_dialed: row.leads_touched,
        }
    }
}

/// Response for the scoreboard endpoint, busiest reps first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScoreboardResponse {
    pub entries: Vec<ScoreboardEntry>,
    /// The window the aggregates cover, echoed back after clamping
    pub window_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::new_entity_id;

    #[test]
    fn test_window_days_clamps() {
        assert_eq!(ScoreboardQuery { days: None }.window_days(), 7);
        assert_eq!(ScoreboardQuery { days: Some(0) }.window_days(), 1);
        assert_eq!(ScoreboardQuery { days: Some(30) }.window_days(), 30);
        assert_eq!(ScoreboardQuery { days: Some(365) }.window_days(), 90);
    }

    #[test]
    fn test_entry_name_falls_back_to_email() {
        let row = ScoreboardRow {
            user_id: new_entity_id(),
            first_name: None,
            last_name: None,
            email: "rep@leadline.app".to_string(),
            total_calls: 3,
            completed_calls: 2,
            voicemails: 1,
            total_talk_secs: 180,
            leads_touched: 2,
        };
        let entry = ScoreboardEntry::from(row);
        assert_eq!(entry.name, "rep@leadline.app");
        assert_eq!(entry.calls, 3);
        assert_eq!(entry.connected, 2);
    }
}
