//! Identity types for Leadline entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
///
/// Used for rows this service inserts itself (calls created by the dialer
/// webhook); rows owned by the hosted schema keep whatever ids it assigned.
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}
