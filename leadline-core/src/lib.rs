//! Leadline Core - Entity Types
//!
//! Pure data structures and the arithmetic that goes with them. The API
//! crate depends on this; nothing here touches the network or the store.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod tags;

pub use entities::{Call, ImportJob, Lead, MeetingRecording, User};
pub use enums::{CallDirection, CallStatus, ImportJobStatus, TranscriptionStatus, UserRole};
pub use error::{CoreError, CoreResult};
pub use identity::{new_entity_id, EntityId, Timestamp};
pub use pagination::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use tags::{aggregate_tags, parse_tag_list, AiTag, TagCount};

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
