//! API Request and Response Types
//!
//! Wire shapes for every REST endpoint and provider webhook. Entities
//! from `leadline-core` serialize directly; the types here are the
//! envelopes, query parameters, and form payloads around them.

// Lead types
mod lead;
pub use lead::*;

// Import job types
mod import_job;
pub use import_job::*;

// Call webhook types
mod call;
pub use call::*;

// Meeting recording types
mod recording;
pub use recording::*;

// Scoreboard types
mod scoreboard;
pub use scoreboard::*;

// Dialer token types
mod dialer;
pub use dialer::*;

// User types
mod user;
pub use user::*;

/// Default row count for offset-style listings.
pub const DEFAULT_LIST_LIMIT: i64 = 25;

/// Upper bound on offset-style listing size; larger requests are clamped.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Clamp a caller-supplied limit into `1..=MAX_LIST_LIMIT`.
///
/// Shared by every offset-style query type. serde's `flatten` does not
/// compose with urlencoded numeric fields, so the query structs spell the
/// fields out and delegate the arithmetic here.
pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Clamp a caller-supplied offset to be non-negative.
pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit_bounds() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_clamp_offset_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }
}
