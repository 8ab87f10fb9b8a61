//! Fuzz test for the ai_tags column decoder
//!
//! The ai_tags column is written by an external enrichment pipeline and is
//! untrusted input. This target feeds arbitrary JSON through the decode to
//! find:
//! - Panics or crashes
//! - Infinite loops
//! - Memory safety issues
//!
//! Run with: cargo +nightly fuzz run tag_parse_fuzz -- -max_total_time=60

#![no_main]

use leadline_core::parse_tag_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The store hands the decoder a parsed Value, never raw bytes, so only
    // inputs that survive the JSON decode are interesting.
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let tags = parse_tag_list(&value);

        // Basic invariants that should always hold:
        // 1. Every surviving tag has non-empty, trimmed fields
        for tag in &tags {
            assert!(!tag.label.is_empty(), "parsed label should be non-empty");
            assert!(
                !tag.category.is_empty(),
                "parsed category should be non-empty"
            );
            assert_eq!(tag.label, tag.label.trim(), "label should be trimmed");
            assert_eq!(
                tag.category,
                tag.category.trim(),
                "category should be trimmed"
            );
        }

        // 2. A non-array value yields no tags
        if !value.is_array() {
            assert!(tags.is_empty(), "non-array input should yield no tags");
        }

        // 3. Never more tags out than array elements in
        if let Some(items) = value.as_array() {
            assert!(
                tags.len() <= items.len(),
                "cannot parse more tags than elements"
            );
        }
    }
});
