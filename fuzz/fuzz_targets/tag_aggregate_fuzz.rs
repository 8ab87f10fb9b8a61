//! Fuzz test for the tag aggregation pipeline
//!
//! Aggregation runs over whatever the decoder produced for every lead row
//! in the table. This target drives the full decode-then-aggregate pipeline
//! with arbitrary rows to find:
//! - Panics or crashes
//! - Conservation violations (tags lost or double-counted)
//! - Ordering violations in the output
//!
//! Run with: cargo +nightly fuzz run tag_aggregate_fuzz -- -max_total_time=60

#![no_main]

use leadline_core::{aggregate_tags, parse_tag_list};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = serde_json::from_slice::<Vec<serde_json::Value>>(data) {
        let parsed: Vec<_> = rows.iter().map(parse_tag_list).collect();
        let total_tags: usize = parsed.iter().map(|tags| tags.len()).sum();

        let counts = aggregate_tags(parsed);

        // 1. Aggregation conserves occurrences: every parsed tag lands in
        //    exactly one bucket
        let total_count: u64 = counts.iter().map(|c| c.count).sum();
        assert_eq!(
            total_count, total_tags as u64,
            "aggregation should conserve tag occurrences"
        );

        // 2. No empty buckets
        assert!(counts.iter().all(|c| c.count >= 1));

        // 3. Ordering: descending count, ties ascending by label then
        //    category; (category, label) pairs are unique so ties are strict
        for pair in counts.windows(2) {
            let ordered = pair[1].count < pair[0].count
                || (pair[0].count == pair[1].count
                    && (pair[0].label.as_str(), pair[0].category.as_str())
                        < (pair[1].label.as_str(), pair[1].category.as_str()));
            assert!(
                ordered,
                "output ordering violated: {:?} before {:?}",
                pair[0], pair[1]
            );
        }
    }
});
