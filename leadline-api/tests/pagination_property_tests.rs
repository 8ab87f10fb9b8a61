//! Property-Based Tests for Pagination Clamping
//!
//! **Property: Pagination Clamping**
//!
//! For any caller-supplied limit, offset, page, or page size — however
//! hostile — the effective values handed to the store SHALL stay inside
//! their bounds, AND the page envelope returned to the dashboard SHALL be
//! arithmetically consistent with the totals it reports. Bad paging input
//! is clamped, never rejected and never passed through.

use leadline_api::{
    JobLeadsPageResponse, JobLeadsQuery, JobListQuery, LeadListQuery, DEFAULT_LIST_LIMIT,
    MAX_LIST_LIMIT,
};
use leadline_core::{PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use proptest::prelude::*;

// ============================================================================
// PROPERTY TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// **Property: Offset-Style Limits Stay In Bounds**
    ///
    /// For any raw limit and offset, the effective limit is in
    /// `1..=MAX_LIST_LIMIT` (defaulting when absent) and the effective
    /// offset is never negative.
    #[test]
    fn prop_lead_query_limits_stay_in_bounds(
        limit in proptest::option::of(any::<i64>()),
        offset in proptest::option::of(any::<i64>()),
    ) {
        let query = LeadListQuery {
            limit,
            offset,
            status: None,
            search: None,
            owner_id: None,
        };

        prop_assert!((1..=MAX_LIST_LIMIT).contains(&query.limit()));
        prop_assert!(query.offset() >= 0);
        if limit.is_none() {
            prop_assert_eq!(query.limit(), DEFAULT_LIST_LIMIT);
        }
        if offset.is_none() {
            prop_assert_eq!(query.offset(), 0);
        }
    }

    /// **Property: Query Strings Parse And Clamp**
    ///
    /// The same bounds hold when the values arrive the way the dashboard
    /// sends them: through the URL query string.
    #[test]
    fn prop_query_strings_parse_and_clamp(
        raw_limit in any::<i64>(),
        raw_offset in any::<i64>(),
    ) {
        let raw = format!("limit={}&offset={}", raw_limit, raw_offset);
        let query: LeadListQuery =
            serde_urlencoded::from_str(&raw).expect("numeric query strings should parse");

        prop_assert_eq!(query.limit, Some(raw_limit));
        prop_assert!((1..=MAX_LIST_LIMIT).contains(&query.limit()));
        prop_assert!(query.offset() >= 0);

        let job_query: JobListQuery =
            serde_urlencoded::from_str(&raw).expect("numeric query strings should parse");
        prop_assert_eq!(job_query.limit(), query.limit());
        prop_assert_eq!(job_query.offset(), query.offset());
    }

    /// **Property: Page Requests Stay In Bounds**
    ///
    /// For any raw page and perPage, the validated request has a 1-based
    /// page, a size in `1..=MAX_PAGE_SIZE`, and a non-negative offset that
    /// is exactly `(page - 1) * perPage`.
    #[test]
    fn prop_job_page_requests_stay_in_bounds(
        page in proptest::option::of(any::<u32>()),
        per_page in proptest::option::of(any::<u32>()),
    ) {
        let query = JobLeadsQuery {
            page,
            per_page,
            search: None,
        };
        let request = query.page_request();

        prop_assert!(request.page() >= 1);
        prop_assert!((1..=MAX_PAGE_SIZE).contains(&request.per_page()));
        prop_assert_eq!(request.limit(), i64::from(request.per_page()));
        prop_assert_eq!(
            request.offset(),
            i64::from(request.page() - 1) * i64::from(request.per_page())
        );
        if page.is_none() {
            prop_assert_eq!(request.page(), 1);
        }
        if per_page.is_none() {
            prop_assert_eq!(request.per_page(), DEFAULT_PAGE_SIZE);
        }
    }

    /// **Property: Page Envelopes Are Arithmetically Consistent**
    ///
    /// For any total and any page request, the envelope's `totalPages` is
    /// the exact ceiling division, covers every row, and wastes no page.
    #[test]
    fn prop_page_envelopes_are_arithmetically_consistent(
        total in 0u64..1_000_000,
        page in proptest::option::of(1u32..10_000),
        per_page in proptest::option::of(any::<u32>()),
    ) {
        let request = PageRequest::new(page, per_page);
        let envelope = JobLeadsPageResponse::new(Vec::new(), total, &request);

        prop_assert_eq!(envelope.page, request.page());
        prop_assert_eq!(envelope.per_page, request.per_page());
        prop_assert_eq!(
            envelope.total_pages,
            total.div_ceil(u64::from(request.per_page()))
        );

        let per_page = u64::from(envelope.per_page);
        if total == 0 {
            prop_assert_eq!(envelope.total_pages, 0);
        } else {
            // The last page covers the remainder and no page is empty.
            prop_assert!(envelope.total_pages * per_page >= total);
            prop_assert!((envelope.total_pages - 1) * per_page < total);
        }
    }
}

// ============================================================================
// UNIT TESTS FOR EDGE CASES
// ============================================================================

#[cfg(test)]
mod edge_cases {
    use super::*;

    #[test]
    fn test_empty_query_string_gets_defaults() {
        let query: LeadListQuery =
            serde_urlencoded::from_str("").expect("empty query should parse");
        assert_eq!(query.limit(), DEFAULT_LIST_LIMIT);
        assert_eq!(query.offset(), 0);
        assert!(query.status.is_none());
        assert!(query.search.is_none());
        assert!(query.owner_id.is_none());
    }

    #[test]
    fn test_oversized_limit_is_capped() {
        let query: LeadListQuery =
            serde_urlencoded::from_str("limit=100000").expect("query should parse");
        assert_eq!(query.limit(), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_zero_and_negative_inputs_clamp_up() {
        let query: LeadListQuery =
            serde_urlencoded::from_str("limit=0&offset=-10").expect("query should parse");
        assert_eq!(query.limit(), 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_per_page_alias_parses_in_query_strings() {
        let camel: JobLeadsQuery =
            serde_urlencoded::from_str("page=2&perPage=50").expect("query should parse");
        assert_eq!(camel.per_page, Some(50));

        let snake: JobLeadsQuery =
            serde_urlencoded::from_str("page=2&per_page=25").expect("query should parse");
        assert_eq!(snake.per_page, Some(25));
    }

    #[test]
    fn test_owner_filter_parses_as_uuid() {
        let id = leadline_core::new_entity_id();
        let raw = format!("owner_id={}", id);
        let query: LeadListQuery = serde_urlencoded::from_str(&raw).expect("query should parse");
        assert_eq!(query.owner_id, Some(id));
    }

    #[test]
    fn test_search_terms_decode_from_query_strings() {
        let query: LeadListQuery =
            serde_urlencoded::from_str("search=ac%20me&status=contacted").expect("query should parse");
        assert_eq!(query.search.as_deref(), Some("ac me"));
        assert_eq!(query.status.as_deref(), Some("contacted"));
    }

    #[test]
    fn test_far_page_yields_consistent_empty_envelope() {
        // Page 400 of a 23-row set: legal, empty, and the totals still
        // describe the real data.
        let request = PageRequest::new(Some(400), Some(10));
        let envelope = JobLeadsPageResponse::new(Vec::new(), 23, &request);

        assert_eq!(envelope.page, 400);
        assert_eq!(envelope.total, 23);
        assert_eq!(envelope.total_pages, 3);
        assert!(envelope.leads.is_empty());
    }
}
