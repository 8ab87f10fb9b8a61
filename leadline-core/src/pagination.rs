//! Pagination primitives
//!
//! List endpoints take a 1-based `page` and a `perPage` size and answer with
//! the slice plus `total` and `totalPages`. The arithmetic lives here so the
//! query layer and the response builders cannot drift apart.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on page size; larger requests are clamped, not rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page request.
///
/// Construction clamps rather than errors: page numbers below 1 become 1
/// and sizes outside `1..=MAX_PAGE_SIZE` are pulled to the nearest bound.
/// A page past the end of the data is legal and yields an empty slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, per_page }
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page, always in `1..=MAX_PAGE_SIZE`.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset for the store query.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Row limit for the store query.
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Total page count for a result set of `total` rows.
    /// Zero rows means zero pages; otherwise the ceiling of the division.
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.per_page))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamps_page_below_one() {
        let req = PageRequest::new(Some(0), Some(25));
        assert_eq!(req.page(), 1);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamps_per_page_to_bounds() {
        assert_eq!(PageRequest::new(None, Some(0)).per_page(), 1);
        assert_eq!(PageRequest::new(None, Some(500)).per_page(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(None, Some(42)).per_page(), 42);
    }

    #[test]
    fn test_offset_is_page_minus_one_times_size() {
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let req = PageRequest::new(Some(1), Some(10));
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(1), 1);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(11), 2);
        assert_eq!(req.total_pages(23), 3);
    }

    #[test]
    fn test_twenty_three_rows_page_three_of_ten() {
        // 23 rows at 10 per page: page 3 starts at offset 20 and the
        // remaining slice is 3 rows across 3 total pages.
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.offset(), 20);
        assert_eq!(req.total_pages(23), 3);
    }
}
