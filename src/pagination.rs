//! Pagination helper
//!
//! Slices an ordered collection into fixed-size pages. Page numbers
//! come from a `?page=` query parameter and fail soft: non-numeric
//! values fall back to the first page, out-of-range values clamp to
//! the valid range instead of erroring.

use serde::{Deserialize, Serialize};

/// Number of items on one listing page
pub const PAGE_SIZE: u64 = 10;

/// Query parameters shared by all listing endpoints
///
/// The page number is kept as a raw string so that malformed input
/// degrades to page 1 instead of a 400 rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page number, defaulting to 1 for absent or
    /// non-numeric input.
    pub fn number(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(1)
    }
}

/// A resolved window into an ordered collection.
///
/// Computed from the total item count before the page itself is
/// fetched, so the data layer only loads `PAGE_SIZE` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Clamped page number (1-based)
    pub number: u64,
    /// Total items across all pages
    pub total_items: u64,
    /// Total pages (at least 1, even for an empty collection)
    pub total_pages: u64,
}

impl PageWindow {
    /// Resolve a requested page number against a collection size.
    ///
    /// Out-of-range requests clamp: 0 becomes 1, anything past the
    /// last page becomes the last page.
    pub fn new(total_items: u64, requested: u64) -> Self {
        let total_pages = (total_items.div_ceil(PAGE_SIZE)).max(1);
        let number = requested.clamp(1, total_pages);

        Self {
            number,
            total_items,
            total_pages,
        }
    }

    /// SQL offset for this window
    pub fn offset(&self) -> u64 {
        (self.number - 1) * PAGE_SIZE
    }

    /// SQL limit for this window
    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }

    /// Wrap the fetched rows together with the page metadata.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            has_next: self.number < self.total_pages,
            has_previous: self.number > 1,
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
            items,
        }
    }
}

/// One page of an ordered listing, ready for serialization
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collection_yields_single_empty_page() {
        let window = PageWindow::new(0, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset(), 0);

        let page = window.into_page(Vec::<u32>::new());
        assert!(!page.has_next);
        assert!(!page.has_previous);
        assert_eq!(page.number, 1);
    }

    #[test]
    fn full_pages_round_up() {
        assert_eq!(PageWindow::new(10, 1).total_pages, 1);
        assert_eq!(PageWindow::new(11, 1).total_pages, 2);
        assert_eq!(PageWindow::new(20, 1).total_pages, 2);
        assert_eq!(PageWindow::new(21, 1).total_pages, 3);
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let window = PageWindow::new(25, 99);
        assert_eq!(window.number, 3);
        assert_eq!(window.offset(), 20);

        let window = PageWindow::new(25, 0);
        assert_eq!(window.number, 1);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let page = PageWindow::new(25, 2).into_page(vec![(); 10]);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.number, 2);
        assert_eq!(page.total_items, 25);
    }

    #[test]
    fn page_query_fails_soft() {
        let query = PageQuery {
            page: Some("abc".to_string()),
        };
        assert_eq!(query.number(), 1);

        let query = PageQuery { page: None };
        assert_eq!(query.number(), 1);

        let query = PageQuery {
            page: Some(" 3 ".to_string()),
        };
        assert_eq!(query.number(), 3);
    }
}
