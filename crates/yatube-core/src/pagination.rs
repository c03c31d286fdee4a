//! Page arithmetic for post listings.
//!
//! Out-of-range requests never fail: anything below the first page resolves to
//! page 1 and anything past the end resolves to the last page. An empty listing
//! still has one (empty) page.

use serde::Serialize;

/// A resolved page request: which page to show and how to slice the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
}

impl PageRequest {
    /// Resolve a raw page number against the listing size.
    pub fn resolve(requested: Option<i64>, per_page: u64, total_items: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_pages(per_page, total_items);
        let number = match requested {
            Some(n) if n >= 1 => (n as u64).min(total_pages),
            _ => 1,
        };

        Self {
            number,
            per_page,
            total_items,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.per_page, self.total_items)
    }

    /// Wrap the items fetched for this request.
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            number: self.number,
            total_pages: self.total_pages(),
            total_items: self.total_items,
            items,
        }
    }
}

fn total_pages(per_page: u64, total_items: u64) -> u64 {
    total_items.div_ceil(per_page).max(1)
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_is_first() {
        let req = PageRequest::resolve(None, 10, 25);
        assert_eq!(req.number, 1);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.total_pages(), 3);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let req = PageRequest::resolve(Some(99), 10, 25);
        assert_eq!(req.number, 3);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn test_non_positive_page_is_first() {
        assert_eq!(PageRequest::resolve(Some(0), 10, 25).number, 1);
        assert_eq!(PageRequest::resolve(Some(-4), 10, 25).number, 1);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page = PageRequest::resolve(Some(2), 10, 0).into_page(Vec::<i64>::new());
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_middle_page_navigation() {
        let page = PageRequest::resolve(Some(2), 10, 25).into_page(vec![1, 2, 3]);
        assert!(page.has_next());
        assert!(page.has_previous());
        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
    }
}
