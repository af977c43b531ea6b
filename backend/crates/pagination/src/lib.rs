//! Offset pagination primitives shared by userdesk list endpoints.
//!
//! A [`PageRequest`] names a one-based page and a page size. Adapters use
//! [`PageRequest::offset`] or [`PageRequest::window`] to select a slice, then
//! wrap it in a [`Page`] whose [`PageInfo`] is derived from the same filtered
//! total so the slice and the counters never disagree. [`PageLinks`] renders
//! next/previous URLs that preserve the caller's other query parameters.

mod links;
mod request;

pub use links::PageLinks;
pub use request::{PageRequest, PageRequestError};

use serde::{Deserialize, Serialize};

/// Pagination counters derived from a request and a filtered total.
///
/// ## Invariants
/// - `total_pages == ceil(total_items / limit)`.
/// - `has_next_page == current_page < total_pages`.
/// - `has_prev_page == current_page > 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// One-based page that was requested.
    pub current_page: u32,
    /// Number of pages needed to show every matching item.
    pub total_pages: u64,
    /// Number of items matching the filter, across all pages.
    pub total_items: u64,
    /// Page size used for the calculation.
    pub limit: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

impl PageInfo {
    /// Derive counters for `request` against `total_items` matches.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageInfo, PageRequest};
    ///
    /// let request = PageRequest::new(2, 3).expect("valid request");
    /// let info = PageInfo::new(request, 7);
    /// assert_eq!(info.total_pages, 3);
    /// assert!(info.has_next_page);
    /// assert!(info.has_prev_page);
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.limit()));
        Self {
            current_page: request.page(),
            total_pages,
            total_items,
            limit: request.limit(),
            has_next_page: u64::from(request.page()) < total_pages,
            has_prev_page: request.page() > 1,
        }
    }
}

/// A single page of items plus the counters describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most `pagination.limit` of them.
    pub items: Vec<T>,
    /// Counters computed from the filtered total.
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Wrap an already-selected slice of items.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            pagination: PageInfo::new(request, total_items),
        }
    }

    /// Transform each item while keeping the counters.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
