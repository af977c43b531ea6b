//! Validated page requests.

use std::ops::Range;

/// Errors raised when constructing a [`PageRequest`] from explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are one-based.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
}

/// A one-based page number and a page size, both at least 1.
///
/// No upper bound is placed on `limit`; callers that need one enforce it
/// before building the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, rejecting zero values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` or `limit` is zero.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        Ok(Self { page, limit })
    }

    /// Build a request from raw query-string values.
    ///
    /// Missing, non-numeric, or zero values fall back to page 1 and
    /// `default_limit` respectively. A `default_limit` of zero is treated
    /// as one.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("2"), Some("abc"), 3);
    /// assert_eq!(request.page(), 2);
    /// assert_eq!(request.limit(), 3);
    /// ```
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(1),
            limit: parse_positive(limit).unwrap_or(default_limit.max(1)),
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Index range of this page within `total` ordered items.
    ///
    /// The range is empty when the page starts beyond the end, and its length
    /// is `min(limit, total - offset)` otherwise.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(total);
        let len = usize::try_from(self.limit).unwrap_or(usize::MAX);
        start..start.saturating_add(len).min(total)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
}
