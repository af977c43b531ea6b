//! Next/previous page links.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::PageInfo;

const PAGE_PARAM: &str = "page";

/// Relative links to the neighbouring pages, when they exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    /// Link to the following page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the preceding page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

impl PageLinks {
    /// Build links from the current request URL.
    ///
    /// Every query parameter other than `page` is preserved in order; `page`
    /// is replaced (or appended) with the neighbouring page number. Links are
    /// rendered as path plus query so they stay valid behind proxies.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageInfo, PageLinks, PageRequest};
    /// use url::Url;
    ///
    /// let current = Url::parse("http://localhost/dashboard?search=ada&page=2").unwrap();
    /// let info = PageInfo::new(PageRequest::new(2, 3).unwrap(), 9);
    /// let links = PageLinks::build(&current, &info);
    /// assert_eq!(links.next.as_deref(), Some("/dashboard?search=ada&page=3"));
    /// assert_eq!(links.prev.as_deref(), Some("/dashboard?search=ada&page=1"));
    /// ```
    #[must_use]
    pub fn build(current: &Url, info: &PageInfo) -> Self {
        let page = u64::from(info.current_page);
        Self {
            next: info
                .has_next_page
                .then(|| link_for_page(current, page.saturating_add(1))),
            prev: info
                .has_prev_page
                .then(|| link_for_page(current, page.saturating_sub(1))),
        }
    }
}

fn link_for_page(current: &Url, page: u64) -> String {
    let retained: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut target = current.clone();
    target
        .query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(PAGE_PARAM, &page.to_string());

    match target.query() {
        Some(query) => format!("{}?{query}", target.path()),
        None => target.path().to_owned(),
    }
}
