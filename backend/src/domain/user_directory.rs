//! Search, sort, and paging parameters for the user directory.

use std::cmp::Ordering;

use pagination::PageRequest;
use serde::{Deserialize, Serialize};

use super::User;

/// Page size used when the caller does not supply a usable `limit`.
pub const DEFAULT_PAGE_LIMIT: u32 = 3;

/// Whitelisted sort keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    /// Display name.
    #[default]
    #[serde(rename = "name")]
    Name,
    /// Email address.
    #[serde(rename = "email")]
    Email,
    /// Phone number.
    #[serde(rename = "phone")]
    Phone,
    /// Creation time.
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    /// Parse a query value, falling back to [`SortField::Name`] for anything
    /// outside the whitelist.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some("email") => Self::Email,
            Some("phone") => Self::Phone,
            Some("createdAt") => Self::CreatedAt,
            _ => Self::Name,
        }
    }

    /// Query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::CreatedAt => "createdAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Descending only when the value is exactly `desc`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        if raw == Some("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// Query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Raw dashboard query parameters, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Free-text filter.
    pub search: Option<String>,
    /// Sort key.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<String>,
}

/// Normalized listing request.
///
/// # Examples
/// ```
/// use userdesk::domain::{SortField, SortOrder, UserListParams, UserListQuery};
///
/// let query = UserListQuery::from_params(&UserListParams {
///     page: Some("0".into()),
///     sort_by: Some("password".into()),
///     sort_order: Some("DESC".into()),
///     ..UserListParams::default()
/// });
/// assert_eq!(query.page.page(), 1);
/// assert_eq!(query.page.limit(), 3);
/// assert_eq!(query.sort_field, SortField::Name);
/// assert_eq!(query.sort_order, SortOrder::Asc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
    /// Page window.
    pub page: PageRequest,
    /// Non-empty filter text, if any.
    pub search: Option<String>,
    /// Sort key.
    pub sort_field: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self::from_params(&UserListParams::default())
    }
}

impl UserListQuery {
    /// Normalize raw parameters, applying defaults for anything unusable.
    pub fn from_params(params: &UserListParams) -> Self {
        Self {
            page: PageRequest::from_query(
                params.page.as_deref(),
                params.limit.as_deref(),
                DEFAULT_PAGE_LIMIT,
            ),
            search: params
                .search
                .as_deref()
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
            sort_field: SortField::parse_lenient(params.sort_by.as_deref()),
            sort_order: SortOrder::parse_lenient(params.sort_order.as_deref()),
        }
    }

    /// Whether `user` passes the search filter.
    ///
    /// Matching is a case-insensitive substring test against name, email,
    /// or phone.
    pub fn matches(&self, user: &User) -> bool {
        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let needle = needle.to_lowercase();
        [&user.name, &user.email, &user.phone]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Ordering for two users under this query.
    ///
    /// Ties on the sort key fall back to creation time, then id, so pages
    /// stay stable between requests.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let primary = match self.sort_field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Phone => a.phone.cmp(&b.phone),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordered = primary
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()));
        match self.sort_order {
            SortOrder::Asc => ordered,
            SortOrder::Desc => ordered.reverse(),
        }
    }
}
