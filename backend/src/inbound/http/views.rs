//! View models handed to clients in place of rendered templates.
//!
//! Each page renders as JSON carrying exactly what its template would
//! receive, including the flash notifications consumed for this response.

use pagination::{PageInfo, PageLinks};
use serde::Serialize;

use crate::domain::{FlashMessages, SessionIdentity, UserId, UserProfile};

/// Signup form page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupView {
    /// Notice passed in the query string, used after account deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Notifications queued by the previous request.
    pub flash: FlashMessages,
}

/// Login form page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    /// Notifications queued by the previous request.
    pub flash: FlashMessages,
}

/// Paginated directory page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Users on the requested page.
    pub users: Vec<UserProfile>,
    /// Identity of the signed-in caller.
    pub current_user: SessionIdentity,
    /// Page counters and neighbours.
    pub pagination: PageInfo,
    /// Navigation links preserving the query.
    pub links: PageLinks,
    /// Filter text as applied, empty when none.
    pub search: String,
    /// Sort column as applied.
    pub sort_by: &'static str,
    /// `asc` or `desc`.
    pub sort_order: &'static str,
    /// Notifications queued by the previous request.
    pub flash: FlashMessages,
}

/// The caller's own profile page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// The caller's stored record.
    pub user: UserProfile,
    /// Notifications queued by the previous request.
    pub flash: FlashMessages,
}

/// Unpaginated directory listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersView {
    /// Every user, ordered by name.
    pub users: Vec<UserProfile>,
    /// Identity of the signed-in caller.
    pub current_user: SessionIdentity,
    /// The caller's id, repeated for convenience.
    pub id: UserId,
}
