//! Driving port for the user directory.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, UserListQuery, UserProfile};

/// Domain use-case port for listing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// One filtered, sorted page of users.
    async fn list_users(&self, query: &UserListQuery) -> Result<Page<UserProfile>, Error>;

    /// Every user, ordered by name.
    async fn all_users(&self) -> Result<Vec<UserProfile>, Error>;
}
