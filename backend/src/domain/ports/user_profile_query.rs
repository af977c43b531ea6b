//! Driving port for reading a single profile.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Profile for `user_id`; [`crate::domain::ErrorCode::NotFound`] when the
    /// record has been deleted under a live session.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error>;
}
