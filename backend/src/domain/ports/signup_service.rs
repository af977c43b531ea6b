//! Driving port for account creation.

use async_trait::async_trait;

use crate::domain::{AvatarUpload, Error, SignupForm, UserProfile};

/// Domain use-case port for signing up.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Validate the form, store the avatar, and create the account.
    ///
    /// Fails with [`crate::domain::ErrorCode::InvalidRequest`] when a rule is
    /// violated and [`crate::domain::ErrorCode::Conflict`] when the email is
    /// already registered. No record is written on failure.
    async fn signup(
        &self,
        form: SignupForm,
        avatar: Option<AvatarUpload>,
    ) -> Result<UserProfile, Error>;
}
