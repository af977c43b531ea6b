//! Driving port for changing or removing the caller's own account.

use async_trait::async_trait;

use crate::domain::{ActiveSession, Error, ProfileForm, SessionIdentity};

/// Domain use-case port for profile mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Validate and apply new identity fields, then refresh the session so
    /// later requests see them without logging in again.
    async fn update_profile(
        &self,
        session: &ActiveSession,
        form: ProfileForm,
    ) -> Result<SessionIdentity, Error>;

    /// Delete the account and close the session.
    async fn delete_account(&self, session: &ActiveSession) -> Result<(), Error>;
}
