//! Directory listing and self-service profile management.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use tracing::{info, warn};

use super::port_errors::{map_session_store_error, map_user_persistence_error};
use super::ports::{
    SessionStore, UserPersistenceError, UserProfileCommand, UserProfileQuery, UserRepository,
    UsersQuery,
};
use super::{
    ActiveSession, Error, ProfileForm, SessionIdentity, UserId, UserListQuery, UserProfile,
};

/// Message shown when the caller's record no longer exists.
pub const USER_NOT_FOUND: &str = "User not found";
/// Message shown when a profile update collides with another user's email.
pub const EMAIL_TAKEN: &str = "Email is already taken by another user";

/// Service implementing the directory and profile driving ports.
pub struct ProfileService<R, S> {
    users: Arc<R>,
    sessions: Arc<S>,
}

impl<R, S> ProfileService<R, S> {
    /// Create a service over the given adapters.
    pub fn new(users: Arc<R>, sessions: Arc<S>) -> Self {
        Self { users, sessions }
    }
}

#[async_trait]
impl<R, S> UsersQuery for ProfileService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    async fn list_users(&self, query: &UserListQuery) -> Result<Page<UserProfile>, Error> {
        let page = self
            .users
            .list_page(query)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(page.map(|user| user.profile()))
    }

    async fn all_users(&self) -> Result<Vec<UserProfile>, Error> {
        let users = self
            .users
            .list_all()
            .await
            .map_err(map_user_persistence_error)?;
        Ok(users.iter().map(|user| user.profile()).collect())
    }
}

#[async_trait]
impl<R, S> UserProfileQuery for ProfileService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .map(|user| user.profile())
            .ok_or_else(|| {
                warn!(%user_id, "session refers to a deleted user");
                Error::not_found(USER_NOT_FOUND)
            })
    }
}

#[async_trait]
impl<R, S> UserProfileCommand for ProfileService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    async fn update_profile(
        &self,
        session: &ActiveSession,
        form: ProfileForm,
    ) -> Result<SessionIdentity, Error> {
        let changes = form.validate().map_err(Error::from)?;
        let user_id = session.identity.id;

        let owner = self
            .users
            .find_by_email(&changes.email)
            .await
            .map_err(map_user_persistence_error)?;
        if owner.is_some_and(|owner| owner.id != user_id) {
            return Err(Error::conflict(EMAIL_TAKEN));
        }

        let updated = self
            .users
            .update_profile(&user_id, &changes)
            .await
            .map_err(|error| match error {
                UserPersistenceError::DuplicateEmail => Error::conflict(EMAIL_TAKEN),
                other => map_user_persistence_error(other),
            })?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        let identity = SessionIdentity::from(&updated);
        let refreshed = self
            .sessions
            .replace(&session.token, identity.clone())
            .await
            .map_err(map_session_store_error)?;
        if !refreshed {
            warn!(
                %user_id,
                session = %session.token.fingerprint(),
                "session expired during profile update"
            );
        }
        info!(%user_id, "profile updated");
        Ok(identity)
    }

    async fn delete_account(&self, session: &ActiveSession) -> Result<(), Error> {
        let user_id = session.identity.id;
        let deleted = self
            .users
            .delete(&user_id)
            .await
            .map_err(map_user_persistence_error)?;
        if !deleted {
            return Err(Error::not_found(USER_NOT_FOUND));
        }

        // Sessions on other devices would otherwise keep passing the auth gate.
        match self.sessions.destroy_for_user(&user_id).await {
            Ok(ended) => info!(%user_id, sessions = ended, "account deleted"),
            Err(error) => {
                warn!(%user_id, %error, "failed to end sessions after account deletion");
                info!(%user_id, "account deleted");
            }
        }
        Ok(())
    }
}
