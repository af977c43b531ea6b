//! Port for the server-side session keyed store.

use async_trait::async_trait;

use crate::domain::{SessionIdentity, SessionToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Backing store could not be reached.
        Unavailable { message: String } => "session store unavailable: {message}",
        /// Store rejected or failed an operation.
        Operation { message: String } => "session store operation failed: {message}",
    }
}

/// Keyed store mapping opaque tokens to identity projections.
///
/// Entries expire after a fixed TTL. Adapters hide expired entries from
/// `get` even before [`SessionStore::purge_expired`] removes them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a new token for `identity`.
    async fn create(&self, identity: SessionIdentity) -> Result<SessionToken, SessionStoreError>;

    /// Identity stored under `token`, refreshing its expiry.
    async fn get(&self, token: &SessionToken)
    -> Result<Option<SessionIdentity>, SessionStoreError>;

    /// Swap the identity stored under a live token; `false` when absent.
    async fn replace(
        &self,
        token: &SessionToken,
        identity: SessionIdentity,
    ) -> Result<bool, SessionStoreError>;

    /// Remove `token`. Removing an unknown token is not an error.
    async fn destroy(&self, token: &SessionToken) -> Result<(), SessionStoreError>;

    /// Remove every session belonging to `user_id`, returning how many
    /// were removed.
    async fn destroy_for_user(&self, user_id: &UserId) -> Result<usize, SessionStoreError>;

    /// Drop expired entries, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize, SessionStoreError>;
}
