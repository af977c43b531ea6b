//! Port abstraction for the credential store and its errors.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{NewUser, ProfileChanges, User, UserId, UserListQuery};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The write would give two users the same email.
        DuplicateEmail => "a user with this email already exists",
    }
}

/// Persisted user records.
///
/// Adapters must enforce email uniqueness natively: `insert` and
/// `update_profile` report [`UserPersistenceError::DuplicateEmail`] instead of
/// writing a second record with an existing email, even when two writes race.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user, assigning its id and creation time.
    async fn insert(&self, user: NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite name, email, and phone; `None` when the user is gone.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Remove a user; `false` when nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;

    /// Filter, sort, and slice users.
    ///
    /// The page counters are computed from the filtered total, so the slice
    /// length is always `min(limit, total - offset)` or zero.
    async fn list_page(&self, query: &UserListQuery) -> Result<Page<User>, UserPersistenceError>;

    /// Every user, ordered by name.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
