//! User records and their password-free projections.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::auth::PasswordHash;

/// Validation errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserIdError::Empty);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdError::Invalid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored avatar file name.
///
/// Holds only the file identifier handed back by the avatar store, never the
/// image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarRef(String);

impl AvatarRef {
    /// Wrap a stored file name.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self(file_name.into())
    }

    /// Stored file name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AvatarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted user record.
///
/// ## Invariants
/// - `email` is unique across all records.
/// - `password_hash` is always a computed hash; raw passwords are never held
///   here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email, compared exactly as stored.
    pub email: String,
    /// Phone number in whatever format the user supplied.
    pub phone: String,
    /// Salted password hash.
    pub password_hash: PasswordHash,
    /// Optional stored avatar.
    pub avatar: Option<AvatarRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Projection without the password hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }
}

/// Data needed to create a user; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Salted password hash.
    pub password_hash: PasswordHash,
    /// Optional stored avatar.
    pub avatar: Option<AvatarRef>,
}

/// Editable identity fields of an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New display name.
    pub name: String,
    /// New email.
    pub email: String,
    /// New phone number.
    pub phone: String,
}

/// User record as shown to other users and on the profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Optional stored avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
