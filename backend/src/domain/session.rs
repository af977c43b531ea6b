//! Server-side session identities and the opaque tokens that name them.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{User, UserId, UserProfile};

const TOKEN_BYTES: usize = 32;
const FINGERPRINT_BYTES: usize = 8;

/// Validation errors raised when parsing a [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenError {
    /// Tokens are fixed-length lowercase hex.
    #[error("session token must be {expected} lowercase hex characters")]
    Malformed {
        /// Expected length in characters.
        expected: usize,
    },
}

/// Opaque session identifier issued at login.
///
/// Tokens carry 256 bits of randomness, rendered as lowercase hex. They are
/// never logged; use [`SessionToken::fingerprint`] instead.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a fresh random token.
    pub fn generate() -> Self {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    /// Parse a token previously handed to a client.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SessionTokenError> {
        let raw = raw.into();
        let well_formed = raw.len() == TOKEN_BYTES * 2
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(raw))
        } else {
            Err(SessionTokenError::Malformed {
                expected: TOKEN_BYTES * 2,
            })
        }
    }

    /// Token text for the client cookie.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Truncated SHA-256 digest that is safe to log.
    ///
    /// # Examples
    /// ```
    /// use userdesk::domain::SessionToken;
    ///
    /// let token = SessionToken::generate();
    /// assert_eq!(token.fingerprint().len(), 16);
    /// assert_eq!(token.fingerprint(), token.fingerprint());
    /// ```
    pub fn fingerprint(&self) -> String {
        fingerprint(self.0.as_bytes())
    }
}

/// Short lowercase-hex SHA-256 prefix of `secret`, for logs.
///
/// Used for session tokens and for the cookie signing key.
pub fn fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self.fingerprint())
    }
}

/// Identity projection cached inside a session.
///
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// User identifier.
    pub id: UserId,
    /// Display name at the time of the last refresh.
    pub name: String,
    /// Email at the time of the last refresh.
    pub email: String,
    /// Phone number at the time of the last refresh.
    pub phone: String,
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

impl From<&UserProfile> for SessionIdentity {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
        }
    }
}

/// A live session: the token a client presents and the identity stored
/// under it. Issued by login and resolved on every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    /// Token presented by the client.
    pub token: SessionToken,
    /// Identity currently stored under the token.
    pub identity: SessionIdentity,
}
