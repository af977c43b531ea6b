//! Authentication primitives: login credentials and password hashes.
//!
//! Raw passwords only ever live in [`Zeroizing`] buffers and are wiped when
//! dropped. Hashes are opaque PHC strings produced by the password hasher.

use std::fmt;

use zeroize::Zeroizing;

/// Validated login credentials.
///
/// ## Invariants
/// - `email` matched the address format when the credentials were built.
/// - `password` is at least the minimum password length and keeps any
///   caller-supplied whitespace.
///
/// # Examples
/// ```
/// use userdesk::domain::LoginForm;
///
/// let creds = LoginForm::new("ada@example.com", "secret").validate().unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub(crate) fn new(email: String, password: Zeroizing<String>) -> Self {
        Self { email, password }
    }

    /// Email used for the user lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Salted one-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash for storage and verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
