//! Driving port for login, logout, and session resolution.
//!
//! Inbound adapters hold only the opaque token; this port turns it back into
//! an identity or tears it down without the adapter seeing the store.

use async_trait::async_trait;

use crate::domain::{ActiveSession, Error, LoginForm, SessionToken};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check credentials and open a session.
    async fn login(&self, form: LoginForm) -> Result<ActiveSession, Error>;

    /// Look up a presented token; `None` when unknown or expired.
    async fn resolve(&self, token: &SessionToken) -> Result<Option<ActiveSession>, Error>;

    /// Close the session named by `token`.
    async fn logout(&self, token: &SessionToken) -> Result<(), Error>;
}
