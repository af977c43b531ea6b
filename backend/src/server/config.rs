//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use chrono::TimeDelta;

use crate::domain::AuthPolicy;
use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: TimeDelta,
    pub(crate) upload_dir: PathBuf,
    pub(crate) policy: AuthPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration from validated session cookie settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            session_ttl: TimeDelta::hours(DEFAULT_SESSION_TTL_HOURS),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            policy: AuthPolicy::default(),
            db_pool: None,
        }
    }

    /// Lifetime of both the session cookie and the server-side entry.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: TimeDelta) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Directory receiving avatar uploads.
    #[must_use]
    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Signup and login behaviour toggles.
    #[must_use]
    pub fn with_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a database connection pool for the credential store.
    ///
    /// Without one, accounts are kept in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the configured session lifetime.
    #[must_use]
    pub fn session_ttl(&self) -> TimeDelta {
        self.session_ttl
    }
}
