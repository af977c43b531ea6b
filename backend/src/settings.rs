//! Process settings loaded via OrthoConfig.
//!
//! Values come from CLI flags and `USERDESK_*` environment variables.
//! Session cookie toggles are separate; see
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_SESSION_TTL_HOURS: u32 = 24;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Settings that could not be turned into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    /// A duration setting was zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Runtime configuration for the user desk server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERDESK")]
pub struct AppSettings {
    /// Listen address, e.g. `127.0.0.1:3000`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without one, accounts live in memory.
    pub database_url: Option<String>,
    /// Directory receiving avatar uploads.
    pub upload_dir: Option<PathBuf>,
    /// Reject signups without an avatar.
    #[ortho_config(default = false)]
    pub avatar_required: bool,
    /// Hide whether a login failed on the email or the password.
    #[ortho_config(default = false)]
    pub uniform_login_errors: bool,
    /// Session lifetime in hours, for both cookie and store.
    pub session_ttl_hours: Option<u32>,
    /// Seconds between sweeps of expired sessions.
    pub session_sweep_interval_secs: Option<u64>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Upload directory, defaulting to `uploads`.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Session lifetime shared by the cookie and the session store.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroDuration`] for a zero TTL.
    pub fn session_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let hours = self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        if hours == 0 {
            return Err(SettingsError::ZeroDuration {
                name: "session_ttl_hours",
            });
        }
        Ok(TimeDelta::hours(i64::from(hours)))
    }

    /// Interval between expired-session sweeps.
    ///
    /// # Errors
    /// Returns [`SettingsError::ZeroDuration`] for a zero interval.
    pub fn sweep_interval(&self) -> Result<Duration, SettingsError> {
        let secs = self
            .session_sweep_interval_secs
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        if secs == 0 {
            return Err(SettingsError::ZeroDuration {
                name: "session_sweep_interval_secs",
            });
        }
        Ok(Duration::from_secs(secs))
    }
}
