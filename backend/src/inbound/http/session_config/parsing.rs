//! Environment parsing helpers for session configuration.

use std::fmt::Debug;

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Boolean session toggles. Both are off when a debug build omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Toggle {
    CookieSecure,
    AllowEphemeral,
}

impl Toggle {
    const fn var(self) -> &'static str {
        match self {
            Self::CookieSecure => COOKIE_SECURE_ENV,
            Self::AllowEphemeral => ALLOW_EPHEMERAL_ENV,
        }
    }
}

/// Read `toggle`, falling back to `false` only in debug builds.
pub(super) fn read_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    toggle: Toggle,
) -> Result<bool, SessionConfigError> {
    let name = toggle.var();
    let Some(raw) = env.string(name) else {
        return fallback_in_debug(mode, false, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&raw) {
        Some(flag) => Ok(flag),
        None => fallback_in_debug(
            mode,
            false,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

/// Read the `SameSite` policy.
///
/// `None` is only accepted alongside secure cookies; debug builds downgrade
/// the violation to a warning.
pub(super) fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(raw) = env.string(SAMESITE_ENV) else {
        return fallback_in_debug(mode, fallback, SessionConfigError::MissingEnv {
            name: SAMESITE_ENV,
        });
    };
    match parse_same_site(&raw) {
        Some(SameSite::None) if !cookie_secure => {
            fallback_in_debug(mode, (), SessionConfigError::InsecureSameSiteNone)?;
            Ok(SameSite::None)
        }
        Some(policy) => Ok(policy),
        None => fallback_in_debug(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

/// Debug builds log `error` and continue with `fallback`; release builds
/// fail with it.
pub(super) fn fallback_in_debug<T: Debug>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
) -> Result<T, SessionConfigError> {
    if !mode.is_debug() {
        return Err(error);
    }
    warn!(%error, ?fallback, "session setting relaxed for development");
    Ok(fallback)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}
