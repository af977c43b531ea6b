//! Conversions from driven-port errors into domain errors.
//!
//! Messages produced here are internal; the HTTP adapter replaces them with
//! a generic notice before anything reaches a browser.

use super::Error;
use super::ports::{AvatarStoreError, PasswordHashError, SessionStoreError, UserPersistenceError};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => {
            Error::conflict("a user with this email already exists")
        }
    }
}

pub(crate) fn map_session_store_error(error: SessionStoreError) -> Error {
    match error {
        SessionStoreError::Unavailable { message } => {
            Error::service_unavailable(format!("session store unavailable: {message}"))
        }
        SessionStoreError::Operation { message } => {
            Error::internal(format!("session store error: {message}"))
        }
    }
}

pub(crate) fn map_password_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn map_avatar_store_error(error: AvatarStoreError) -> Error {
    Error::internal(error.to_string())
}
