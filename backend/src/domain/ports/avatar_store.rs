//! Port for persisting uploaded avatar images.

use async_trait::async_trait;

use crate::domain::{AvatarRef, AvatarUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by avatar store adapters.
    pub enum AvatarStoreError {
        /// Upload directory could not be opened or written.
        Io { message: String } => "avatar storage failed: {message}",
    }
}

/// Stores avatar bytes and hands back a file reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Persist an already-validated upload.
    async fn save(&self, upload: AvatarUpload) -> Result<AvatarRef, AvatarStoreError>;

    /// Delete a stored file. Removing a file that is already gone succeeds.
    async fn remove(&self, avatar: &AvatarRef) -> Result<(), AvatarStoreError>;
}
