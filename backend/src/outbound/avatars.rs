//! Filesystem `AvatarStore` confined to the upload directory.
//!
//! Files are written through a `cap_std` directory handle, so a stored name
//! can never escape the upload root. Names are generated here and never taken
//! from the client.

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::fs::{Dir, OpenOptions};
use cap_std::ambient_authority;
use mockable::Clock;
use rand::Rng as _;
use tokio::task;
use tracing::info;

use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarRef, AvatarUpload};

const NAME_SUFFIX_RANGE: std::ops::Range<u32> = 0..1_000_000_000;

/// Avatar store writing into a single directory.
pub struct FilesystemAvatarStore {
    dir: Arc<Dir>,
    clock: Arc<dyn Clock>,
}

impl FilesystemAvatarStore {
    /// Open `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarStoreError::Io`] when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path, clock: Arc<dyn Clock>) -> Result<Self, AvatarStoreError> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(path, ambient_authority()))
            .map(|dir| Self {
                dir: Arc::new(dir),
                clock,
            })
            .map_err(|err| AvatarStoreError::io(format!("{}: {err}", path.display())))
    }

    fn file_name(&self, upload: &AvatarUpload) -> String {
        let suffix = rand::thread_rng().gen_range(NAME_SUFFIX_RANGE);
        format!(
            "{}-{suffix:09}.{}",
            self.clock.utc().timestamp_millis(),
            upload.format().extension()
        )
    }
}

fn write_new(dir: &Dir, name: &str, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(name, &options)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_existing(dir: &Dir, name: &str) -> std::io::Result<()> {
    match dir.remove_file(name) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl AvatarStore for FilesystemAvatarStore {
    async fn save(&self, upload: AvatarUpload) -> Result<AvatarRef, AvatarStoreError> {
        let name = self.file_name(&upload);
        let dir = Arc::clone(&self.dir);
        let target = name.clone();
        let size = upload.bytes().len();
        task::spawn_blocking(move || write_new(&dir, &target, &upload.into_bytes()))
            .await
            .map_err(|err| AvatarStoreError::io(err.to_string()))?
            .map_err(|err| AvatarStoreError::io(format!("{name}: {err}")))?;
        info!(file = %name, size, "avatar stored");
        Ok(AvatarRef::new(name))
    }

    async fn remove(&self, avatar: &AvatarRef) -> Result<(), AvatarStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = avatar.as_str().to_owned();
        let target = name.clone();
        task::spawn_blocking(move || remove_existing(&dir, &target))
            .await
            .map_err(|err| AvatarStoreError::io(err.to_string()))?
            .map_err(|err| AvatarStoreError::io(format!("{name}: {err}")))?;
        info!(file = %name, "avatar removed");
        Ok(())
    }
}
