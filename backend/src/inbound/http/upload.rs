//! Multipart decoding for the signup form.
//!
//! The avatar part is screened before any business rule runs: its declared
//! content type must be JPEG or PNG and its size must stay within
//! [`AVATAR_MAX_BYTES`]. The size limit is enforced while streaming, so an
//! oversized upload is never buffered in full.

use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use tracing::debug;

use crate::domain::{AVATAR_MAX_BYTES, AvatarFormat, AvatarRejection, AvatarUpload, SignupForm};

/// Multipart part carrying the avatar image.
pub const PHOTO_FIELD: &str = "photo";
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

/// Decoded signup submission.
#[derive(Debug)]
pub struct SignupSubmission {
    /// Text fields, not yet validated.
    pub form: SignupForm,
    /// The `photo` part, present only when a file was attached.
    pub avatar: Option<AvatarUpload>,
}

/// Why a signup body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The avatar failed the type or size screen.
    #[error(transparent)]
    Rejected(#[from] AvatarRejection),
    /// The body was not well-formed multipart data.
    #[error("File upload error: {0}")]
    Multipart(String),
}

impl UploadError {
    fn multipart(detail: impl ToString) -> Self {
        Self::Multipart(detail.to_string())
    }
}

/// Read every part of a signup submission.
///
/// Unknown parts are drained and ignored. A photo part without a file name
/// or without content counts as "no avatar".
pub async fn read_signup(mut payload: Multipart) -> Result<SignupSubmission, UploadError> {
    let mut form = SignupForm::default();
    let mut avatar = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(UploadError::multipart)?;
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            PHOTO_FIELD => avatar = read_avatar(&mut field).await?,
            "name" => form.name = read_text(&mut field).await?,
            "email" => form.email = read_text(&mut field).await?,
            "phone" => form.phone = read_text(&mut field).await?,
            "password" => form.password = read_text(&mut field).await?,
            other => {
                debug!(field = other, "ignoring unexpected multipart field");
                drain(&mut field).await?;
            }
        }
    }

    Ok(SignupSubmission { form, avatar })
}

async fn read_avatar(field: &mut Field) -> Result<Option<AvatarUpload>, UploadError> {
    let has_file = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .is_some_and(|file_name| !file_name.is_empty());
    if !has_file {
        drain(field).await?;
        return Ok(None);
    }

    let declared = field
        .content_type()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    let format = AvatarFormat::from_content_type(&declared)?;

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(UploadError::multipart)?;
        if bytes.len() + chunk.len() > AVATAR_MAX_BYTES {
            return Err(AvatarRejection::TooLarge.into());
        }
        bytes.extend_from_slice(&chunk);
    }
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(AvatarUpload::new(format, bytes)?))
}

async fn read_text(field: &mut Field) -> Result<String, UploadError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(UploadError::multipart)?;
        if bytes.len() + chunk.len() > TEXT_FIELD_MAX_BYTES {
            return Err(UploadError::multipart("form field too large"));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(UploadError::multipart)
}

async fn drain(field: &mut Field) -> Result<(), UploadError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(UploadError::multipart)?;
    }
    Ok(())
}
