//! Upload rules for avatar images.

use std::fmt;

/// Largest accepted avatar, in bytes.
pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Why an uploaded file was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AvatarRejection {
    /// Content type is not JPEG or PNG.
    #[error("Only JPEG and PNG files are allowed")]
    UnsupportedType,
    /// File exceeds [`AVATAR_MAX_BYTES`].
    #[error("File size too large. Maximum size is 5MB.")]
    TooLarge,
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarFormat {
    /// `image/jpeg` or the non-standard `image/jpg`.
    Jpeg,
    /// `image/png`.
    Png,
}

impl AvatarFormat {
    /// Classify a declared content type.
    ///
    /// # Examples
    /// ```
    /// use userdesk::domain::{AvatarFormat, AvatarRejection};
    ///
    /// assert_eq!(AvatarFormat::from_content_type("image/jpg"), Ok(AvatarFormat::Jpeg));
    /// assert_eq!(
    ///     AvatarFormat::from_content_type("image/gif"),
    ///     Err(AvatarRejection::UnsupportedType)
    /// );
    /// ```
    pub fn from_content_type(content_type: &str) -> Result<Self, AvatarRejection> {
        match content_type {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            _ => Err(AvatarRejection::UnsupportedType),
        }
    }

    /// File extension for stored copies.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Avatar bytes that passed the type and size checks.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    format: AvatarFormat,
    bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Accept bytes of a known format, enforcing the size ceiling.
    pub fn new(format: AvatarFormat, bytes: Vec<u8>) -> Result<Self, AvatarRejection> {
        if bytes.len() > AVATAR_MAX_BYTES {
            return Err(AvatarRejection::TooLarge);
        }
        Ok(Self { format, bytes })
    }

    /// Image format.
    pub fn format(&self) -> AvatarFormat {
        self.format
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the upload, yielding its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for AvatarUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarUpload")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
