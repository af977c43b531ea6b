//! One-shot notifications shown on the next rendered page.

use serde::{Deserialize, Serialize};

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    /// Something the user must correct or retry.
    Error,
    /// Confirmation of a completed action.
    Success,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    /// Category.
    pub kind: FlashKind,
    /// User-facing text.
    pub message: String,
}

impl Flash {
    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }
}

/// Pending notifications split by category, as handed to a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessages {
    /// Error notifications in the order they were raised.
    pub error: Vec<String>,
    /// Success notifications in the order they were raised.
    pub success: Vec<String>,
}

impl FromIterator<Flash> for FlashMessages {
    fn from_iter<I: IntoIterator<Item = Flash>>(iter: I) -> Self {
        let mut messages = Self::default();
        for flash in iter {
            match flash.kind {
                FlashKind::Error => messages.error.push(flash.message),
                FlashKind::Success => messages.success.push(flash.message),
            }
        }
        messages
    }
}
