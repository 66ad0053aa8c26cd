//! Notification Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Token or chat id missing
    #[error("Telegram notifications are disabled")]
    Disabled,

    /// Bot API rejected the message
    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },

    /// Transport failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl NotifyError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            Self::Disabled => "Telegram is not configured; printing locally.",
            Self::Api { .. } => "Telegram rejected the message.",
            Self::Network(_) => "Telegram is unreachable.",
        }
    }
}
