//! Telegram Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, TelegramError>;

/// Telegram channel errors
#[derive(Error, Debug)]
pub enum TelegramError {
    /// Transport-level failure
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Bot API returned ok=false
    #[error("Telegram API error: {0}")]
    Api(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<TelegramError> for relay_core::RelayError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Config(msg) => relay_core::RelayError::Config(msg),
            other => relay_core::RelayError::Notify(other.to_string()),
        }
    }
}
