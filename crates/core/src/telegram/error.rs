//! Error types for the telegram module.

use thiserror::Error;

/// Errors that can occur talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Client is missing required configuration.
    #[error("Telegram client not configured: {0}")]
    NotConfigured(String),

    /// The requested sticker pack does not exist.
    #[error("Sticker pack not found: {0}")]
    PackNotFound(String),

    /// The API returned an error payload.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The API knows the file but exposes no downloadable path for it.
    #[error("No downloadable path for file: {file_id}")]
    FileUnavailable { file_id: String },

    /// Transport-level failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("Failed to parse API response: {0}")]
    ParseError(String),
}

impl TelegramError {
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::ParseError(reason.into())
    }

    /// Whether the pack lookup itself failed (aborts the run) as opposed to a
    /// single file being unavailable.
    pub fn is_pack_error(&self) -> bool {
        matches!(self, Self::PackNotFound(_) | Self::NotConfigured(_))
    }
}
