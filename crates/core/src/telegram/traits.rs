//! Trait definitions for the telegram module.

use async_trait::async_trait;

use super::error::TelegramError;
use super::types::StickerPack;

/// A source of sticker packs and their file contents.
///
/// The Bot API implementation lives in [`super::BotApiClient`]; tests use the
/// mock in `crate::testing`.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    /// Returns the name of this API backend.
    fn name(&self) -> &str;

    /// Resolves a pack name to its metadata and ordered sticker list.
    ///
    /// Fails with [`TelegramError::PackNotFound`] when the pack does not exist
    /// or the API rejects the name. No retry.
    async fn get_sticker_set(&self, name: &str) -> Result<StickerPack, TelegramError>;

    /// Downloads the raw bytes of a sticker file.
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError>;
}
