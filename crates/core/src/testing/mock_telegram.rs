//! Mock Telegram API for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::telegram::{StickerPack, TelegramApi, TelegramError};

/// Mock implementation of the [`TelegramApi`] trait.
///
/// Provides controllable behavior for testing:
/// - Pre-loaded packs and file contents
/// - Per-file failure injection
/// - Records download order for assertions
#[derive(Debug, Clone, Default)]
pub struct MockTelegramApi {
    packs: Arc<RwLock<HashMap<String, StickerPack>>>,
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    failing_files: Arc<RwLock<HashSet<String>>>,
    download_log: Arc<RwLock<Vec<String>>>,
}

impl MockTelegramApi {
    /// Create a new mock with no packs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pack under its name.
    pub async fn insert_pack(&self, pack: StickerPack) {
        self.packs.write().await.insert(pack.name.clone(), pack);
    }

    /// Register the bytes served for a file id.
    pub async fn insert_file(&self, file_id: impl Into<String>, bytes: Vec<u8>) {
        self.files.write().await.insert(file_id.into(), bytes);
    }

    /// Make downloads of the given file id fail.
    pub async fn fail_download(&self, file_id: impl Into<String>) {
        self.failing_files.write().await.insert(file_id.into());
    }

    /// File ids in the order they were requested.
    pub async fn downloaded_files(&self) -> Vec<String> {
        self.download_log.read().await.clone()
    }

    /// Number of download attempts made.
    pub async fn download_count(&self) -> usize {
        self.download_log.read().await.len()
    }
}

#[async_trait]
impl TelegramApi for MockTelegramApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_sticker_set(&self, name: &str) -> Result<StickerPack, TelegramError> {
        self.packs
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| TelegramError::PackNotFound(name.to_string()))
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        self.download_log.write().await.push(file_id.to_string());

        if self.failing_files.read().await.contains(file_id) {
            return Err(TelegramError::FileUnavailable {
                file_id: file_id.to_string(),
            });
        }

        self.files
            .read()
            .await
            .get(file_id)
            .cloned()
            .ok_or_else(|| TelegramError::FileUnavailable {
                file_id: file_id.to_string(),
            })
    }
}
