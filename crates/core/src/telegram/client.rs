//! Bot API client implementation.
//!
//! All three calls the tool needs (`getStickerSet`, `getFile`, the file
//! content download) go through one `reqwest` client with a shared timeout.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::TelegramConfig;

use super::error::TelegramError;
use super::traits::TelegramApi;
use super::types::{ApiEnvelope, FilePayload, StickerPack, StickerSetPayload};

/// Bot API client backed by HTTP.
pub struct BotApiClient {
    client: Client,
    api_url: String,
    token: String,
}

impl BotApiClient {
    /// Creates a new client from configuration.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        if config.bot_token.is_empty() {
            return Err(TelegramError::NotConfigured(
                "bot token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.bot_token,
        })
    }

    fn method_url(&self, method: &str, query: &str) -> String {
        format!("{}/bot{}/{}?{}", self.api_url, self.token, method, query)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.api_url, self.token, file_path)
    }

    /// Looks up the server-side path for a file id.
    async fn get_file(&self, file_id: &str) -> Result<FilePayload, TelegramError> {
        let url = self.method_url(
            "getFile",
            &format!("file_id={}", urlencoding::encode(file_id)),
        );

        debug!(file_id = file_id, "looking up file path");

        let response = self.client.get(&url).send().await?;
        let envelope: ApiEnvelope<FilePayload> = response
            .json()
            .await
            .map_err(|e| TelegramError::parse_error(format!("getFile response: {}", e)))?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or(0),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::parse_error("getFile returned ok without result"))
    }
}

#[async_trait]
impl TelegramApi for BotApiClient {
    fn name(&self) -> &str {
        "bot-api"
    }

    async fn get_sticker_set(&self, name: &str) -> Result<StickerPack, TelegramError> {
        let url = self.method_url(
            "getStickerSet",
            &format!("name={}", urlencoding::encode(name)),
        );

        debug!(pack = name, "fetching sticker set");

        let response = self.client.get(&url).send().await?;
        let envelope: ApiEnvelope<StickerSetPayload> = response
            .json()
            .await
            .map_err(|e| TelegramError::parse_error(format!("getStickerSet response: {}", e)))?;

        if !envelope.ok {
            let code = envelope.error_code.unwrap_or(0);
            // An unknown or malformed set name comes back as a 400 payload.
            if code == 400 || code == 404 {
                return Err(TelegramError::PackNotFound(name.to_string()));
            }
            return Err(TelegramError::Api {
                code,
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let payload = envelope
            .result
            .ok_or_else(|| TelegramError::parse_error("getStickerSet returned ok without result"))?;

        Ok(payload.into())
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, TelegramError> {
        let file = self.get_file(file_id).await?;
        let file_path = file.file_path.ok_or_else(|| TelegramError::FileUnavailable {
            file_id: file_id.to_string(),
        })?;

        let url = self.file_url(&file_path);
        debug!(file_id = file_id, path = %file_path, "downloading file");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Api {
                code: status.as_u16() as i64,
                description: body,
            });
        }

        let mut bytes = Vec::with_capacity(file.file_size.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        Ok(bytes)
    }
}
