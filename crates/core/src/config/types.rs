use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::processor::ProcessorConfig;
use crate::transcoder::TranscoderConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
}

/// Bot API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather. Required.
    pub bot_token: String,
    /// API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Root directory packs are written under.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("stickers")
}

/// Sanitized config for display and logging (bot token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub telegram: SanitizedTelegramConfig,
    pub output: OutputConfig,
    pub processor: ProcessorConfig,
    pub transcoder: TranscoderConfig,
}

/// Sanitized Bot API config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub api_url: String,
    pub bot_token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            telegram: SanitizedTelegramConfig {
                api_url: config.telegram.api_url.clone(),
                bot_token_configured: !config.telegram.bot_token.is_empty(),
                timeout_secs: config.telegram.timeout_secs,
            },
            output: config.output.clone(),
            processor: config.processor.clone(),
            transcoder: config.transcoder.clone(),
        }
    }
}
