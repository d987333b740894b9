//! Error types for the raster module.

use thiserror::Error;

use super::types::StaticFormat;

/// Errors that can occur processing static images.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Input bytes are not a decodable image.
    #[error("Failed to decode image: {reason}")]
    DecodeFailed { reason: String },

    /// Encoding to the requested output format failed.
    #[error("Failed to encode image as {format:?}: {reason}")]
    EncodeFailed {
        format: StaticFormat,
        reason: String,
    },
}

impl RasterError {
    pub fn decode_failed(reason: impl Into<String>) -> Self {
        Self::DecodeFailed {
            reason: reason.into(),
        }
    }

    pub fn encode_failed(format: StaticFormat, reason: impl Into<String>) -> Self {
        Self::EncodeFailed {
            format,
            reason: reason.into(),
        }
    }
}
