//! Types for the raster module.

use serde::{Deserialize, Serialize};

/// Output format for static stickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticFormat {
    /// WebP (lossless).
    Webp,
    /// Portable Network Graphics.
    Png,
}

impl StaticFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Png => "png",
        }
    }

    /// Returns the encoder format for the `image` crate.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Webp => image::ImageFormat::WebP,
            Self::Png => image::ImageFormat::Png,
        }
    }
}
