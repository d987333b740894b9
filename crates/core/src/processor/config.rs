//! Configuration for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::raster::StaticFormat;

/// Configuration for per-item sticker processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Maximum static-image dimension; larger images are downscaled to fit,
    /// aspect preserved.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    /// Output formats for static stickers (one artifact per format).
    #[serde(default = "default_static_formats")]
    pub static_formats: Vec<StaticFormat>,

    /// Whether animated stickers are converted to APNG. When false, the raw
    /// `.tgs`/`.webm` bytes are saved instead.
    #[serde(default = "default_transcode_animated")]
    pub transcode_animated: bool,

    /// Scratch directory for downloaded video clips awaiting transcode.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_max_dimension() -> u32 {
    512
}

fn default_static_formats() -> Vec<StaticFormat> {
    vec![StaticFormat::Webp]
}

fn default_transcode_animated() -> bool {
    true
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("packgrab-work")
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            static_formats: default_static_formats(),
            transcode_animated: default_transcode_animated(),
            work_dir: default_work_dir(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the maximum static-image dimension.
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Sets the static output formats.
    pub fn with_static_formats(mut self, formats: Vec<StaticFormat>) -> Self {
        self.static_formats = formats;
        self
    }

    /// Sets the scratch directory.
    pub fn with_work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = dir;
        self
    }

    /// Enables or disables animated transcoding.
    pub fn with_transcode_animated(mut self, enabled: bool) -> Self {
        self.transcode_animated = enabled;
        self
    }
}
