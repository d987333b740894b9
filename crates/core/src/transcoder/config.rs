//! Configuration for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external-tool transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscoderConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Path to the Lottie frame-sequence converter (python-lottie's
    /// `lottie_convert.py`).
    #[serde(default = "default_lottie_converter_path")]
    pub lottie_converter_path: PathBuf,

    /// Directory for intermediate files (removed on success).
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Target resolution for converted animations; output fits within a
    /// square of this size, aspect preserved.
    #[serde(default = "default_target_size")]
    pub target_size: u32,

    /// Timeout for a single tool invocation in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_lottie_converter_path() -> PathBuf {
    PathBuf::from("lottie_convert.py")
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("packgrab")
}

fn default_target_size() -> u32 {
    512
}

fn default_timeout() -> u64 {
    120
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            lottie_converter_path: default_lottie_converter_path(),
            temp_dir: default_temp_dir(),
            target_size: default_target_size(),
            timeout_secs: default_timeout(),
            ffmpeg_log_level: default_log_level(),
        }
    }
}

impl TranscoderConfig {
    /// Creates a config with custom tool paths.
    pub fn with_paths(
        ffmpeg_path: PathBuf,
        ffprobe_path: PathBuf,
        lottie_converter_path: PathBuf,
    ) -> Self {
        Self {
            ffmpeg_path,
            ffprobe_path,
            lottie_converter_path,
            ..Default::default()
        }
    }

    /// Sets the temp directory.
    pub fn with_temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Sets the target resolution.
    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Sets the tool timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
