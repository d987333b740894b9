//! Types for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Fallback frame rate when a clip carries no usable rate metadata.
pub const DEFAULT_FPS: f64 = 30.0;

/// Per-frame duration in milliseconds for an animation re-encoded from a
/// source running at `fps`, rounded to whole milliseconds.
///
/// `fps` must be positive; 20 fps yields 50 ms.
pub fn frame_delay_ms(fps: f64) -> u32 {
    ((1000.0 / fps).round() as u32).max(1)
}

/// A transcode job request.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    /// Unique job ID (pack index + sticker unique id).
    pub job_id: String,
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
}

/// Result of a successful transcode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeResult {
    /// Job ID.
    pub job_id: String,
    /// Output file path.
    pub output_path: PathBuf,
    /// Output file size in bytes.
    pub output_size_bytes: u64,
    /// Transcode duration in milliseconds.
    pub duration_ms: u64,
}

/// Information about an animated media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path.
    pub path: PathBuf,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Video width (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Video height (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Frame rate (if present).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
}

impl MediaProbe {
    /// Frame rate to use for re-encoding, falling back when unknown.
    pub fn fps_or_default(&self) -> f64 {
        match self.fps {
            Some(fps) if fps > 0.0 => fps,
            _ => DEFAULT_FPS,
        }
    }
}
