//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during animation transcoding.
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// Lottie converter not found.
    #[error("Lottie converter not found at path: {path}")]
    LottieToolNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// An external tool exited with a non-zero status.
    #[error("{tool} failed with exit code {code:?}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// A tool invocation timed out and was killed.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout { tool: String, timeout_secs: u64 },

    /// Failed to probe media file.
    #[error("Failed to probe media file: {reason}")]
    ProbeFailed { reason: String },

    /// Failed to parse tool output.
    #[error("Failed to parse tool output: {reason}")]
    ParseError { reason: String },

    /// The tool reported success but produced no output file.
    #[error("Expected output file was not created: {path}")]
    OutputMissing { path: PathBuf },

    /// I/O error during transcoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Creates a tool failure error, dropping empty stderr.
    pub fn tool_failed(tool: impl Into<String>, code: Option<i32>, stderr: String) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            code,
            stderr: if stderr.trim().is_empty() {
                None
            } else {
                Some(stderr)
            },
        }
    }

    /// Creates a probe failure error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Io(_))
    }
}
