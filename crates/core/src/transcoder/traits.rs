//! Trait definitions for the transcoder module.

use async_trait::async_trait;
use std::path::Path;

use super::error::TranscoderError;
use super::types::{MediaProbe, TranscodeJob, TranscodeResult};

/// A backend that turns animated sticker sources into looping APNGs.
///
/// Modeled as a capability so the per-item control flow never cares whether
/// frames come from shelling out to ffmpeg or from an in-process decoder.
#[async_trait]
pub trait AnimationTranscoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Probes an animated media file for dimensions and frame rate.
    async fn probe(&self, path: &Path) -> Result<MediaProbe, TranscoderError>;

    /// Re-encodes a video clip as a looping APNG.
    async fn video_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError>;

    /// Converts a Lottie animation to a looping APNG via an intermediate
    /// frame sequence. The intermediate is deleted on success; on failure all
    /// partial files are removed before the error is returned.
    async fn lottie_to_apng(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscoderError>;

    /// Validates that the transcoder's tools are available and ready.
    async fn validate(&self) -> Result<(), TranscoderError>;
}
