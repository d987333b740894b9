//! Types for the store module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::raster::StaticFormat;

/// What an output artifact contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Static image in one of the configured output formats.
    Static(StaticFormat),
    /// Looping APNG produced from an animated source.
    Apng,
    /// Raw Lottie animation as served by the API.
    LottieSource,
    /// Raw video clip as served by the API (conversion disabled).
    VideoSource,
}

/// A file written to the output directory.
///
/// One sticker may produce several artifacts (one per configured static
/// format, or a raw source plus its converted animation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputArtifact {
    /// Unique id of the sticker this artifact came from.
    pub item_id: String,
    /// Final path on disk.
    pub path: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Content classification.
    pub kind: ArtifactKind,
}
