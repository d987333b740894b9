//! Types for the telegram module.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Matches the share-URL prefixes users paste instead of a bare pack name.
static PACK_URL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:www\.)?(?:t|telegram)\.me/addstickers/")
        .expect("pack URL prefix regex is valid")
});

/// Reduces a pack name or share URL to the bare identifier the Bot API expects.
///
/// `https://t.me/addstickers/foo` and `foo` both resolve to `foo`.
pub fn normalize_pack_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = PACK_URL_PREFIX.replace(trimmed, "");
    stripped.trim_matches('/').to_string()
}

/// How a sticker's content is encoded, derived from the API's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerKind {
    /// Static raster image (WebP).
    Static,
    /// Short looping video clip (WebM).
    Video,
    /// Vector animation (gzipped Lottie, `.tgs`).
    Lottie,
}

impl StickerKind {
    /// File extension of the raw bytes as served by the API.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Self::Static => "webp",
            Self::Video => "webm",
            Self::Lottie => "tgs",
        }
    }

    /// Whether this kind needs a transcode step to become a portable animation.
    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Video | Self::Lottie)
    }
}

/// A single sticker within a pack. Created from the API response, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerItem {
    /// Opaque token used to request the file content.
    pub file_id: String,
    /// Stable id, unique across packs; embedded in output filenames.
    pub unique_id: String,
    /// Content classification.
    pub kind: StickerKind,
    /// Emoji the sticker is associated with, when the API provides one.
    pub emoji: Option<String>,
}

/// A named, ordered collection of stickers. Immutable once fetched; item order
/// is the API-provided order and drives output numbering.
#[derive(Debug, Clone)]
pub struct StickerPack {
    pub name: String,
    pub title: String,
    pub stickers: Vec<StickerItem>,
}

impl StickerPack {
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// `getStickerSet` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct StickerSetPayload {
    pub name: String,
    pub title: String,
    pub stickers: Vec<StickerPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StickerPayload {
    pub file_id: String,
    pub file_unique_id: String,
    #[serde(default)]
    pub is_animated: bool,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl StickerPayload {
    fn kind(&self) -> StickerKind {
        // The flags are mutually exclusive in practice; animated wins if both set.
        if self.is_animated {
            StickerKind::Lottie
        } else if self.is_video {
            StickerKind::Video
        } else {
            StickerKind::Static
        }
    }
}

impl From<StickerPayload> for StickerItem {
    fn from(payload: StickerPayload) -> Self {
        let kind = payload.kind();
        Self {
            file_id: payload.file_id,
            unique_id: payload.file_unique_id,
            kind,
            emoji: payload.emoji,
        }
    }
}

impl From<StickerSetPayload> for StickerPack {
    fn from(payload: StickerSetPayload) -> Self {
        Self {
            name: payload.name,
            title: payload.title,
            stickers: payload.stickers.into_iter().map(Into::into).collect(),
        }
    }
}

/// `getFile` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct FilePayload {
    #[allow(dead_code)]
    pub file_id: String,
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
}
