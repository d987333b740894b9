//! Testing utilities and mock implementations.
//!
//! Mock implementations of the external-service traits, so pack processing
//! can be exercised end to end without a bot token or installed tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use packgrab_core::testing::{fixtures, MockTelegramApi, MockTranscoder};
//!
//! let client = MockTelegramApi::new();
//! client.insert_pack(fixtures::pack("testpack", 3)).await;
//!
//! let transcoder = MockTranscoder::new();
//! transcoder.fail_job("002-u2").await;
//!
//! // Use with PackProcessor...
//! ```

mod mock_telegram;
mod mock_transcoder;

pub use mock_telegram::MockTelegramApi;
pub use mock_transcoder::{MockTranscoder, RecordedTranscode, TranscodeMode};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::telegram::{StickerItem, StickerKind, StickerPack};

    /// Create a sticker item with ids derived from its position.
    pub fn sticker(index: usize, kind: StickerKind) -> StickerItem {
        StickerItem {
            file_id: format!("file-{}", index),
            unique_id: format!("uid{}", index),
            kind,
            emoji: Some("🙂".to_string()),
        }
    }

    /// Create a pack of `count` static stickers.
    pub fn pack(name: &str, count: usize) -> StickerPack {
        StickerPack {
            name: name.to_string(),
            title: format!("{} Title", name),
            stickers: (1..=count).map(|i| sticker(i, StickerKind::Static)).collect(),
        }
    }

    /// Create a pack with one sticker of each kind: static, video, lottie.
    pub fn mixed_pack(name: &str) -> StickerPack {
        StickerPack {
            name: name.to_string(),
            title: format!("{} Title", name),
            stickers: vec![
                sticker(1, StickerKind::Static),
                sticker(2, StickerKind::Video),
                sticker(3, StickerKind::Lottie),
            ],
        }
    }
}
