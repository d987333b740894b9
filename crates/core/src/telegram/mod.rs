//! Telegram Bot API access.
//!
//! This module resolves a pack name to an ordered list of sticker descriptors
//! (`getStickerSet`) and downloads raw file bytes (`getFile` followed by a
//! content fetch). The [`TelegramApi`] trait is the seam the processor works
//! against; [`BotApiClient`] is the HTTP implementation.

mod client;
mod error;
mod traits;
mod types;

pub use client::BotApiClient;
pub use error::TelegramError;
pub use traits::TelegramApi;
pub use types::{normalize_pack_name, StickerItem, StickerKind, StickerPack};
