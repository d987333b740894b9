//! Output artifact storage.
//!
//! Filenames are derived deterministically from pack name, item index, and
//! the sticker's unique id, so no two items in a pack can collide.

mod error;
mod fs_store;
mod types;

pub use error::StoreError;
pub use fs_store::ArtifactStore;
pub use types::{ArtifactKind, OutputArtifact};
