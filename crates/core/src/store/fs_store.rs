//! Filesystem-backed artifact store.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::StoreError;
use super::types::{ArtifactKind, OutputArtifact};

/// Writes output artifacts under a root directory, one subdirectory per pack.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `root`. Nothing is created until a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for one pack: `<root>/<name>_<sanitized title>`.
    pub fn pack_dir(&self, name: &str, title: &str) -> PathBuf {
        self.root.join(format!("{}_{}", name, sanitize_title(title)))
    }

    /// Deterministic artifact path. The index keeps listings in pack order;
    /// the unique id guarantees no two items collide.
    pub fn artifact_path(dir: &Path, index: usize, unique_id: &str, ext: &str) -> PathBuf {
        dir.join(format!("sticker_{:03}_{}.{}", index, unique_id, ext))
    }

    /// Creates a directory (and parents) if absent.
    pub async fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })
    }

    /// Writes bytes to `path` and returns the resulting artifact record.
    pub async fn write(
        &self,
        path: &Path,
        bytes: &[u8],
        item_id: &str,
        kind: ArtifactKind,
    ) -> Result<OutputArtifact, StoreError> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StoreError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");

        Ok(OutputArtifact {
            item_id: item_id.to_string(),
            path: path.to_path_buf(),
            size_bytes: bytes.len() as u64,
            kind,
        })
    }
}

/// Makes a pack title safe to use as a directory-name suffix.
///
/// Path separators and control characters become underscores; whitespace
/// collapses to single underscores.
fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_sep = false;
    for c in title.chars() {
        let mapped = if c.is_whitespace() || c == '/' || c == '\\' || c.is_control() {
            '_'
        } else {
            c
        };
        if mapped == '_' {
            if !last_was_sep {
                out.push('_');
            }
            last_was_sep = true;
        } else {
            out.push(mapped);
            last_was_sep = false;
        }
    }
    out.trim_matches('_').to_string()
}
