//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::OutputArtifact;
use crate::telegram::StickerKind;

/// Outcome of processing one sticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOutcome {
    /// One-based position within the pack (API order).
    pub index: usize,
    /// Sticker unique id.
    pub unique_id: String,
    /// Content classification.
    pub kind: StickerKind,
    /// Artifacts written for this item (may be empty on failure).
    pub artifacts: Vec<OutputArtifact>,
    /// Error message when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one pack run. Item outcomes are in pack order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Normalized pack name.
    pub pack_name: String,
    /// Pack display title.
    pub pack_title: String,
    /// Directory the artifacts were written to.
    pub output_dir: PathBuf,
    /// Per-item outcomes, one per sticker, in API order.
    pub outcomes: Vec<ItemOutcome>,
}

impl RunSummary {
    /// Number of items processed (equals the pack's sticker count).
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    /// Total artifacts written across all items.
    pub fn artifact_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.artifacts.len()).sum()
    }

    /// True when every item processed cleanly.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Outcomes that failed, for reporting.
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}
