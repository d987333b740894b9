//! Per-item sticker processing.
//!
//! [`PackProcessor`] drives the whole run: one pack fetch, then one pass over
//! the stickers in API order. Each item is downloaded, classified, and sent
//! down one of three paths:
//!
//! - static images are decoded, downscaled to fit the configured maximum, and
//!   encoded to each configured output format;
//! - video clips are re-encoded as looping APNGs;
//! - Lottie animations are saved raw and then converted to looping APNGs.
//!
//! A failure in one item is recorded in the [`RunSummary`] and does not stop
//! the remaining items; callers decide the exit status from the summary.

mod config;
mod pipeline;
mod types;

pub use config::ProcessorConfig;
pub use pipeline::{PackProcessor, ProcessorError};
pub use types::{ItemOutcome, RunSummary};
