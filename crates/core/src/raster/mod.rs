//! Static image processing.
//!
//! Static stickers arrive as WebP. This module decodes them, downscales
//! anything larger than the configured maximum dimension (aspect preserved),
//! and encodes to each configured output format.

mod error;
mod ops;
mod types;

pub use error::RasterError;
pub use ops::{decode, encode, fit_within};
pub use types::StaticFormat;
