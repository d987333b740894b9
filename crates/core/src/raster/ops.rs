//! Decode, downscale, and encode operations for static stickers.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

use super::error::RasterError;
use super::types::StaticFormat;

/// Decodes raw sticker bytes into an image, sniffing the format.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, RasterError> {
    image::load_from_memory(bytes).map_err(|e| RasterError::decode_failed(e.to_string()))
}

/// Downscales so both dimensions fit within `max`, preserving aspect ratio.
///
/// Images already within bounds are returned untouched.
pub fn fit_within(img: DynamicImage, max: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max && height <= max {
        return img;
    }
    img.resize(max, max, FilterType::Lanczos3)
}

/// Encodes an image to the requested output format.
pub fn encode(img: &DynamicImage, format: StaticFormat) -> Result<Vec<u8>, RasterError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format.image_format())
        .map_err(|e| RasterError::encode_failed(format, e.to_string()))?;
    Ok(buffer.into_inner())
}
