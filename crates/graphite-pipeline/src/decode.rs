//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the RGBA
//! working image every pipeline stage consumes. Decode failures are
//! reported before any filter runs.

use crate::types::{PipelineError, RgbaImage};

/// Decode raw image bytes into an RGBA image.
///
/// Supports whatever formats the `image` crate was built with. Color
/// types with fewer channels are widened to RGBA; images without alpha
/// become fully opaque.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}
