//! Color inversion.

use crate::types::RgbaImage;

/// Complement the R, G, and B channels (`255 - v`), keeping alpha.
#[must_use = "returns the inverted image"]
pub fn invert(image: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        image::Rgba([!r, !g, !b, a])
    })
}
