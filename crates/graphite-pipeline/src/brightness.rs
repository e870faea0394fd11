//! Brightness adjustment.

use crate::filter::{quantize, unit};
use crate::types::RgbaImage;

/// Add `delta` to each color channel on the unit scale, clamping to
/// `[0, 1]`. Alpha is untouched.
///
/// A `delta` of `0.2` lifts every channel by roughly 51 levels.
#[must_use = "returns the adjusted image"]
pub fn adjust_brightness(image: &RgbaImage, delta: f32) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let shift = |v: u8| quantize(unit(v) + delta);
        image::Rgba([shift(r), shift(g), shift(b), a])
    })
}
