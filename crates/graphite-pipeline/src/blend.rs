//! Soft-light blending.
//!
//! Blends the sharp grayscale (source) over its blurred inverse
//! (backdrop). Soft light is gentler than color dodge: a mid-gray
//! source leaves the backdrop untouched, darker sources darken it, and
//! lighter sources lighten it.
//!
//! The formula is the W3C compositing soft-light definition, applied
//! per channel on unit-interval values:
//!
//! ```text
//! if S <= 0.5:  B - (1 - 2S) * B * (1 - B)
//! else:         B + (2S - 1) * (D(B) - B)
//!
//! D(B) = ((16B - 12)B + 4)B   if B <= 0.25
//!        sqrt(B)              otherwise
//! ```

use crate::filter::{quantize, unit};
use crate::types::RgbaImage;

/// Soft-light blend `source` over `backdrop`.
///
/// Alpha is composited source-over. Both images must share dimensions;
/// the caller checks this.
#[must_use = "returns the blended image"]
pub fn soft_light(source: &RgbaImage, backdrop: &RgbaImage) -> RgbaImage {
    debug_assert_eq!(source.dimensions(), backdrop.dimensions());

    RgbaImage::from_fn(source.width(), source.height(), |x, y| {
        let s = source.get_pixel(x, y).0;
        let b = backdrop.get_pixel(x, y).0;
        let mut out = [0_u8; 4];
        for c in 0..3 {
            out[c] = quantize(soft_light_channel(unit(s[c]), unit(b[c])));
        }
        let sa = unit(s[3]);
        let ba = unit(b[3]);
        out[3] = quantize(ba.mul_add(1.0 - sa, sa));
        image::Rgba(out)
    })
}

/// Soft-light of one channel: `s` is the source, `b` the backdrop.
fn soft_light_channel(s: f32, b: f32) -> f32 {
    if s <= 0.5 {
        (1.0 - 2.0 * s).mul_add(-b * (1.0 - b), b)
    } else {
        let d = if b <= 0.25 {
            (16.0_f32.mul_add(b, -12.0) * b + 4.0) * b
        } else {
            b.sqrt()
        };
        2.0_f32.mul_add(s, -1.0).mul_add(d - b, b)
    }
}
