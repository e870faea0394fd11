//! Line overlay: turn an image into pencil strokes.
//!
//! Detects edges with the Sobel operator and draws them as black strokes
//! on a transparent background. Stroke opacity grows with gradient
//! strength:
//!
//! ```text
//! m     = |sobel(luma)| / MAX_SOBEL_MAGNITUDE        (0..1)
//! alpha = clamp((m * edge_intensity - threshold) * contrast, 0, 1)
//! ```
//!
//! Flat regions fall below `threshold` and vanish; a high `contrast`
//! makes strokes snap to full opacity quickly. The source alpha scales
//! the result so transparent input never produces strokes.

use serde::{Deserialize, Serialize};

use crate::filter::{quantize, unit};
use crate::types::RgbaImage;

/// Largest gradient magnitude the 3x3 Sobel operator can report for
/// 8-bit input: `sqrt(1020² + 1020²)`.
pub const MAX_SOBEL_MAGNITUDE: f32 = 1_442.5;

/// Tuning for [`line_overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOverlayParams {
    /// Multiplier applied to the normalized gradient magnitude.
    pub edge_intensity: f32,
    /// Normalized magnitude below which no stroke is drawn.
    pub threshold: f32,
    /// Slope of the opacity ramp above `threshold`.
    pub contrast: f32,
}

impl LineOverlayParams {
    /// Default edge intensity.
    pub const DEFAULT_EDGE_INTENSITY: f32 = 1.0;
    /// Default threshold.
    pub const DEFAULT_THRESHOLD: f32 = 0.1;
    /// Default contrast.
    pub const DEFAULT_CONTRAST: f32 = 50.0;
}

impl Default for LineOverlayParams {
    fn default() -> Self {
        Self {
            edge_intensity: Self::DEFAULT_EDGE_INTENSITY,
            threshold: Self::DEFAULT_THRESHOLD,
            contrast: Self::DEFAULT_CONTRAST,
        }
    }
}

/// Draw the edges of `image` as black strokes on transparency.
#[must_use = "returns the line drawing"]
pub fn line_overlay(image: &RgbaImage, params: &LineOverlayParams) -> RgbaImage {
    let luma = image::imageops::grayscale(image);
    let gradients = imageproc::gradients::sobel_gradients(&luma);

    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let magnitude = f32::from(gradients.get_pixel(x, y).0[0]) / MAX_SOBEL_MAGNITUDE;
        let strength = (magnitude.mul_add(params.edge_intensity, -params.threshold)
            * params.contrast)
            .clamp(0.0, 1.0);
        let alpha = strength * unit(image.get_pixel(x, y).0[3]);
        image::Rgba([0, 0, 0, quantize(alpha)])
    })
}

/// Number of pixels carrying a visible stroke (alpha > 0).
#[must_use]
pub fn stroke_pixel_count(lines: &RgbaImage) -> u64 {
    lines.pixels().map(|p| u64::from(p.0[3] > 0)).sum()
}
