//! The filter library the sketch pipeline is written against.
//!
//! [`FilterLibrary`] has one method per pipeline stage. Each method
//! borrows its inputs and returns a freshly allocated image, or `None`
//! when the filter cannot produce output (for example an empty extent).
//! The pipeline turns `None` into a stage-tagged
//! [`PipelineError`](crate::PipelineError).
//!
//! [`ImageFilters`] is the bundled implementation on top of `image` and
//! `imageproc`. Tests substitute their own implementations to observe
//! call order and arguments.

use crate::line_overlay::LineOverlayParams;
use crate::types::{Dimensions, Region, RgbaImage};

/// Image-filter capabilities consumed by [`SketchPipeline`](crate::SketchPipeline).
///
/// Implementations must not mutate their inputs. A filter that fails
/// should fail the same way for the same input: the pipeline never
/// retries.
pub trait FilterLibrary {
    /// Convert to a monochrome image (equal R/G/B, alpha kept).
    fn grayscale(&self, image: &RgbaImage) -> Option<RgbaImage>;

    /// Gaussian blur with the given radius in pixels.
    fn gaussian_blur(&self, image: &RgbaImage, radius: f32) -> Option<RgbaImage>;

    /// Per-channel color complement (alpha kept).
    fn invert(&self, image: &RgbaImage) -> Option<RgbaImage>;

    /// Soft-light blend of `source` over `backdrop`.
    fn soft_light_blend(&self, source: &RgbaImage, backdrop: &RgbaImage) -> Option<RgbaImage>;

    /// Shift brightness by `delta` on a normalized `[-1, 1]` scale.
    fn adjust_brightness(&self, image: &RgbaImage, delta: f32) -> Option<RgbaImage>;

    /// Edge-detection line drawing.
    fn line_overlay(&self, image: &RgbaImage) -> Option<RgbaImage>;

    /// Rasterize `image` over `region` into a concrete pixel buffer.
    fn render(&self, image: &RgbaImage, region: Region) -> Option<RgbaImage>;
}

impl<L: FilterLibrary + ?Sized> FilterLibrary for &L {
    fn grayscale(&self, image: &RgbaImage) -> Option<RgbaImage> {
        (**self).grayscale(image)
    }

    fn gaussian_blur(&self, image: &RgbaImage, radius: f32) -> Option<RgbaImage> {
        (**self).gaussian_blur(image, radius)
    }

    fn invert(&self, image: &RgbaImage) -> Option<RgbaImage> {
        (**self).invert(image)
    }

    fn soft_light_blend(&self, source: &RgbaImage, backdrop: &RgbaImage) -> Option<RgbaImage> {
        (**self).soft_light_blend(source, backdrop)
    }

    fn adjust_brightness(&self, image: &RgbaImage, delta: f32) -> Option<RgbaImage> {
        (**self).adjust_brightness(image, delta)
    }

    fn line_overlay(&self, image: &RgbaImage) -> Option<RgbaImage> {
        (**self).line_overlay(image)
    }

    fn render(&self, image: &RgbaImage, region: Region) -> Option<RgbaImage> {
        (**self).render(image, region)
    }
}

/// [`FilterLibrary`] backed by the `image` and `imageproc` crates.
///
/// Stateless apart from its line-overlay tuning, so a single value can
/// be shared across threads. Every filter rejects zero-area input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageFilters {
    /// Tuning for the line-overlay stage.
    pub line_overlay: LineOverlayParams,
}

impl ImageFilters {
    /// Filters with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns `Some(image)` only if `image` has a non-zero extent.
fn non_empty(image: &RgbaImage) -> Option<&RgbaImage> {
    (!Dimensions::of(image).is_empty()).then_some(image)
}

impl FilterLibrary for ImageFilters {
    fn grayscale(&self, image: &RgbaImage) -> Option<RgbaImage> {
        non_empty(image).map(crate::grayscale::grayscale)
    }

    fn gaussian_blur(&self, image: &RgbaImage, radius: f32) -> Option<RgbaImage> {
        if !radius.is_finite() {
            return None;
        }
        non_empty(image).map(|img| crate::blur::gaussian_blur_rgba(img, radius))
    }

    fn invert(&self, image: &RgbaImage) -> Option<RgbaImage> {
        non_empty(image).map(crate::invert::invert)
    }

    fn soft_light_blend(&self, source: &RgbaImage, backdrop: &RgbaImage) -> Option<RgbaImage> {
        let source = non_empty(source)?;
        if source.dimensions() != backdrop.dimensions() {
            return None;
        }
        Some(crate::blend::soft_light(source, backdrop))
    }

    fn adjust_brightness(&self, image: &RgbaImage, delta: f32) -> Option<RgbaImage> {
        if !delta.is_finite() {
            return None;
        }
        non_empty(image).map(|img| crate::brightness::adjust_brightness(img, delta))
    }

    fn line_overlay(&self, image: &RgbaImage) -> Option<RgbaImage> {
        non_empty(image).map(|img| crate::line_overlay::line_overlay(img, &self.line_overlay))
    }

    fn render(&self, image: &RgbaImage, region: Region) -> Option<RgbaImage> {
        if !region.fits_within(Dimensions::of(image)) {
            return None;
        }
        Some(
            image::imageops::crop_imm(image, region.x, region.y, region.width, region.height)
                .to_image(),
        )
    }
}

/// Convert an 8-bit channel value to the unit interval.
pub(crate) fn unit(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Convert a unit-interval value back to an 8-bit channel, clamping
/// out-of-range input.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
