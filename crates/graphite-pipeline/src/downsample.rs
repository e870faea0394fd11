//! Input preparation: shrink oversized images before sketching.
//!
//! The pipeline itself never resizes. Callers that want a bounded
//! working size (or that retry a failed run with a smaller input) fit
//! the source within a maximum dimension first. Images already within
//! the limit are returned unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RgbaImage;

/// Resampling filter used when downsampling.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality,
/// with a `Disabled` variant to skip downsampling entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DownsampleFilter {
    /// Skip downsampling regardless of image size.
    Disabled,
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl DownsampleFilter {
    const fn to_image_filter(self) -> Option<image::imageops::FilterType> {
        match self {
            Self::Disabled => None,
            Self::Nearest => Some(image::imageops::FilterType::Nearest),
            Self::Triangle => Some(image::imageops::FilterType::Triangle),
            Self::CatmullRom => Some(image::imageops::FilterType::CatmullRom),
            Self::Gaussian => Some(image::imageops::FilterType::Gaussian),
            Self::Lanczos3 => Some(image::imageops::FilterType::Lanczos3),
        }
    }
}

impl fmt::Display for DownsampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "Disabled",
            Self::Nearest => "Nearest",
            Self::Triangle => "Triangle",
            Self::CatmullRom => "CatmullRom",
            Self::Gaussian => "Gaussian",
            Self::Lanczos3 => "Lanczos3",
        })
    }
}

/// Target size for fitting `(width, height)` within `max_dimension`
/// on the longest axis, preserving aspect ratio. Never returns a zero
/// axis for a non-empty input.
#[must_use]
pub fn fitted_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let long_axis = width.max(height);
    if long_axis <= max_dimension || long_axis == 0 {
        return (width, height);
    }
    let scale = |axis: u32| -> u32 {
        let scaled = (u64::from(axis) * u64::from(max_dimension) + u64::from(long_axis) / 2)
            / u64::from(long_axis);
        u32::try_from(scaled).unwrap_or(max_dimension).max(1)
    };
    (scale(width), scale(height))
}

/// Shrink `image` so its longest axis is at most `max_dimension`.
///
/// Takes ownership so an image that already fits is returned without
/// copying. The flag reports whether resampling happened.
#[must_use]
pub fn downsample(
    image: RgbaImage,
    max_dimension: u32,
    filter: DownsampleFilter,
) -> (RgbaImage, bool) {
    let Some(image_filter) = filter.to_image_filter() else {
        return (image, false);
    };

    let (w, h) = image.dimensions();
    let (target_w, target_h) = fitted_dimensions(w, h, max_dimension.max(1));
    if (target_w, target_h) == (w, h) {
        return (image, false);
    }

    let resized = image::imageops::resize(&image, target_w, target_h, image_filter);
    (resized, true)
}
