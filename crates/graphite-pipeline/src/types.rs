//! Shared types for the graphite sketch pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can hand images to the
/// pipeline without depending on `image` directly.
pub use image::RgbaImage;

/// Brightness offset applied after blending, on a normalized `[-1, 1]`
/// scale. Counteracts the darkening introduced by the soft-light blend.
pub const BRIGHTNESS_DELTA: f32 = 0.2;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangular pixel region used when rendering the final image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Region width in pixels.
    pub width: u32,
    /// Region height in pixels.
    pub height: u32,
}

impl Region {
    /// The full extent of an image with the given dimensions.
    #[must_use]
    pub const fn extent(dimensions: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    /// Whether this region lies entirely within `dimensions` and covers
    /// at least one pixel.
    #[must_use]
    pub fn fits_within(self, dimensions: Dimensions) -> bool {
        self.width > 0
            && self.height > 0
            && u64::from(self.x) + u64::from(self.width) <= u64::from(dimensions.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(dimensions.height)
    }
}

/// Named parameterization of the sketch pipeline.
///
/// Each variant selects a blur radius via [`StageParameters`]; every
/// other stage is identical across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectVariant {
    /// Balanced shading.
    #[default]
    Classic,
    /// Crisper, lighter shading.
    LightShading,
    /// Smoother, heavier shading.
    DeepShading,
    /// Very light blur that keeps fine texture.
    FineDetails,
}

impl EffectVariant {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Classic,
        Self::LightShading,
        Self::DeepShading,
        Self::FineDetails,
    ];

    /// The stage parameters for this variant.
    #[must_use]
    pub const fn parameters(self) -> StageParameters {
        StageParameters::for_variant(self)
    }

    /// The snake_case name used in serialized form and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::LightShading => "light_shading",
            Self::DeepShading => "deep_shading",
            Self::FineDetails => "fine_details",
        }
    }
}

impl fmt::Display for EffectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

/// Returned when parsing an unrecognized [`EffectVariant`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect variant {0:?} (expected classic, light_shading, deep_shading, or fine_details)")]
pub struct UnknownVariant(pub String);

/// Tunable parameters of the pipeline for one [`EffectVariant`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageParameters {
    /// Gaussian blur radius in pixels. Larger values give smoother,
    /// heavier shading.
    pub blur_radius: f32,
}

impl StageParameters {
    /// The constant parameter table.
    ///
    /// Exhaustive over [`EffectVariant`]: a new variant does not compile
    /// until it has an entry here.
    #[must_use]
    pub const fn for_variant(variant: EffectVariant) -> Self {
        let blur_radius = match variant {
            EffectVariant::Classic => 4.0,
            EffectVariant::LightShading => 2.5,
            EffectVariant::DeepShading => 6.0,
            EffectVariant::FineDetails => 1.5,
        };
        Self { blur_radius }
    }
}

/// One discrete step of the sketch pipeline.
///
/// The six filter stages run in the order of [`Stage::FILTERS`];
/// [`Stage::Render`] rasterizes the final node afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Monochrome conversion of the source.
    Grayscale,
    /// Gaussian blur of the grayscale image.
    Blur,
    /// Per-channel complement of the blurred image.
    Invert,
    /// Soft-light blend of the grayscale and inverted images.
    Blend,
    /// Brightness lift of the blended image.
    Brightness,
    /// Edge/line-drawing overlay.
    LineOverlay,
    /// Rasterization of the final node into a pixel buffer.
    Render,
}

impl Stage {
    /// The filter stages, in execution order.
    pub const FILTERS: [Self; 6] = [
        Self::Grayscale,
        Self::Blur,
        Self::Invert,
        Self::Blend,
        Self::Brightness,
        Self::LineOverlay,
    ];

    /// Every stage including the final render, in execution order.
    pub const ALL: [Self; 7] = [
        Self::Grayscale,
        Self::Blur,
        Self::Invert,
        Self::Blend,
        Self::Brightness,
        Self::LineOverlay,
        Self::Render,
    ];

    /// One-based position in the execution order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Blur => 2,
            Self::Invert => 3,
            Self::Blend => 4,
            Self::Brightness => 5,
            Self::LineOverlay => 6,
            Self::Render => 7,
        }
    }

    /// Human-readable stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Blur => "blur",
            Self::Invert => "invert",
            Self::Blend => "blend",
            Self::Brightness => "brightness",
            Self::LineOverlay => "line overlay",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors that can occur while producing a sketch.
///
/// [`EmptyInput`](Self::EmptyInput) and
/// [`ImageDecode`](Self::ImageDecode) are raised before any filter
/// runs. [`StageFailed`](Self::StageFailed) means a filter produced no
/// output; the remaining stages were not attempted.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// A filter stage did not produce an output image.
    #[error("{stage} stage (step {}) produced no output for variant {variant}", stage.index())]
    StageFailed {
        /// The stage whose filter failed.
        stage: Stage,
        /// The variant the pipeline was running.
        variant: EffectVariant,
    },
}

impl PipelineError {
    /// The failing stage, or `None` for decode failures.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            Self::EmptyInput | Self::ImageDecode(_) => None,
        }
    }

    /// Whether the source could not be interpreted as an image.
    #[must_use]
    pub const fn is_decode_failure(&self) -> bool {
        matches!(self, Self::EmptyInput | Self::ImageDecode(_))
    }
}
