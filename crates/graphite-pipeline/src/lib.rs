//! graphite-pipeline: pencil-sketch stylization (sans-IO).
//!
//! Turns a photograph into a pencil drawing through a fixed chain:
//! grayscale -> blur -> invert -> soft-light blend -> brightness ->
//! line overlay -> render.
//!
//! The chain is written against the [`FilterLibrary`] trait.
//! [`ImageFilters`] implements it with `image` and `imageproc`; tests
//! and embedders can supply their own. This crate has **no I/O
//! dependencies**: it works on in-memory images and byte slices. File
//! handling lives in the `graphite` binary.

pub mod blend;
pub mod blur;
pub mod brightness;
pub mod decode;
pub mod diagnostics;
pub mod downsample;
pub mod filter;
pub mod grayscale;
pub mod invert;
pub mod line_overlay;
pub mod pipeline;
pub mod types;

pub use decode::decode;
pub use diagnostics::{Clock, NoClock, PipelineDiagnostics};
pub use downsample::DownsampleFilter;
pub use filter::{FilterLibrary, ImageFilters};
pub use line_overlay::LineOverlayParams;
pub use pipeline::SketchPipeline;
pub use types::{
    BRIGHTNESS_DELTA, Dimensions, EffectVariant, PipelineError, Region, RgbaImage, Stage,
    StageParameters, UnknownVariant,
};

/// Apply the pencil-sketch effect to a decoded image.
///
/// Uses the bundled [`ImageFilters`]. On failure no image is returned;
/// callers must not fall back to showing the original as if it were
/// the sketch.
///
/// # Errors
///
/// Returns [`PipelineError::StageFailed`] tagged with the stage whose
/// filter produced no output.
pub fn apply_pencil_sketch(
    image: &RgbaImage,
    variant: EffectVariant,
) -> Result<RgbaImage, PipelineError> {
    SketchPipeline::default().run(image, variant)
}

/// Decode image bytes (PNG, JPEG, BMP, WebP) and apply the pencil-sketch
/// effect.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized. Otherwise as [`apply_pencil_sketch`].
pub fn process(image_bytes: &[u8], variant: EffectVariant) -> Result<RgbaImage, PipelineError> {
    SketchPipeline::default().process(image_bytes, variant)
}
