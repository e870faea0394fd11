//! The sketch pipeline: six filter stages and a final render.
//!
//! ```text
//! source ─► grayscale ─► blur(radius) ─► invert ─┐
//!              │                                  ▼
//!              └──────────────(source)──────► soft-light blend (backdrop)
//!                                                 │
//!                  render ◄─ line overlay ◄─ brightness(+0.2)
//! ```
//!
//! Stages run in a fixed order for every variant; the variant only
//! selects the blur radius. The grayscale image feeds both the blur and
//! the blend, where it is the blend *source* and the blurred inverse is
//! the *backdrop*. Swapping those roles changes the output
//! substantially.
//!
//! A stage whose filter yields no image aborts the run. Later stages are
//! not attempted and no intermediate image reaches the caller.

use crate::diagnostics::{Clock, NoClock, PipelineDiagnostics, StageMetrics, StageRecorder};
use crate::filter::{FilterLibrary, ImageFilters};
use crate::types::{
    BRIGHTNESS_DELTA, Dimensions, EffectVariant, PipelineError, Region, RgbaImage, Stage,
};

/// Runs the pencil-sketch filter chain against a [`FilterLibrary`].
///
/// Holds no per-run state: `run` is a pure function of the source image
/// and variant for a deterministic library, and a pipeline may be
/// shared across threads when its library is `Sync`.
#[derive(Debug, Clone)]
pub struct SketchPipeline<L = ImageFilters> {
    library: L,
}

impl Default for SketchPipeline {
    fn default() -> Self {
        Self::new(ImageFilters::default())
    }
}

impl<L: FilterLibrary> SketchPipeline<L> {
    /// Create a pipeline over the given filter library.
    pub const fn new(library: L) -> Self {
        Self { library }
    }

    /// The filter library this pipeline calls into.
    pub const fn library(&self) -> &L {
        &self.library
    }

    /// Stylize `source` with the given variant.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::StageFailed`] tagged with the first
    /// stage whose filter produced no output.
    pub fn run(
        &self,
        source: &RgbaImage,
        variant: EffectVariant,
    ) -> Result<RgbaImage, PipelineError> {
        self.run_with_diagnostics(source, variant, &NoClock).0
    }

    /// Stylize `source` with the default variant ([`EffectVariant::Classic`]).
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_default(&self, source: &RgbaImage) -> Result<RgbaImage, PipelineError> {
        self.run(source, EffectVariant::default())
    }

    /// Decode encoded image bytes and stylize them.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] or
    /// [`PipelineError::ImageDecode`] before any filter runs if the
    /// bytes are not an image, otherwise as [`run`](Self::run).
    pub fn process(
        &self,
        bytes: &[u8],
        variant: EffectVariant,
    ) -> Result<RgbaImage, PipelineError> {
        let source = crate::decode::decode(bytes)?;
        self.run(&source, variant)
    }

    /// Stylize `source`, also returning per-stage diagnostics.
    ///
    /// Diagnostics are produced whether or not the run succeeds; on
    /// failure they name the failing stage.
    pub fn run_with_diagnostics<C: Clock>(
        &self,
        source: &RgbaImage,
        variant: EffectVariant,
        clock: &C,
    ) -> (Result<RgbaImage, PipelineError>, PipelineDiagnostics) {
        let mut recorder = StageRecorder::new(clock, variant, Dimensions::of(source));
        let result = self.execute(source, variant, &mut recorder);
        (result, recorder.finish())
    }

    fn execute<C: Clock>(
        &self,
        source: &RgbaImage,
        variant: EffectVariant,
        recorder: &mut StageRecorder<'_, C>,
    ) -> Result<RgbaImage, PipelineError> {
        let lib = &self.library;
        let radius = variant.parameters().blur_radius;

        let gray = recorder.stage(
            Stage::Grayscale,
            || lib.grayscale(source),
            |img| StageMetrics::Grayscale {
                width: img.width(),
                height: img.height(),
                mean_luma: crate::diagnostics::mean_luma(img),
            },
        )?;

        let blurred = recorder.stage(
            Stage::Blur,
            || lib.gaussian_blur(&gray, radius),
            |_| StageMetrics::Blur { radius },
        )?;

        let inverted = recorder.stage(
            Stage::Invert,
            || lib.invert(&blurred),
            |img| StageMetrics::Invert {
                mean_luma: crate::diagnostics::mean_luma(img),
            },
        )?;
        drop(blurred);

        let blended = recorder.stage(
            Stage::Blend,
            || lib.soft_light_blend(&gray, &inverted),
            |img| StageMetrics::Blend {
                mean_luma: crate::diagnostics::mean_luma(img),
            },
        )?;
        drop(inverted);
        drop(gray);

        let brightened = recorder.stage(
            Stage::Brightness,
            || lib.adjust_brightness(&blended, BRIGHTNESS_DELTA),
            |img| StageMetrics::Brightness {
                delta: BRIGHTNESS_DELTA,
                mean_luma: crate::diagnostics::mean_luma(img),
            },
        )?;
        drop(blended);

        let lined = recorder.stage(
            Stage::LineOverlay,
            || lib.line_overlay(&brightened),
            |img| StageMetrics::LineOverlay {
                stroke_pixel_count: crate::line_overlay::stroke_pixel_count(img),
                total_pixel_count: Dimensions::of(img).pixel_count(),
            },
        )?;
        drop(brightened);

        let region = Region::extent(Dimensions::of(source));
        recorder.stage(
            Stage::Render,
            || lib.render(&lined, region),
            |img| StageMetrics::Render {
                width: img.width(),
                height: img.height(),
            },
        )
    }
}
