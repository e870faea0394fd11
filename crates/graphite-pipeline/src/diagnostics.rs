//! Pipeline diagnostics: timing and per-stage metrics.
//!
//! Diagnostics are returned to the caller alongside the result of
//! [`SketchPipeline::run_with_diagnostics`](crate::SketchPipeline::run_with_diagnostics);
//! the pipeline never prints or logs on its own. A failed run still
//! yields diagnostics covering every stage that completed, plus the
//! failing stage.
//!
//! Time is read through the caller-supplied [`Clock`], so the library
//! has no dependency on a global time source. [`NoClock`] reports zero
//! durations.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, EffectVariant, PipelineError, RgbaImage, Stage};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of elapsed time for stage measurements.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] that measures nothing: every duration is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClock;

impl Clock for NoClock {
    type Instant = ();

    fn now(&self) {}

    fn elapsed(&self, _since: &()) -> Duration {
        Duration::ZERO
    }
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// The variant the pipeline ran with.
    pub variant: EffectVariant,
    /// Dimensions of the source image.
    pub source: Dimensions,
    /// Completed stages, in execution order.
    pub stages: Vec<StageDiagnostics>,
    /// The stage that failed, if the run aborted.
    pub failure: Option<StageFailure>,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single completed stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Which stage ran.
    pub stage: Stage,
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Record of the stage at which a run aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    /// The failing stage.
    pub stage: Stage,
    /// Human-readable description of the failure.
    pub message: String,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Grayscale conversion metrics.
    Grayscale {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        /// Mean luminance of the output (0-255).
        mean_luma: f64,
    },
    /// Gaussian blur metrics.
    Blur {
        /// Radius used for the blur kernel.
        radius: f32,
    },
    /// Inversion metrics.
    Invert {
        /// Mean luminance of the output (0-255).
        mean_luma: f64,
    },
    /// Soft-light blend metrics.
    Blend {
        /// Mean luminance of the output (0-255).
        mean_luma: f64,
    },
    /// Brightness adjustment metrics.
    Brightness {
        /// Offset applied on the normalized scale.
        delta: f32,
        /// Mean luminance of the output (0-255).
        mean_luma: f64,
    },
    /// Line overlay metrics.
    LineOverlay {
        /// Pixels carrying a visible stroke.
        stroke_pixel_count: u64,
        /// Total pixel count for computing stroke coverage.
        total_pixel_count: u64,
    },
    /// Final render metrics.
    Render {
        /// Rendered width in pixels.
        width: u32,
        /// Rendered height in pixels.
        height: u32,
    },
}

impl PipelineDiagnostics {
    /// Diagnostics for `stage`, if it completed.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageDiagnostics> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Whether every stage including the render completed.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none() && self.stages.len() == Stage::ALL.len()
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Sketch Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)  |  Variant: {}",
            self.source.width,
            self.source.height,
            self.source.pixel_count(),
            self.variant,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        for diag in &self.stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            let name = diag.stage.name();
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        if let Some(ref failure) = self.failure {
            lines.push(String::new());
            lines.push(format!(
                "FAILED at {} (step {}): {}",
                failure.stage,
                failure.stage.index(),
                failure.message,
            ));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Grayscale {
            width,
            height,
            mean_luma,
        } => format!("{width}x{height} mean={mean_luma:.1}"),
        StageMetrics::Blur { radius } => format!("radius={radius:.2}"),
        StageMetrics::Invert { mean_luma } | StageMetrics::Blend { mean_luma } => {
            format!("mean={mean_luma:.1}")
        }
        StageMetrics::Brightness { delta, mean_luma } => {
            format!("delta={delta:+.2} mean={mean_luma:.1}")
        }
        StageMetrics::LineOverlay {
            stroke_pixel_count,
            total_pixel_count,
        } => {
            #[allow(clippy::cast_precision_loss)]
            let coverage = if *total_pixel_count > 0 {
                *stroke_pixel_count as f64 / *total_pixel_count as f64 * 100.0
            } else {
                0.0
            };
            format!("strokes={stroke_pixel_count} ({coverage:.1}%)")
        }
        StageMetrics::Render { width, height } => format!("{width}x{height}"),
    }
}

/// Mean luminance (0-255) over all pixels, ignoring alpha.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean_luma(image: &RgbaImage) -> f64 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = image
        .pixels()
        .map(|p| {
            let [r, g, b, _] = p.0;
            0.114_f64.mul_add(
                f64::from(b),
                0.299_f64.mul_add(f64::from(r), 0.587 * f64::from(g)),
            )
        })
        .sum();
    sum / count as f64
}

/// Times stages and accumulates [`StageDiagnostics`] during a run.
pub(crate) struct StageRecorder<'c, C: Clock> {
    clock: &'c C,
    started: C::Instant,
    variant: EffectVariant,
    source: Dimensions,
    stages: Vec<StageDiagnostics>,
    failure: Option<StageFailure>,
}

impl<'c, C: Clock> StageRecorder<'c, C> {
    pub(crate) fn new(clock: &'c C, variant: EffectVariant, source: Dimensions) -> Self {
        Self {
            started: clock.now(),
            clock,
            variant,
            source,
            stages: Vec::with_capacity(Stage::ALL.len()),
            failure: None,
        }
    }

    /// Run one stage's filter.
    ///
    /// On success the output is measured with `metrics` and returned. A
    /// `None` from the filter is recorded as the run's failure and
    /// converted into [`PipelineError::StageFailed`].
    pub(crate) fn stage(
        &mut self,
        stage: Stage,
        filter: impl FnOnce() -> Option<RgbaImage>,
        metrics: impl FnOnce(&RgbaImage) -> StageMetrics,
    ) -> Result<RgbaImage, PipelineError> {
        let start = self.clock.now();
        let Some(output) = filter() else {
            let err = PipelineError::StageFailed {
                stage,
                variant: self.variant,
            };
            self.failure = Some(StageFailure {
                stage,
                message: err.to_string(),
            });
            return Err(err);
        };
        let duration = self.clock.elapsed(&start);
        self.stages.push(StageDiagnostics {
            stage,
            duration,
            metrics: metrics(&output),
        });
        Ok(output)
    }

    pub(crate) fn finish(self) -> PipelineDiagnostics {
        PipelineDiagnostics {
            variant: self.variant,
            source: self.source,
            stages: self.stages,
            failure: self.failure,
            total_duration: self.clock.elapsed(&self.started),
        }
    }
}
