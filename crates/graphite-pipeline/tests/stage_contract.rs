//! Integration tests: drive the pipeline through a recording filter library
//! and check ordering, parameters, short-circuiting, and decode handling.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Mutex;

use graphite_pipeline::{
    BRIGHTNESS_DELTA, EffectVariant, FilterLibrary, ImageFilters, NoClock, PipelineError, Region,
    RgbaImage, SketchPipeline, Stage,
};

/// A call observed by [`Recording`].
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Grayscale,
    Blur { radius: f32 },
    Invert,
    Blend { source_tag: u8, backdrop_tag: u8 },
    Brightness { delta: f32 },
    LineOverlay,
    Render { region: Region },
}

impl Call {
    const fn stage(&self) -> Stage {
        match self {
            Self::Grayscale => Stage::Grayscale,
            Self::Blur { .. } => Stage::Blur,
            Self::Invert => Stage::Invert,
            Self::Blend { .. } => Stage::Blend,
            Self::Brightness { .. } => Stage::Brightness,
            Self::LineOverlay => Stage::LineOverlay,
            Self::Render { .. } => Stage::Render,
        }
    }
}

/// Fake filter library.
///
/// Every output is tagged in pixel (0, 0)'s red channel with the stage
/// index that produced it, so the blend can report which images it was
/// handed. Optionally fails at one stage.
#[derive(Default)]
struct Recording {
    calls: Mutex<Vec<Call>>,
    fail_at: Option<Stage>,
}

impl Recording {
    fn failing_at(stage: Stage) -> Self {
        Self {
            fail_at: Some(stage),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call, input: &RgbaImage) -> Option<RgbaImage> {
        let stage = call.stage();
        self.calls.lock().unwrap().push(call);
        if self.fail_at == Some(stage) {
            return None;
        }
        let mut out = input.clone();
        #[allow(clippy::cast_possible_truncation)]
        let tag = stage.index() as u8;
        out.get_pixel_mut(0, 0).0[0] = tag;
        Some(out)
    }
}

fn tag(image: &RgbaImage) -> u8 {
    image.get_pixel(0, 0).0[0]
}

impl FilterLibrary for Recording {
    fn grayscale(&self, image: &RgbaImage) -> Option<RgbaImage> {
        self.record(Call::Grayscale, image)
    }

    fn gaussian_blur(&self, image: &RgbaImage, radius: f32) -> Option<RgbaImage> {
        self.record(Call::Blur { radius }, image)
    }

    fn invert(&self, image: &RgbaImage) -> Option<RgbaImage> {
        self.record(Call::Invert, image)
    }

    fn soft_light_blend(&self, source: &RgbaImage, backdrop: &RgbaImage) -> Option<RgbaImage> {
        let call = Call::Blend {
            source_tag: tag(source),
            backdrop_tag: tag(backdrop),
        };
        self.record(call, source)
    }

    fn adjust_brightness(&self, image: &RgbaImage, delta: f32) -> Option<RgbaImage> {
        self.record(Call::Brightness { delta }, image)
    }

    fn line_overlay(&self, image: &RgbaImage) -> Option<RgbaImage> {
        self.record(Call::LineOverlay, image)
    }

    fn render(&self, image: &RgbaImage, region: Region) -> Option<RgbaImage> {
        self.record(Call::Render { region }, image)
    }
}

fn source() -> RgbaImage {
    RgbaImage::from_pixel(6, 4, image::Rgba([200, 100, 50, 255]))
}

fn stages(calls: &[Call]) -> Vec<Stage> {
    calls.iter().map(Call::stage).collect()
}

#[test]
fn stages_run_in_fixed_order_for_every_variant() {
    for variant in EffectVariant::ALL {
        let library = Recording::default();
        let pipeline = SketchPipeline::new(&library);
        pipeline.run(&source(), variant).unwrap();
        assert_eq!(stages(&library.calls()), Stage::ALL, "variant {variant}");
    }
}

#[test]
fn blur_receives_table_radius() {
    let expected = [
        (EffectVariant::Classic, 4.0),
        (EffectVariant::LightShading, 2.5),
        (EffectVariant::DeepShading, 6.0),
        (EffectVariant::FineDetails, 1.5),
    ];
    for (variant, radius) in expected {
        let library = Recording::default();
        SketchPipeline::new(&library)
            .run(&source(), variant)
            .unwrap();
        assert_eq!(library.calls()[1], Call::Blur { radius }, "variant {variant}");
    }
}

#[test]
fn blend_gets_grayscale_as_source_and_inverted_as_backdrop() {
    let library = Recording::default();
    SketchPipeline::new(&library)
        .run(&source(), EffectVariant::Classic)
        .unwrap();
    assert_eq!(
        library.calls()[3],
        Call::Blend {
            source_tag: 1,
            backdrop_tag: 3,
        },
    );
}

#[test]
fn brightness_uses_fixed_delta_and_render_covers_source_extent() {
    let library = Recording::default();
    SketchPipeline::new(&library)
        .run(&source(), EffectVariant::DeepShading)
        .unwrap();
    let calls = library.calls();
    assert_eq!(
        calls[4],
        Call::Brightness {
            delta: BRIGHTNESS_DELTA
        }
    );
    assert_eq!(
        calls[6],
        Call::Render {
            region: Region {
                x: 0,
                y: 0,
                width: 6,
                height: 4,
            },
        },
    );
}

#[test]
fn failure_at_stage_k_stops_the_run() {
    for failing in Stage::ALL {
        let library = Recording::failing_at(failing);
        let err = SketchPipeline::new(&library)
            .run(&source(), EffectVariant::LightShading)
            .unwrap_err();

        match err {
            PipelineError::StageFailed { stage, variant } => {
                assert_eq!(stage, failing);
                assert_eq!(variant, EffectVariant::LightShading);
            }
            other => panic!("expected StageFailed at {failing}, got {other:?}"),
        }

        let observed = stages(&library.calls());
        assert_eq!(observed.len(), failing.index());
        assert_eq!(observed.last(), Some(&failing));
        assert!(observed.iter().all(|s| s.index() <= failing.index()));
    }
}

#[test]
fn failure_diagnostics_name_the_failing_stage() {
    let library = Recording::failing_at(Stage::Brightness);
    let (result, diag) = SketchPipeline::new(&library).run_with_diagnostics(
        &source(),
        EffectVariant::FineDetails,
        &NoClock,
    );
    assert!(result.is_err());
    assert_eq!(diag.stages.len(), 4);
    let failure = diag.failure.as_ref().expect("failure recorded");
    assert_eq!(failure.stage, Stage::Brightness);
    assert!(diag.report().contains("FAILED at brightness"));
}

#[test]
fn undecodable_bytes_never_reach_the_filters() {
    let library = Recording::default();
    let pipeline = SketchPipeline::new(&library);

    let err = pipeline
        .process(b"definitely not an image", EffectVariant::Classic)
        .unwrap_err();
    assert!(err.is_decode_failure());

    let err = pipeline.process(&[], EffectVariant::Classic).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));

    assert!(library.calls().is_empty());
}

#[test]
fn default_run_behaves_like_classic() {
    let library = Recording::default();
    let pipeline = SketchPipeline::new(&library);
    let a = pipeline.run_default(&source()).unwrap();
    let default_calls = library.calls();

    let library = Recording::default();
    let pipeline = SketchPipeline::new(&library);
    let b = pipeline.run(&source(), EffectVariant::Classic).unwrap();

    assert_eq!(a, b);
    assert_eq!(default_calls, library.calls());
}

#[test]
fn concurrent_runs_match_sequential_output() {
    let pipeline = SketchPipeline::new(ImageFilters::new());
    let image = RgbaImage::from_fn(32, 24, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let v = ((x * 7 + y * 11) % 256) as u8;
        image::Rgba([v, v.wrapping_mul(3), 255 - v, 255])
    });

    let expected: Vec<RgbaImage> = EffectVariant::ALL
        .iter()
        .map(|&v| pipeline.run(&image, v).unwrap())
        .collect();

    let concurrent: Vec<RgbaImage> = std::thread::scope(|scope| {
        let handles: Vec<_> = EffectVariant::ALL
            .iter()
            .map(|&v| {
                let pipeline = &pipeline;
                let image = &image;
                scope.spawn(move || pipeline.run(image, v).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(expected, concurrent);
}
