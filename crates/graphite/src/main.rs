//! graphite: turn a photograph into a pencil sketch.
//!
//! Reads an image file, runs the sketch pipeline on it, and writes the
//! result next to the input (or wherever `--output` points).
//!
//! # Usage
//!
//! ```text
//! graphite [--variant V] [--output PATH] [--max-dimension N]
//!          [--downsample-filter F] [--flatten] [--report] [--json] <INPUT>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod save;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use graphite_pipeline::diagnostics::Clock;
use graphite_pipeline::{DownsampleFilter, EffectVariant, SketchPipeline};

/// Pencil-sketch stylization for photographs.
#[derive(Parser)]
#[command(name = "graphite", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Sketch variant.
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    /// Output path. The format follows the extension.
    ///
    /// Defaults to `<input stem>-sketch.png` beside the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Shrink the input so its longest side is at most this many pixels.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_dimension: Option<u32>,

    /// Resampling filter used with `--max-dimension`.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_FILTER)]
    downsample_filter: Filter,

    /// Composite the strokes onto white instead of keeping transparency.
    #[arg(long)]
    flatten: bool,

    /// Print the per-stage diagnostics report to stderr.
    #[arg(long)]
    report: bool,

    /// Print diagnostics as JSON to stdout.
    #[arg(long)]
    json: bool,
}

/// Sketch variant selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Balanced shading (blur radius 4.0).
    Classic,
    /// Soft, airy shading (blur radius 2.5).
    LightShading,
    /// Heavy, smoky shading (blur radius 6.0).
    DeepShading,
    /// Crisp lines with little shading (blur radius 1.5).
    FineDetails,
}

impl From<Variant> for EffectVariant {
    fn from(v: Variant) -> Self {
        match v {
            Variant::Classic => Self::Classic,
            Variant::LightShading => Self::LightShading,
            Variant::DeepShading => Self::DeepShading,
            Variant::FineDetails => Self::FineDetails,
        }
    }
}

/// Downsample resampling filter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Filter {
    /// Skip downsampling regardless of image size.
    Disabled,
    /// Nearest-neighbor (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, decent quality).
    Triangle,
    /// Bicubic Catmull-Rom (moderate, good quality).
    CatmullRom,
    /// Gaussian (moderate, smooth).
    Gaussian,
    /// Lanczos with 3 lobes (slowest, sharpest).
    Lanczos3,
}

const fn filter_from_pipeline(f: DownsampleFilter) -> Filter {
    match f {
        DownsampleFilter::Disabled => Filter::Disabled,
        DownsampleFilter::Nearest => Filter::Nearest,
        DownsampleFilter::Triangle => Filter::Triangle,
        DownsampleFilter::CatmullRom => Filter::CatmullRom,
        DownsampleFilter::Gaussian => Filter::Gaussian,
        DownsampleFilter::Lanczos3 => Filter::Lanczos3,
    }
}

const fn filter_to_pipeline(f: Filter) -> DownsampleFilter {
    match f {
        Filter::Disabled => DownsampleFilter::Disabled,
        Filter::Nearest => DownsampleFilter::Nearest,
        Filter::Triangle => DownsampleFilter::Triangle,
        Filter::CatmullRom => DownsampleFilter::CatmullRom,
        Filter::Gaussian => DownsampleFilter::Gaussian,
        Filter::Lanczos3 => DownsampleFilter::Lanczos3,
    }
}

/// Kept in step with the pipeline's default filter.
const CLI_DEFAULT_FILTER: Filter = filter_from_pipeline(DownsampleFilter::Triangle);

fn main() -> ExitCode {
    let cli = Cli::parse();
    let variant = EffectVariant::from(cli.variant);

    let bytes = match std::fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let source = match graphite_pipeline::decode(&bytes) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let source = match cli.max_dimension {
        Some(max) => {
            let (w, h) = source.dimensions();
            let (resized, applied) = graphite_pipeline::downsample::downsample(
                source,
                max,
                filter_to_pipeline(cli.downsample_filter),
            );
            if applied {
                eprintln!(
                    "Downsampled {w}x{h} -> {}x{}",
                    resized.width(),
                    resized.height(),
                );
            }
            resized
        }
        None => source,
    };

    let pipeline = SketchPipeline::default();
    let (result, diagnostics) = pipeline.run_with_diagnostics(&source, variant, &StdClock);

    if cli.report {
        eprintln!("{}", diagnostics.report());
    }
    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let sketch = match result {
        Ok(sketch) => sketch,
        Err(e) => {
            eprintln!("Sketch failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = cli
        .output
        .unwrap_or_else(|| save::default_output_path(&cli.input));
    if let Err(e) = save::save(&sketch, &output, cli.flatten) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    eprintln!("Sketch ({variant}) written to {}", output.display());
    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
