//! Writing finished sketches to disk.
//!
//! The sketch is black strokes on transparency. Formats that cannot
//! carry alpha (JPEG, BMP) always get the strokes composited onto white;
//! PNG and WebP keep the transparency unless flattening is requested.

use std::path::{Path, PathBuf};

use graphite_pipeline::RgbaImage;
use image::{DynamicImage, ImageFormat};

/// Errors that can occur while saving a sketch.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The output extension does not map to a supported encoder.
    #[error("cannot infer an image format from {}", .0.display())]
    UnknownFormat(PathBuf),

    /// Encoding or writing the file failed.
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// `<input stem>-sketch.png` next to the input file.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}-sketch.png"))
}

/// Composite `image` over an opaque white background.
#[must_use]
pub fn flatten_on_white(image: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let over = |c: u8| {
            let a = u16::from(a);
            let blended = (u16::from(c) * a + 255 * (255 - a) + 127) / 255;
            u8::try_from(blended).unwrap_or(u8::MAX)
        };
        image::Rgba([over(r), over(g), over(b), 255])
    })
}

/// Whether the encoder for `format` preserves an alpha channel.
const fn keeps_alpha(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::WebP)
}

/// Save `sketch` to `path`, choosing the encoder from the extension.
///
/// # Errors
///
/// Returns [`SaveError::UnknownFormat`] if the extension is not
/// recognized and [`SaveError::Encode`] if encoding or writing fails.
pub fn save(sketch: &RgbaImage, path: &Path, flatten: bool) -> Result<(), SaveError> {
    let format =
        ImageFormat::from_path(path).map_err(|_| SaveError::UnknownFormat(path.to_path_buf()))?;

    let output = if flatten || !keeps_alpha(format) {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(flatten_on_white(sketch)).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(sketch.clone())
    };

    output
        .save_with_format(path, format)
        .map_err(|source| SaveError::Encode {
            path: path.to_path_buf(),
            source,
        })
}
