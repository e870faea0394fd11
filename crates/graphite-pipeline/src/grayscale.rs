//! Grayscale conversion.
//!
//! First stage of the sketch pipeline. The output stays RGBA so every
//! later stage works on a single image type: R, G, and B carry the same
//! luminance value and alpha is copied from the source.

use crate::types::RgbaImage;

/// Convert an RGBA image to monochrome, keeping alpha.
///
/// Uses the `image` crate's luminance weighting, so green contributes
/// most and blue least.
#[must_use = "returns the grayscale image"]
pub fn grayscale(image: &RgbaImage) -> RgbaImage {
    let luma = image::imageops::grayscale(image);
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let l = luma.get_pixel(x, y).0[0];
        let a = image.get_pixel(x, y).0[3];
        image::Rgba([l, l, l, a])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(r: u8, g: u8, b: u8) -> RgbaImage {
        RgbaImage::from_pixel(1, 1, image::Rgba([r, g, b, 255]))
    }

    #[test]
    fn output_dimensions_match_input() {
        let img = RgbaImage::from_pixel(17, 31, image::Rgba([128, 64, 32, 255]));
        let gray = grayscale(&img);
        assert_eq!(gray.dimensions(), (17, 31));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn color_channels_are_equal() {
        let img = RgbaImage::from_fn(5, 5, |x, y| {
            image::Rgba([(x * 50) as u8, (y * 40) as u8, 200, 255])
        });
        for pixel in grayscale(&img).pixels() {
            let [r, g, b, _] = pixel.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn alpha_is_preserved() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([10, 200, 30, 77]));
        for pixel in grayscale(&img).pixels() {
            assert_eq!(pixel.0[3], 77);
        }
    }

    #[test]
    fn weighted_luminance_orders_primaries() {
        let r = grayscale(&single(255, 0, 0)).get_pixel(0, 0).0[0];
        let g = grayscale(&single(0, 255, 0)).get_pixel(0, 0).0[0];
        let b = grayscale(&single(0, 0, 255)).get_pixel(0, 0).0[0];
        assert!(
            g > r && r > b,
            "expected green > red > blue luminance, got R={r} G={g} B={b}",
        );
    }

    #[test]
    fn white_stays_white() {
        let gray = grayscale(&single(255, 255, 255));
        assert_eq!(gray.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
