//! Gaussian blur for the shading layer.
//!
//! The blurred grayscale image is inverted and blended back over the
//! sharp grayscale, so the blur radius decides how soft and heavy the
//! pencil shading looks.

use image::GrayImage;

use crate::types::RgbaImage;

/// Blur an RGBA image by blurring each channel independently.
///
/// `radius` is used directly as the Gaussian standard deviation.
/// `imageproc::filter::gaussian_blur_f32` works on single-channel
/// images, so the input is split into four `GrayImage`s, each is
/// blurred, and the result is reassembled. Gaussian blur is linear and
/// per-channel, so this is equivalent to blurring in color space.
///
/// Non-positive radii return the image unchanged, since `imageproc`
/// panics on `sigma <= 0.0`.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur_rgba(image: &RgbaImage, radius: f32) -> RgbaImage {
    if radius <= 0.0 {
        return image.clone();
    }

    let (w, h) = image.dimensions();

    let channels: [GrayImage; 4] = std::array::from_fn(|c| {
        GrayImage::from_fn(w, h, |x, y| image::Luma([image.get_pixel(x, y).0[c]]))
    });

    let blurred: [GrayImage; 4] =
        std::array::from_fn(|c| imageproc::filter::gaussian_blur_f32(&channels[c], radius));

    RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba(std::array::from_fn(|c| blurred[c].get_pixel(x, y).0[0]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 gray image with a sharp black-to-white boundary at x=5.
    fn sharp_edge_image() -> RgbaImage {
        RgbaImage::from_fn(10, 10, |x, _y| {
            if x < 5 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn zero_radius_returns_identical_image() {
        let img = sharp_edge_image();
        assert_eq!(gaussian_blur_rgba(&img, 0.0), img);
    }

    #[test]
    fn negative_radius_returns_identical_image() {
        let img = sharp_edge_image();
        assert_eq!(gaussian_blur_rgba(&img, -1.0), img);
    }

    #[test]
    fn output_dimensions_preserved() {
        let img = RgbaImage::new(17, 31);
        let blurred = gaussian_blur_rgba(&img, 4.0);
        assert_eq!(blurred.dimensions(), (17, 31));
    }

    #[test]
    fn blur_smooths_sharp_edge() {
        let blurred = gaussian_blur_rgba(&sharp_edge_image(), 2.0);
        let left_of_edge = blurred.get_pixel(4, 5).0[0];
        let right_of_edge = blurred.get_pixel(5, 5).0[0];
        assert!(
            left_of_edge > 0,
            "expected blur to raise left-of-edge above 0, got {left_of_edge}",
        );
        assert!(
            right_of_edge < 255,
            "expected blur to lower right-of-edge below 255, got {right_of_edge}",
        );
    }

    #[test]
    fn larger_radius_spreads_further() {
        let img = sharp_edge_image();
        let narrow = gaussian_blur_rgba(&img, 1.5).get_pixel(2, 5).0[0];
        let wide = gaussian_blur_rgba(&img, 6.0).get_pixel(2, 5).0[0];
        assert!(
            wide > narrow,
            "expected radius 6.0 to reach further than 1.5 ({wide} vs {narrow})",
        );
    }

    #[test]
    fn uniform_image_unchanged_by_blur() {
        let img = RgbaImage::from_pixel(10, 10, image::Rgba([100, 150, 200, 250]));
        let blurred = gaussian_blur_rgba(&img, 2.5);
        let expected: [u8; 4] = [100, 150, 200, 250];
        for pixel in blurred.pixels() {
            for (c, &exp) in expected.iter().enumerate() {
                let diff = i16::from(pixel.0[c]) - i16::from(exp);
                assert!(
                    diff.abs() <= 1,
                    "channel {c}: expected ~{exp}, got {}",
                    pixel.0[c],
                );
            }
        }
    }
}
