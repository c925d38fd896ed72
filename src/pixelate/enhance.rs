//! Brightness and contrast enhancement
//!
//! Both adjustments blend each pixel with a degenerate image and a factor:
//! brightness blends towards black, contrast towards the mean grey level of
//! the picture. A factor of 1.0 leaves the image untouched.

use image::RgbImage;

/// Scale every channel by `factor`, clamped to the valid range
pub fn adjust_brightness(image: &mut RgbImage, factor: f32) {
    if factor == 1.0 {
        return;
    }

    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = clamp_channel(*channel as f32 * factor);
        }
    }
}

/// Push every channel away from (or towards) the mean grey level by `factor`
pub fn adjust_contrast(image: &mut RgbImage, factor: f32) {
    if factor == 1.0 {
        return;
    }

    let mean = mean_luma(image) as f32;
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = clamp_channel(mean + factor * (*channel as f32 - mean));
        }
    }
}

/// Rounded mean of the ITU-R 601-2 luma of all pixels
pub fn mean_luma(image: &RgbImage) -> u8 {
    let count = image.width() as u64 * image.height() as u64;
    if count == 0 {
        return 0;
    }

    let total: u64 = image
        .pixels()
        .map(|p| luma(p.0) as u64)
        .sum();

    ((total + count / 2) / count) as u8
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

fn clamp_channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 17 % 256) as u8, (y * 31 % 256) as u8, ((x + y) * 7 % 256) as u8])
        })
    }

    #[test]
    fn test_identity_factors_leave_pixels_unchanged() {
        let original = gradient(32, 16);
        let mut image = original.clone();

        adjust_brightness(&mut image, 1.0);
        adjust_contrast(&mut image, 1.0);

        assert_eq!(image, original);
    }

    #[test]
    fn test_brightness_is_multiplicative_and_clamped() {
        let mut image = RgbImage::from_pixel(2, 2, Rgb([100, 200, 10]));
        adjust_brightness(&mut image, 1.5);
        assert_eq!(image.get_pixel(0, 0), &Rgb([150, 255, 15]));

        let mut image = RgbImage::from_pixel(1, 1, Rgb([100, 200, 10]));
        adjust_brightness(&mut image, 0.5);
        assert_eq!(image.get_pixel(0, 0), &Rgb([50, 100, 5]));
    }

    #[test]
    fn test_zero_brightness_is_black() {
        let mut image = gradient(8, 8);
        adjust_brightness(&mut image, 0.0);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_contrast_spreads_around_mean() {
        // Half black, half white: mean luma is 128 (127.5 rounded up)
        let mut image = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        assert_eq!(mean_luma(&image), 128);

        adjust_contrast(&mut image, 0.5);
        assert_eq!(image.get_pixel(0, 0), &Rgb([64, 64, 64]));
        assert_eq!(image.get_pixel(1, 0), &Rgb([191, 191, 191]));
    }

    #[test]
    fn test_zero_contrast_is_flat_grey() {
        let mut image = gradient(16, 16);
        let mean = mean_luma(&image);
        adjust_contrast(&mut image, 0.0);
        assert!(image.pixels().all(|p| p.0 == [mean, mean, mean]));
    }

    #[test]
    fn test_luma_weights() {
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([255, 0, 0]), 76);
        assert_eq!(luma([0, 255, 0]), 150);
        assert_eq!(luma([0, 0, 255]), 29);
    }
}
