use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};
use crate::palette::MAX_PALETTE_COLORS;
use crate::pixelate::quantize::MIN_AUTOMATIC_COLORS;

/// Parameters for one pixelation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelateParams {
    /// Width of the low-resolution image, in pixels
    pub target_width: u32,

    /// Number of colors for automatic quantization (ignored with a palette file)
    pub palette_size: u32,

    /// Side length of the block each low-resolution pixel becomes
    pub pixel_scale: u32,

    /// Brightness factor (1.0 = no change, <1.0 = darker, >1.0 = brighter)
    pub brightness: f32,

    /// Contrast factor (1.0 = no change, <1.0 = lower contrast, >1.0 = higher contrast)
    pub contrast: f32,

    /// Optional palette file, one hex color per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_file: Option<PathBuf>,
}

impl Default for PixelateParams {
    fn default() -> Self {
        Self {
            target_width: 256,
            palette_size: 64,
            pixel_scale: 8,
            brightness: 1.0,
            contrast: 1.0,
            palette_file: None,
        }
    }
}

impl PixelateParams {
    pub fn with_target_width(mut self, target_width: u32) -> Self {
        self.target_width = target_width;
        self
    }

    pub fn with_palette_size(mut self, palette_size: u32) -> Self {
        self.palette_size = palette_size;
        self
    }

    pub fn with_pixel_scale(mut self, pixel_scale: u32) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }

    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_palette_file<P: Into<PathBuf>>(mut self, palette_file: P) -> Self {
        self.palette_file = Some(palette_file.into());
        self
    }

    /// Check the parameters before any image is touched
    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 {
            return Err(invalid("target_width must be greater than zero"));
        }

        if self.pixel_scale == 0 {
            return Err(invalid("pixel_scale must be greater than zero"));
        }

        let palette_size = self.palette_size as usize;
        if !(MIN_AUTOMATIC_COLORS..=MAX_PALETTE_COLORS).contains(&palette_size) {
            return Err(invalid(format!(
                "palette_size must be between {} and {}, got {}",
                MIN_AUTOMATIC_COLORS, MAX_PALETTE_COLORS, self.palette_size
            )));
        }

        if !self.brightness.is_finite() || self.brightness < 0.0 {
            return Err(invalid(format!("brightness must be a non-negative number, got {}", self.brightness)));
        }

        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(invalid(format!("contrast must be a non-negative number, got {}", self.contrast)));
        }

        Ok(())
    }

    /// Size of the downscaled image for a source of `width` x `height`
    ///
    /// The height is `floor(target_width * height / width)`.
    pub fn target_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        if width == 0 || height == 0 {
            return Err(invalid(format!("source image is empty ({}x{})", width, height)));
        }

        let aspect_ratio = height as f64 / width as f64;
        let target_height = (self.target_width as f64 * aspect_ratio).floor() as u32;
        if target_height == 0 {
            return Err(invalid(format!(
                "a {}x{} image is too wide for target_width {}",
                width, height, self.target_width
            )));
        }

        Ok((self.target_width, target_height))
    }

    /// Size of the final image for a source of `width` x `height`
    pub fn output_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let (w, h) = self.target_size(width, height)?;
        let scaled = |v: u32| {
            v.checked_mul(self.pixel_scale)
                .ok_or_else(|| invalid(format!("{} x pixel_scale {} overflows", v, self.pixel_scale)))
        };
        Ok((scaled(w)?, scaled(h)?))
    }
}

fn invalid<S: Into<String>>(details: S) -> crate::error::PixlessError {
    ImageError::InvalidParameters { details: details.into() }.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PixelateParams::default();
        assert_eq!(params.target_width, 256);
        assert_eq!(params.palette_size, 64);
        assert_eq!(params.pixel_scale, 8);
        assert_eq!(params.brightness, 1.0);
        assert_eq!(params.contrast, 1.0);
        assert!(params.palette_file.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_zero_width_and_scale_rejected() {
        assert!(PixelateParams::default().with_target_width(0).validate().is_err());
        assert!(PixelateParams::default().with_pixel_scale(0).validate().is_err());
    }

    #[test]
    fn test_palette_size_bounds() {
        assert!(PixelateParams::default().with_palette_size(0).validate().is_err());
        assert!(PixelateParams::default().with_palette_size(1).validate().is_err());
        assert!(PixelateParams::default().with_palette_size(2).validate().is_ok());
        assert!(PixelateParams::default().with_palette_size(256).validate().is_ok());
        assert!(PixelateParams::default().with_palette_size(257).validate().is_err());
    }

    #[test]
    fn test_bad_factors_rejected() {
        assert!(PixelateParams::default().with_brightness(f32::NAN).validate().is_err());
        assert!(PixelateParams::default().with_contrast(-0.5).validate().is_err());
        assert!(PixelateParams::default().with_contrast(0.0).validate().is_ok());
    }

    #[test]
    fn test_target_size_floors_height() {
        let params = PixelateParams::default().with_target_width(256);
        assert_eq!(params.target_size(512, 256).unwrap(), (256, 128));
        // 256 * 100 / 300 = 85.33
        assert_eq!(params.target_size(300, 100).unwrap(), (256, 85));
    }

    #[test]
    fn test_output_size_scales_exactly() {
        let params = PixelateParams::default().with_target_width(256).with_pixel_scale(4);
        assert_eq!(params.output_size(512, 256).unwrap(), (1024, 512));
    }

    #[test]
    fn test_degenerate_height_rejected() {
        let params = PixelateParams::default().with_target_width(4);
        assert!(params.target_size(1000, 10).is_err());
    }
}
