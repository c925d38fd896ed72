//! Color quantization without dithering
//!
//! Two strategies produce an [`IndexedImage`]: a fixed palette, where each
//! pixel takes the nearest palette entry, and an automatic palette chosen by
//! `imagequant` (a modified median-cut) for the image itself.

use std::collections::HashMap;

use image::RgbImage;
use imagequant::RGBA;
use tracing::debug;

use crate::error::{ImageError, Result};
use crate::palette::{Color, Palette, MAX_PALETTE_COLORS};
use crate::pixelate::indexed::IndexedImage;

/// Smallest palette `imagequant` will build
pub const MIN_AUTOMATIC_COLORS: usize = 2;

/// How the colors of an image are reduced
#[derive(Debug, Clone)]
pub enum Quantizer {
    /// Map every pixel to the nearest color of a fixed palette
    Fixed(Palette),
    /// Choose up to this many colors with median-cut
    MedianCut(usize),
}

impl Quantizer {
    pub fn quantize(&self, image: &RgbImage) -> Result<IndexedImage> {
        match self {
            Self::Fixed(palette) => Ok(map_to_palette(image, palette.clone())),
            Self::MedianCut(colors) => median_cut(image, *colors),
        }
    }
}

/// Assign every pixel the index of its nearest palette entry
///
/// The palette must not be empty.
pub fn map_to_palette(image: &RgbImage, palette: Palette) -> IndexedImage {
    let mut lookup: HashMap<Color, u8> = HashMap::new();
    let indices = image
        .pixels()
        .map(|pixel| {
            let color = Color::from(*pixel);
            *lookup
                .entry(color)
                .or_insert_with(|| palette.nearest(color).unwrap_or(0))
        })
        .collect();

    IndexedImage::new(image.width(), image.height(), palette, indices)
}

/// Quantize to at most `max_colors` colors chosen from the image itself
///
/// The budget is clamped to what `imagequant` supports. Dithering is off, so
/// every pixel is remapped to its nearest palette entry.
pub fn median_cut(image: &RgbImage, max_colors: usize) -> Result<IndexedImage> {
    let max_colors = max_colors.clamp(MIN_AUTOMATIC_COLORS, MAX_PALETTE_COLORS);
    let failed = |e: imagequant::Error| ImageError::QuantizationFailed { reason: e.to_string() };

    let bitmap: Vec<RGBA> = image
        .pixels()
        .map(|p| RGBA { r: p[0], g: p[1], b: p[2], a: 255 })
        .collect();

    let mut liq = imagequant::new();
    liq.set_max_colors(max_colors as u32).map_err(failed)?;

    let mut img = liq
        .new_image(bitmap, image.width() as usize, image.height() as usize, 0.0)
        .map_err(failed)?;
    let mut res = liq.quantize(&mut img).map_err(failed)?;
    res.set_dithering_level(0.0).map_err(failed)?;

    let (palette, indices) = res.remapped(&mut img).map_err(failed)?;

    let colors: Vec<Color> = palette.iter().map(|c| Color::new(c.r, c.g, c.b)).collect();
    debug!("Median-cut chose {} colors (requested {})", colors.len(), max_colors);

    let palette = Palette::new(colors).ok_or_else(|| ImageError::QuantizationFailed {
        reason: "quantizer returned more than 256 colors".to_string(),
    })?;
    Ok(IndexedImage::new(image.width(), image.height(), palette, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn four_quadrants() -> RgbImage {
        RgbImage::from_fn(8, 8, |x, y| match (x < 4, y < 4) {
            (true, true) => Rgb([255, 0, 0]),
            (false, true) => Rgb([0, 255, 0]),
            (true, false) => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 255]),
        })
    }

    fn nearest_distance(palette: &Palette, color: Color) -> u32 {
        palette
            .iter()
            .map(|entry| entry.distance_squared(&color))
            .min()
            .unwrap()
    }

    #[test]
    fn test_median_cut_keeps_distinct_colors_when_budget_allows() {
        let indexed = median_cut(&four_quadrants(), 64).unwrap();
        assert!(indexed.palette().len() <= 4);

        for color in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]] {
            let distance = nearest_distance(indexed.palette(), Color::from(color));
            assert!(distance <= 12, "{:?} is {} away from the palette", color, distance);
        }
    }

    #[test]
    fn test_median_cut_respects_color_budget() {
        let image = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));

        for budget in [2, 5, 16] {
            let indexed = median_cut(&image, budget).unwrap();
            assert!(!indexed.palette().is_empty());
            assert!(indexed.palette().len() <= budget);
            assert!(indexed.indices().iter().all(|&i| (i as usize) < indexed.palette().len()));
        }
    }

    #[test]
    fn test_two_colors_separate_dark_from_light() {
        let image = RgbImage::from_fn(8, 2, |x, _| if x < 4 { Rgb([10, 10, 10]) } else { Rgb([240, 240, 240]) });
        let indexed = median_cut(&image, 2).unwrap();

        assert_eq!(indexed.index_at(0, 0), indexed.index_at(3, 1));
        assert_eq!(indexed.index_at(4, 0), indexed.index_at(7, 1));
        assert_ne!(indexed.index_at(0, 0), indexed.index_at(7, 0));
    }

    #[test]
    fn test_budget_below_minimum_is_clamped() {
        let indexed = median_cut(&four_quadrants(), 1).unwrap();
        assert!(indexed.palette().len() <= MIN_AUTOMATIC_COLORS);
    }

    #[test]
    fn test_fixed_palette_maps_to_nearest() {
        let palette = Palette::new(vec![Color::new(0, 0, 0), Color::new(255, 255, 255)]).unwrap();
        let image = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([10, 20, 30]),
            1 => Rgb([240, 250, 200]),
            _ => Rgb([127, 127, 127]),
        });

        let indexed = Quantizer::Fixed(palette).quantize(&image).unwrap();
        assert_eq!(indexed.indices(), &[0, 1, 0]);
        assert_eq!(indexed.width(), 3);
        assert_eq!(indexed.height(), 1);
    }

    #[test]
    fn test_requantizing_with_same_palette_is_stable() {
        let palette = Palette::new(vec![
            Color::new(20, 20, 20),
            Color::new(200, 40, 40),
            Color::new(40, 200, 40),
            Color::new(230, 230, 230),
        ])
        .unwrap();
        let image = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 90]));

        let quantizer = Quantizer::Fixed(palette);
        let first = quantizer.quantize(&image).unwrap();
        let second = quantizer.quantize(&first.to_rgb_image()).unwrap();

        assert_eq!(first.indices(), second.indices());
    }
}
