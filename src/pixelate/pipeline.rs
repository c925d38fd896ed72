use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{debug, info, warn};

use crate::error::{ImageError, Result};
use crate::palette::load_palette;
use crate::pixelate::enhance::{adjust_brightness, adjust_contrast};
use crate::pixelate::indexed::IndexedImage;
use crate::pixelate::params::PixelateParams;
use crate::pixelate::quantize::Quantizer;

/// Still-image pixelation pipeline
///
/// The pipeline runs in a fixed order:
/// 1. Enhancement - brightness, then contrast
/// 2. Downscale - nearest-neighbor to `target_width`, keeping the aspect ratio
/// 3. Quantization - fixed palette or median-cut, no dithering
/// 4. Enlargement - every pixel becomes a `pixel_scale` block
///
/// Building a `Pixelator` validates the parameters and resolves the palette
/// file once, so one instance can process many frames.
#[derive(Debug, Clone)]
pub struct Pixelator {
    params: PixelateParams,
    quantizer: Quantizer,
}

impl Pixelator {
    pub fn new(params: PixelateParams) -> Result<Self> {
        params.validate()?;
        let quantizer = Self::resolve_quantizer(&params)?;
        Ok(Self { params, quantizer })
    }

    fn resolve_quantizer(params: &PixelateParams) -> Result<Quantizer> {
        let automatic = Quantizer::MedianCut(params.palette_size as usize);

        let Some(palette_file) = &params.palette_file else {
            return Ok(automatic);
        };

        match load_palette(palette_file)? {
            Some(palette) if !palette.is_empty() => {
                info!("Using {} colors from palette {:?}", palette.len(), palette_file);
                Ok(Quantizer::Fixed(palette))
            }
            Some(_) => {
                warn!("Palette file {:?} has no colors. Using default quantization.", palette_file);
                Ok(automatic)
            }
            None => Ok(automatic),
        }
    }

    pub fn params(&self) -> &PixelateParams {
        &self.params
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Run the whole pipeline on an in-memory image
    pub fn pixelate(&self, mut image: RgbImage) -> Result<IndexedImage> {
        adjust_brightness(&mut image, self.params.brightness);
        adjust_contrast(&mut image, self.params.contrast);

        let small = self.downscale(&image)?;
        let quantized = self.quantizer.quantize(&small)?;

        debug!(
            "Quantized {}x{} image to {} colors",
            quantized.width(),
            quantized.height(),
            quantized.palette().len()
        );

        Ok(quantized.enlarge(self.params.pixel_scale))
    }

    /// Nearest-neighbor resize to the low-resolution working size
    pub fn downscale(&self, image: &RgbImage) -> Result<RgbImage> {
        let (width, height) = self.params.target_size(image.width(), image.height())?;
        // Reject sizes whose enlargement would overflow before any work is done
        self.params.output_size(image.width(), image.height())?;

        Ok(imageops::resize(image, width, height, FilterType::Nearest))
    }

    /// Decode `input`, pixelate it and write a PNG to `output`
    pub fn pixelate_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<()> {
        let input = input.as_ref();
        let output = output.as_ref();

        let image = image::open(input)
            .map_err(|e| ImageError::DecodeFailed {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?
            .to_rgb8();

        debug!("Pixelating {:?} ({}x{})", input, image.width(), image.height());

        let pixelated = self.pixelate(image)?;
        pixelated.save_png(output)?;

        debug!("Wrote {}x{} PNG to {:?}", pixelated.width(), pixelated.height(), output);
        Ok(())
    }
}

/// Pixelate a single image file into a PNG
///
/// # Arguments
///
/// * `input_path` - Any image the `image` crate can decode
/// * `output_path` - Destination PNG, overwritten if it exists
/// * `params` - Pipeline parameters
pub fn pixelate_image<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    params: &PixelateParams,
) -> Result<()> {
    let pixelator = Pixelator::new(params.clone())?;
    pixelator.pixelate_file(&input_path, &output_path)?;

    info!("Pixelated image saved to: {:?}", output_path.as_ref());
    Ok(())
}
