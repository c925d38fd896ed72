use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{ImageError, Result};
use crate::palette::Palette;

/// A palette image: one palette index per pixel
///
/// This is what quantization produces and what gets written to disk, so the
/// output PNG keeps the exact palette instead of a full-color approximation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Palette,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Create an indexed image
    ///
    /// `indices` is row-major and holds `width * height` entries.
    pub fn new(width: u32, height: u32, palette: Palette, indices: Vec<u8>) -> Self {
        debug_assert_eq!(indices.len(), width as usize * height as usize);
        Self {
            width,
            height,
            palette,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Palette index at the given coordinates
    pub fn index_at(&self, x: u32, y: u32) -> u8 {
        self.indices[(y as usize * self.width as usize) + x as usize]
    }

    /// Blow every pixel up into a `scale` x `scale` block
    pub fn enlarge(&self, scale: u32) -> IndexedImage {
        let width = self.width * scale;
        let height = self.height * scale;

        let mut indices = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let row = (y / scale) as usize * self.width as usize;
            for x in 0..width {
                indices.push(self.indices[row + (x / scale) as usize]);
            }
        }

        IndexedImage::new(width, height, self.palette.clone(), indices)
    }

    /// Expand back to a full-color image
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            self.palette
                .get(self.index_at(x, y))
                .map(|color| Rgb(color.to_array()))
                .unwrap_or(Rgb([0, 0, 0]))
        })
    }

    /// Write an 8-bit indexed PNG, replacing any existing file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let encode_failed = |reason: String| ImageError::EncodeFailed {
            path: path.display().to_string(),
            reason,
        };

        if self.palette.is_empty() {
            return Err(encode_failed("palette is empty".to_string()).into());
        }

        let file = File::create(path).map_err(|e| encode_failed(e.to_string()))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(self.palette.to_rgb_bytes());

        let mut writer = encoder
            .write_header()
            .map_err(|e| encode_failed(e.to_string()))?;
        writer
            .write_image_data(&self.indices)
            .map_err(|e| encode_failed(e.to_string()))?;
        writer.finish().map_err(|e| encode_failed(e.to_string()))?;

        Ok(())
    }
}
