//! # Image Pixelation Module
//!
//! Turns a full-color image into blocky, limited-palette pixel art:
//! enhancement, nearest-neighbor downscale, quantization and integer
//! enlargement, saved as an indexed PNG.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pixless::pixelate::{pixelate_image, PixelateParams};
//!
//! # fn main() -> pixless::Result<()> {
//! let params = PixelateParams::default()
//!     .with_palette_size(4)
//!     .with_pixel_scale(4)
//!     .with_contrast(1.5)
//!     .with_palette_file("palettes/digital-paper.txt");
//!
//! pixelate_image("samples/brabham.jpg", "samples/brabham_pixelated.png", &params)?;
//! # Ok(())
//! # }
//! ```

pub mod enhance;
pub mod indexed;
pub mod params;
pub mod pipeline;
pub mod quantize;

pub use indexed::IndexedImage;
pub use params::PixelateParams;
pub use pipeline::{pixelate_image, Pixelator};
pub use quantize::Quantizer;
