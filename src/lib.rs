//! # Pixless
//!
//! Turn photos and videos into low-resolution, limited-palette pixel art.
//!
//! An image is brightened and contrasted, shrunk with nearest-neighbor
//! sampling, reduced to a small palette without dithering, and blown back up
//! so each pixel becomes a crisp block. Videos get the same treatment frame
//! by frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pixless::{pixelate_image, pixelate_video, PixelateParams};
//!
//! # fn main() -> pixless::Result<()> {
//! let params = PixelateParams::default()
//!     .with_palette_size(4)
//!     .with_pixel_scale(4);
//!
//! pixelate_image("samples/brabham.jpg", "samples/brabham_pixelated.png", &params)?;
//! pixelate_video("my_video.mp4", "my_video_pixelated.mp4", &params, 30.0)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`palette`] - Colors, palettes and the hex palette file format
//! - [`pixelate`] - The still-image pipeline
//! - [`video`] - Frame-by-frame video processing through ffmpeg
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod palette;
pub mod pixelate;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::{Config, VideoConfig},
    error::{PixlessError, Result},
    palette::{load_palette, Color, Palette},
    pixelate::{pixelate_image, PixelateParams, Pixelator},
    video::{find_frame_rate, pixelate_video, VideoPixelator},
};
