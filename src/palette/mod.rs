//! # Palette Module
//!
//! Colors, palettes, and the plain-text palette file format.
//!
//! A palette file holds one color per line, either `RRGGBB` or `#RRGGBB`:
//!
//! ```text
//! #fff2e5
//! 1a1c2c
//! ```

pub mod loader;
pub mod types;

pub use loader::load_palette;
pub use types::{Color, Palette, MAX_PALETTE_COLORS};
