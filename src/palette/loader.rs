use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::PaletteError;
use crate::palette::types::{Color, Palette};

/// Load a palette file
///
/// Returns `Ok(None)` when the file does not exist, so the caller can fall
/// back to automatic quantization. Any line that is not a six-digit hex color
/// is an error; blank lines are skipped.
pub fn load_palette<P: AsRef<Path>>(path: P) -> Result<Option<Palette>, PaletteError> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Palette file '{}' not found. Using default quantization.", source);
            return Ok(None);
        }
        Err(e) => return Err(PaletteError::Read { path: source, source: e }),
    };

    let palette = parse_palette(&content, &source)?;
    debug!("Loaded {} colors from {}", palette.len(), source);
    Ok(Some(palette))
}

impl Palette {
    /// Parse palette text that did not come from a file
    pub fn parse(text: &str) -> Result<Self, PaletteError> {
        parse_palette(text, "<inline>")
    }
}

fn parse_palette(text: &str, source: &str) -> Result<Palette, PaletteError> {
    let mut colors = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let color = Color::from_hex(line).ok_or_else(|| PaletteError::Malformed {
            path: source.to_string(),
            line: index + 1,
            content: line.to_string(),
        })?;
        colors.push(color);
    }

    let count = colors.len();
    Palette::new(colors).ok_or_else(|| PaletteError::TooManyColors {
        path: source.to_string(),
        count,
    })
}
