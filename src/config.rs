use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    pixelate::PixelateParams,
};

/// Main configuration for Pixless
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixelation pipeline settings
    pub pixelate: PixelateParams,

    /// Video decoding and encoding settings
    pub video: VideoConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load a configuration file and check its values
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.pixelate.validate().map_err(|e| ConfigError::InvalidValue {
            key: "pixelate".to_string(),
            value: e.to_string(),
        })?;
        self.video.validate()?;
        Ok(())
    }
}

/// Video pipeline configuration
///
/// Codec and pixel format are passed straight to the encoder; the defaults
/// produce H.264 in a pixel format every player understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Requested output frame rate, capped at the source's native rate
    pub fps: f64,

    /// Encoder/decoder executable
    pub ffmpeg: String,

    /// Probe executable
    pub ffprobe: String,

    /// Output video codec
    pub codec: String,

    /// Output pixel format
    pub pixel_format: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "video.fps".to_string(),
                value: self.fps.to_string()
            }.into());
        }

        for (key, value) in [
            ("video.ffmpeg", &self.ffmpeg),
            ("video.ffprobe", &self.ffprobe),
            ("video.codec", &self.codec),
            ("video.pixel_format", &self.pixel_format),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone()
                }.into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("pixless.toml");

        let mut original_config = Config::default();
        original_config.pixelate.palette_file = Some("palettes/oil-6.txt".into());
        original_config.video.fps = 24.0;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[pixelate]\npixel_scale = 4\n\n[video]\ncodec = \"mpeg4\"\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.pixelate.pixel_scale, 4);
        assert_eq!(config.pixelate.target_width, 256);
        assert_eq!(config.video.codec, "mpeg4");
        assert_eq!(config.video.pixel_format, "yuv420p");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Config::from_file(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, crate::error::PixlessError::Config(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        std::fs::write(&file_path, "[video]\ncodec = \"\"\n").unwrap();

        // Parsing alone accepts it; loading does not
        assert!(Config::from_file(&file_path).is_ok());
        let err = Config::load(&file_path).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PixlessError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "video.codec"
        ));
    }

    #[test]
    fn test_load_accepts_valid_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("good.toml");
        std::fs::write(&file_path, "[pixelate]\npalette_size = 16\n").unwrap();

        let config = Config::load(&file_path).unwrap();
        assert_eq!(config.pixelate.palette_size, 16);
    }

    #[test]
    fn test_invalid_pixelate_config() {
        let mut config = Config::default();
        config.pixelate.target_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_fps() {
        let mut config = Config::default();
        config.video.fps = 0.0;
        assert!(config.validate().is_err());
    }
}
