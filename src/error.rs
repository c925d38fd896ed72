use thiserror::Error;

/// Main error type for the Pixless library
#[derive(Error, Debug)]
pub enum PixlessError {
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Palette-file errors
///
/// A missing palette file is not an error: the loader reports it as "no
/// palette" and the pixelator falls back to automatic quantization.
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Malformed color on line {line} of {path}: {content:?} (expected RRGGBB or #RRGGBB)")]
    Malformed {
        path: String,
        line: usize,
        content: String,
    },

    #[error("Palette {path} has {count} colors, at most 256 are supported")]
    TooManyColors { path: String, count: usize },

    #[error("Failed to read palette file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Still-image pipeline errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Failed to write image {path}: {reason}")]
    EncodeFailed { path: String, reason: String },

    #[error("Color quantization failed: {reason}")]
    QuantizationFailed { reason: String },

    #[error("Invalid pixelation parameters: {details}")]
    InvalidParameters { details: String },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("{tool} could not be started: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("Failed to probe video {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Video {path} does not declare a usable frame rate")]
    FrameRateUnavailable { path: String },

    #[error("No frames could be decoded from {path}")]
    NoFrames { path: String },

    #[error("Video decoding failed: {reason}")]
    DecodingFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Invalid video parameters: {details}")]
    InvalidParameters { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using PixlessError
pub type Result<T> = std::result::Result<T, PixlessError>;

impl PixlessError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::DecodeFailed { path, .. }) => {
                format!("Could not read image '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Palette(PaletteError::Malformed { path, line, content }) => {
                format!("Palette '{}' line {} ({:?}) is not a six-digit hex color.", path, line, content)
            }
            Self::Video(VideoError::ToolUnavailable { tool, .. }) => {
                format!("'{}' was not found. Please install FFmpeg and make sure it is on your PATH.", tool)
            }
            Self::Video(VideoError::FrameRateUnavailable { path }) => {
                format!("Could not determine the frame rate of '{}'. Is it a valid video?", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
