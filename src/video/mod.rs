//! # Video Processing Module
//!
//! Probes, decodes, pixelates and re-encodes videos frame by frame. Decoding
//! and encoding are done by external `ffmpeg`/`ffprobe` executables.

pub mod decoder;
pub mod encoder;
pub mod pixelator;
pub mod probe;
pub mod types;

pub use decoder::{FrameDecoder, FrameSource};
pub use encoder::{check_ffmpeg_available, FrameEncoder};
pub use pixelator::{pixelate_frames, pixelate_video, EncodedVideo, VideoPixelator};
pub use probe::{effective_frame_rate, find_frame_rate, probe_video};
pub use types::{FrameSequence, VideoMetadata};
