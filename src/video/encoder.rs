use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::VideoConfig;
use crate::error::{Result, VideoError};
use crate::video::types::FrameSequence;

/// Check whether the given ffmpeg executable can be run
pub fn check_ffmpeg_available(ffmpeg: &str) -> bool {
    Command::new(ffmpeg)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Assembles a pixelated frame sequence into a video with external ffmpeg
pub struct FrameEncoder<'a> {
    config: &'a VideoConfig,
}

impl<'a> FrameEncoder<'a> {
    pub fn new(config: &'a VideoConfig) -> Self {
        Self { config }
    }

    /// Encode every pixelated frame of `sequence`, in index order, at `fps`
    pub fn encode(&self, sequence: &FrameSequence, fps: f64, output_path: &Path) -> Result<()> {
        let fps = fps.to_string();
        let mut cmd = Command::new(&self.config.ffmpeg);
        cmd.args(["-y", "-v", "error", "-nostdin", "-framerate", fps.as_str(), "-i"])
            .arg(sequence.pixelated_pattern())
            .args([
                "-c:v", self.config.codec.as_str(),
                "-pix_fmt", self.config.pixel_format.as_str(),
            ])
            .arg(output_path)
            .stdin(Stdio::null());

        debug!("Running encoder: {:?}", cmd);

        let output = cmd.output().map_err(|e| VideoError::ToolUnavailable {
            tool: self.config.ffmpeg.clone(),
            reason: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::EncodingFailed {
                reason: format!("FFmpeg exited with {}: {}", output.status, stderr.trim()),
            }.into());
        }

        info!("Encoded {} frames at {} fps with {}", sequence.len(), fps, self.config.codec);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PixlessError;
    use tempfile::tempdir;

    #[test]
    fn test_missing_binary_is_unavailable() {
        assert!(!check_ffmpeg_available("definitely-not-ffmpeg-xyz"));
    }

    #[test]
    fn test_failed_encode_is_an_error() {
        if !check_ffmpeg_available("ffmpeg") {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }

        // An empty sequence: the image2 pattern matches no files
        let dir = tempdir().unwrap();
        let sequence = FrameSequence::new(dir.path());
        let output = dir.path().join("out.mp4");
        let config = VideoConfig::default();

        let err = FrameEncoder::new(&config).encode(&sequence, 24.0, &output).unwrap_err();
        assert!(matches!(err, PixlessError::Video(VideoError::EncodingFailed { .. })));
    }
}
