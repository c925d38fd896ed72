use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use tracing::{debug, warn};

use crate::config::VideoConfig;
use crate::error::{Result, VideoError};
use crate::video::types::VideoMetadata;

/// A sequential source of decoded frames
pub trait FrameSource {
    /// Decode the next frame, or `None` once the stream is exhausted
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// Streams RGB24 frames out of an ffmpeg child process
///
/// Frames arrive on the child's stdout, one `width * height * 3` block each.
/// The process is waited for by [`FrameDecoder::release`], and killed if the
/// decoder is dropped first.
pub struct FrameDecoder {
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    metadata: VideoMetadata,
    log_path: PathBuf,
    frames_read: usize,
    exhausted: bool,
}

impl FrameDecoder {
    /// Start decoding `input`
    ///
    /// The decoder's diagnostics go to `decoder.log` inside `scratch_dir`.
    pub fn spawn<P: AsRef<Path>>(
        input: P,
        metadata: VideoMetadata,
        config: &VideoConfig,
        scratch_dir: &Path,
    ) -> Result<Self> {
        let input = input.as_ref();
        let log_path = scratch_dir.join("decoder.log");
        let log = File::create(&log_path)?;

        let mut child = Command::new(&config.ffmpeg)
            .args(["-v", "error", "-nostdin", "-noautorotate", "-i"])
            .arg(input)
            // rawvideo would otherwise force constant-rate output, duplicating
            // or dropping frames of variable-rate input
            .args(["-map", "0:v:0", "-fps_mode", "passthrough"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(log))
            .spawn()
            .map_err(|e| VideoError::ToolUnavailable {
                tool: config.ffmpeg.clone(),
                reason: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        debug!("Decoding {:?} as {}x{} rgb24", input, metadata.width, metadata.height);

        Ok(Self {
            child: Some(child),
            stdout,
            metadata,
            log_path,
            frames_read: 0,
            exhausted: false,
        })
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }

    /// Close the stream and wait for the decoder process to exit
    ///
    /// A decoder that fails before producing any frame is an error; a failure
    /// after some frames only ends the stream early.
    pub fn release(&mut self) -> Result<()> {
        self.stdout.take();

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        // Stopped before the end of the stream: nothing more is wanted
        if !self.exhausted {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(());
        }

        let status = child.wait()?;
        if status.success() {
            return Ok(());
        }

        if self.frames_read > 0 {
            warn!("Decoder stopped after {} frames: {}", self.frames_read, self.read_log());
            return Ok(());
        }

        Err(VideoError::DecodingFailed {
            reason: format!("ffmpeg exited with {}: {}", status, self.read_log()),
        }.into())
    }

    fn read_log(&self) -> String {
        std::fs::read_to_string(&self.log_path)
            .map(|log| log.trim().to_string())
            .unwrap_or_default()
    }
}

impl FrameSource for FrameDecoder {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let frame_len = self.metadata.frame_len();
        let mut buffer = vec![0u8; frame_len];
        let mut filled = 0;

        while filled < frame_len {
            match stdout.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(VideoError::DecodingFailed {
                        reason: format!("reading frame {} failed: {}", self.frames_read, e),
                    }.into())
                }
            }
        }

        if filled < frame_len {
            if filled > 0 {
                warn!("Discarding truncated frame {} ({} of {} bytes)", self.frames_read, filled, frame_len);
            }
            self.stdout = None;
            self.exhausted = true;
            return Ok(None);
        }

        let frame = RgbImage::from_raw(self.metadata.width, self.metadata.height, buffer)
            .ok_or_else(|| VideoError::DecodingFailed {
                reason: format!("frame {} has the wrong size", self.frames_read),
            })?;

        self.frames_read += 1;
        Ok(Some(frame))
    }
}

impl Drop for FrameDecoder {
    fn drop(&mut self) {
        self.stdout.take();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
