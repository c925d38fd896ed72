use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::VideoConfig;
use crate::error::{Result, VideoError};
use crate::pixelate::{PixelateParams, Pixelator};
use crate::video::decoder::{FrameDecoder, FrameSource};
use crate::video::encoder::{check_ffmpeg_available, FrameEncoder};
use crate::video::probe::{effective_frame_rate, probe_video};
use crate::video::types::{FrameSequence, VideoMetadata};

/// Summary of a finished video
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub frame_count: usize,
    pub fps: f64,
    pub file_size: u64,
}

/// Frame-by-frame video pixelation
///
/// Every frame goes through the still-image pipeline via a scratch
/// directory, strictly one after the other:
/// 1. Probe - native frame rate and frame size
/// 2. Decode - ffmpeg streams raw frames, each saved as a numbered PNG
/// 3. Pixelate - each saved frame becomes a pixelated PNG
/// 4. Encode - ffmpeg turns the pixelated sequence back into a video
pub struct VideoPixelator {
    config: VideoConfig,
}

impl VideoPixelator {
    pub fn new(config: VideoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Pixelate `input_path` into `output_path`
    ///
    /// The output frame rate is `fps`, capped at the input's native rate. The
    /// container is chosen by ffmpeg from the output extension. Nothing is
    /// written to `output_path` unless encoding succeeds.
    pub fn pixelate<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
        params: &PixelateParams,
        fps: f64,
    ) -> Result<EncodedVideo> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        if !fps.is_finite() || fps <= 0.0 {
            return Err(VideoError::InvalidParameters {
                details: format!("fps must be a positive number, got {}", fps),
            }.into());
        }

        let pixelator = Pixelator::new(params.clone())?;

        if !check_ffmpeg_available(&self.config.ffmpeg) {
            return Err(VideoError::ToolUnavailable {
                tool: self.config.ffmpeg.clone(),
                reason: "FFmpeg not found. Please install FFmpeg.".to_string(),
            }.into());
        }

        let metadata = probe_video(input_path, &self.config)?;
        let fps = effective_frame_rate(fps, metadata.fps);
        info!("Detected FPS: {}, Using FPS: {}", metadata.fps, fps);

        // Removed on every exit path when it goes out of scope
        let scratch = tempfile::Builder::new().prefix("pixless-").tempdir()?;
        let mut sequence = FrameSequence::new(scratch.path());

        self.decode_and_pixelate(input_path, metadata, &pixelator, &mut sequence)?;

        if sequence.is_empty() {
            return Err(VideoError::NoFrames {
                path: input_path.display().to_string(),
            }.into());
        }

        let staged = scratch.path().join(staged_file_name(output_path));
        FrameEncoder::new(&self.config).encode(&sequence, fps, &staged)?;
        move_file(&staged, output_path)?;

        let file_size = std::fs::metadata(output_path)?.len();
        info!(
            "Pixelated video saved to: {:?} ({} frames, {:.1} KB)",
            output_path,
            sequence.len(),
            file_size as f64 / 1024.0
        );

        Ok(EncodedVideo {
            path: output_path.to_path_buf(),
            frame_count: sequence.len(),
            fps,
            file_size,
        })
    }

    fn decode_and_pixelate(
        &self,
        input_path: &Path,
        metadata: VideoMetadata,
        pixelator: &Pixelator,
        sequence: &mut FrameSequence,
    ) -> Result<()> {
        let mut decoder = FrameDecoder::spawn(input_path, metadata, &self.config, sequence.dir())?;

        let processed = pixelate_frames(&mut decoder, pixelator, sequence);
        // The decoder is released before encoding, whether or not every frame made it
        let released = decoder.release();

        let count = processed?;
        released?;

        debug!("Decoder released after {} frames", decoder.frames_read());
        info!("Pixelated {} frames", count);
        Ok(())
    }
}

impl Default for VideoPixelator {
    fn default() -> Self {
        Self::new(VideoConfig::default())
    }
}

/// Pixelate a video file with the default encoder settings
///
/// # Arguments
///
/// * `input_path` - Any video ffmpeg can decode
/// * `output_path` - Destination video, container chosen by extension
/// * `params` - Pipeline parameters applied to every frame
/// * `fps` - Requested frame rate, capped at the input's native rate
pub fn pixelate_video<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    params: &PixelateParams,
    fps: f64,
) -> Result<EncodedVideo> {
    VideoPixelator::default().pixelate(input_path, output_path, params, fps)
}

/// Drain `source`, saving and pixelating every frame into `sequence`
///
/// Returns the number of frames processed.
pub fn pixelate_frames<S: FrameSource>(
    source: &mut S,
    pixelator: &Pixelator,
    sequence: &mut FrameSequence,
) -> Result<usize> {
    let mut count = 0;

    while let Some(frame) = source.next_frame()? {
        let index = sequence.next_index();
        let frame_path = sequence.frame_path(index);
        let pixelated_path = sequence.pixelated_path(index);

        frame.save(&frame_path).map_err(|e| VideoError::DecodingFailed {
            reason: format!("Failed to save frame {}: {}", index, e),
        })?;
        pixelator.pixelate_file(&frame_path, &pixelated_path)?;

        count += 1;
        if count % 100 == 0 {
            debug!("Processed {} frames", count);
        }
    }

    Ok(count)
}

/// Name for the encoder's output inside the scratch directory
///
/// Keeps the extension so ffmpeg picks the same container.
fn staged_file_name(output_path: &Path) -> String {
    match output_path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("encoded.{}", ext),
        None => "encoded".to_string(),
    }
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_err() {
        // Scratch space may live on another filesystem
        warn!("Could not rename {:?} into place, copying instead", from);
        std::fs::copy(from, to)?;
    }
    Ok(())
}
