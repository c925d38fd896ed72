use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::config::VideoConfig;
use crate::error::{Result, VideoError};
use crate::video::types::VideoMetadata;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// Read the geometry and frame rate of the first video stream
pub fn probe_video<P: AsRef<Path>>(path: P, config: &VideoConfig) -> Result<VideoMetadata> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let output = Command::new(&config.ffprobe)
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height,avg_frame_rate,r_frame_rate",
            "-of", "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| VideoError::ToolUnavailable {
            tool: config.ffprobe.clone(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VideoError::ProbeFailed {
            path: path_str,
            reason: stderr.trim().to_string(),
        }.into());
    }

    let json = String::from_utf8_lossy(&output.stdout);
    let metadata = parse_probe_output(&json, &path_str)?;

    debug!("Probed {}: {}x{} @ {:.3} fps", path_str, metadata.width, metadata.height, metadata.fps);
    Ok(metadata)
}

/// Native frame rate of a video
///
/// A missing or zero rate is reported as [`VideoError::FrameRateUnavailable`].
pub fn find_frame_rate<P: AsRef<Path>>(path: P, config: &VideoConfig) -> Result<f64> {
    Ok(probe_video(path, config)?.fps)
}

/// The rate to encode at: the requested rate, capped at the native one
pub fn effective_frame_rate(requested: f64, native: f64) -> f64 {
    requested.min(native)
}

fn parse_probe_output(json: &str, path: &str) -> Result<VideoMetadata> {
    let probe: ProbeOutput = serde_json::from_str(json).map_err(|e| VideoError::ProbeFailed {
        path: path.to_string(),
        reason: format!("unreadable ffprobe output: {}", e),
    })?;

    let stream = probe.streams.into_iter().next().ok_or_else(|| VideoError::ProbeFailed {
        path: path.to_string(),
        reason: "no video stream".to_string(),
    })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(VideoError::ProbeFailed {
                path: path.to_string(),
                reason: "video stream has no frame size".to_string(),
            }.into())
        }
    };

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .ok_or_else(|| VideoError::FrameRateUnavailable { path: path.to_string() })?;

    Ok(VideoMetadata { width, height, fps })
}

/// Parse an ffprobe rate such as `30000/1001` or `25`
///
/// Zero, negative and non-finite rates yield `None`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.parse().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}
