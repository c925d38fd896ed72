use std::path::{Path, PathBuf};

/// Stream properties of a video file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Declared frames per second, always finite and positive
    pub fps: f64,
}

impl VideoMetadata {
    /// Size in bytes of one decoded RGB24 frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Numbered frames inside a scratch directory
///
/// Frame `n` is decoded to `frame_{n:05}.png` and pixelated to
/// `frame_{n:05}_pixelated.png`. The pixelated files form an image2 sequence
/// that ffmpeg reads back in index order.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    dir: PathBuf,
    len: usize,
}

impl FrameSequence {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            len: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve the next frame index
    pub fn next_index(&mut self) -> usize {
        let index = self.len;
        self.len += 1;
        index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }

    pub fn pixelated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{:05}_pixelated.png", index))
    }

    /// printf-style input pattern matching every pixelated frame
    pub fn pixelated_pattern(&self) -> PathBuf {
        self.dir.join("frame_%05d_pixelated.png")
    }

    /// Paths of all pixelated frames, in index order
    pub fn pixelated_frames(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (0..self.len).map(move |index| self.pixelated_path(index))
    }
}
