//! Recording configuration types

use serde::{Deserialize, Serialize};

/// Configuration for a video recording session
///
/// Rate control is left to the encoder's defaults; only parameters the
/// encoding pipeline actually consumes are configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Video width in pixels
    pub width: u32,
    /// Video height in pixels
    pub height: u32,
    /// Frames per second
    pub fps: f64,
    /// Enable fast-start for web playback (moov before mdat)
    pub fast_start: bool,
    /// Optional title metadata
    pub title: Option<String>,
}

impl RecordingConfig {
    /// Create a new recording configuration with explicit dimensions
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            fast_start: true,
            title: None,
        }
    }

    /// Set the title metadata
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set fast-start mode
    pub fn with_fast_start(mut self, enabled: bool) -> Self {
        self.fast_start = enabled;
        self
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self::new(640, 480, 20.0)
    }
}

/// Statistics returned after finishing a recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingStats {
    /// Total number of video frames written
    pub video_frames: u64,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Total bytes written to file
    pub bytes_written: u64,
    /// Number of frames skipped (empty encoder output)
    pub dropped_frames: u64,
    /// Output file path
    pub output_path: String,
}
