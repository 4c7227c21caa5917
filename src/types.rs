//! Core frame and format types shared across the capture, recording,
//! and streaming paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single captured image as a tightly packed RGB8 pixel buffer.
///
/// Ownership of a frame transfers into the shared frame cell after capture;
/// readers receive it behind an `Arc` and never mutate it.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Raw pixel data, `width * height * 3` bytes, row-major RGB.
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    /// Identifier of the device that produced this frame
    pub device_id: String,
}

impl CameraFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Utc::now(),
            device_id,
        }
    }

    /// Expected buffer length for the frame's dimensions.
    pub fn expected_len(&self) -> usize {
        (self.width * self.height * 3) as usize
    }

    /// A frame is well-formed when its buffer matches its dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.expected_len()
    }
}

/// Requested capture format: resolution and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub fps: f32,
}

impl CameraFormat {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        Self { width, height, fps }
    }
}

impl Default for CameraFormat {
    fn default() -> Self {
        // Matches the default recording profile
        Self::new(640, 480, 20.0)
    }
}
