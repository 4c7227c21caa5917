//! Camera frame sources.
//!
//! `FrameSource` is the seam between the capture loop and the device:
//! the real backend wraps a nokhwa camera, and `SyntheticSource` serves
//! a moving test pattern so the daemon runs on hosts without a camera.

use crate::config::CameraConfig;
use crate::errors::CameraError;
use crate::testing::synthetic_frame;
use crate::types::{CameraFormat, CameraFrame};

use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    CallbackCamera,
};

/// A device that produces one frame per call.
pub trait FrameSource: Send {
    /// Capture a single frame as an RGB8 buffer.
    fn capture_frame(&mut self) -> Result<CameraFrame, CameraError>;

    /// The format frames are captured at.
    fn format(&self) -> CameraFormat;
}

/// Real camera backend using nokhwa's native capture.
pub struct NokhwaSource {
    camera: CallbackCamera,
    device_id: String,
    format: CameraFormat,
}

impl NokhwaSource {
    /// Open the device and start its stream.
    pub fn open(device_id: &str, format: CameraFormat) -> Result<Self, CameraError> {
        let index = device_id.parse::<u32>().map_err(|_| {
            CameraError::InitializationError(format!("Invalid device ID: {}", device_id))
        })?;

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);
        let mut camera = CallbackCamera::new(CameraIndex::Index(index), requested, |_| {})
            .map_err(|e| {
                CameraError::InitializationError(format!("Failed to initialize camera: {}", e))
            })?;

        camera.open_stream().map_err(|e| {
            CameraError::InitializationError(format!("Failed to start stream: {}", e))
        })?;

        Ok(Self {
            camera,
            device_id: device_id.to_string(),
            format,
        })
    }
}

impl FrameSource for NokhwaSource {
    fn capture_frame(&mut self) -> Result<CameraFrame, CameraError> {
        let frame = self
            .camera
            .poll_frame()
            .map_err(|e| CameraError::CaptureError(format!("Failed to capture frame: {}", e)))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureError(format!("Failed to decode frame: {}", e)))?;

        Ok(CameraFrame::new(
            decoded.into_raw(),
            frame.resolution().width_x,
            frame.resolution().height_y,
            self.device_id.clone(),
        ))
    }

    fn format(&self) -> CameraFormat {
        self.format
    }
}

/// Test-pattern source: paced to the configured frame rate, no hardware.
pub struct SyntheticSource {
    format: CameraFormat,
    frame_number: u64,
    frame_interval: std::time::Duration,
}

impl SyntheticSource {
    pub fn new(format: CameraFormat) -> Self {
        Self {
            format,
            frame_number: 0,
            frame_interval: std::time::Duration::from_secs_f32(1.0 / format.fps),
        }
    }
}

impl FrameSource for SyntheticSource {
    fn capture_frame(&mut self) -> Result<CameraFrame, CameraError> {
        // The camera hardware paces a real source; here we sleep instead.
        std::thread::sleep(self.frame_interval);
        let frame = synthetic_frame(self.frame_number, self.format.width, self.format.height);
        self.frame_number += 1;
        Ok(frame)
    }

    fn format(&self) -> CameraFormat {
        self.format
    }
}

/// Construct the frame source named by the camera configuration.
pub fn open_source(config: &CameraConfig) -> Result<Box<dyn FrameSource>, CameraError> {
    let format = CameraFormat::new(
        config.resolution[0],
        config.resolution[1],
        config.fps,
    );

    if config.device_id == "synthetic" {
        log::info!(
            "Using synthetic frame source ({}x{} @ {} fps)",
            format.width,
            format.height,
            format.fps
        );
        return Ok(Box::new(SyntheticSource::new(format)));
    }

    log::info!(
        "Opening camera {} ({}x{} @ {} fps)",
        config.device_id,
        format.width,
        format.height,
        format.fps
    );
    let source = NokhwaSource::open(&config.device_id, format)?;
    Ok(Box::new(source))
}
