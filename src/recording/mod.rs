//! Video recording: H.264 encoding (openh264) muxed into MP4 (muxide),
//! behind a single start/stop controller shared with the capture loop.

mod config;
mod controller;
mod encoder;
mod recorder;

pub use config::{RecordingConfig, RecordingStats};
pub use controller::RecordingController;
pub use encoder::{EncodedFrame, VideoEncoder};
pub use recorder::Recorder;
