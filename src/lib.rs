//! camview: a self-hosted web camera viewer.
//!
//! A background capture thread grabs frames from a camera device and
//! publishes each one to a single-slot shared frame cell. HTTP clients
//! watch the live feed as an MJPEG multipart stream, toggle MP4 recording,
//! and play back finished recordings with byte-range seeking.
//!
//! # Usage
//! ```rust,ignore
//! use camview::config::CamviewConfig;
//!
//! let config = CamviewConfig::load_or_default();
//! // see src/main.rs for the full startup sequence
//! ```

pub mod capture;
pub mod config;
pub mod errors;
pub mod frame_cell;
pub mod producer;
pub mod recording;
pub mod server;
pub mod types;

// Testing utilities - synthetic frames for hardware-free operation
pub mod testing;

// Re-exports for convenience
pub use errors::CameraError;
pub use frame_cell::SharedFrameCell;
pub use recording::{RecordingConfig, RecordingController, RecordingStats};
pub use types::{CameraFormat, CameraFrame};

/// Initialize logging for the camera server
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "camview=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod lib_tests {
    #[test]
    fn test_crate_metadata() {
        assert_eq!(super::NAME, "camview");
        assert!(!super::VERSION.is_empty());
    }
}
