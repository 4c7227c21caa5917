use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    InitializationError(String),
    CaptureError(String),
    EncodingError(String),
    MuxingError(String),
    IoError(String),
    StreamError(String),
    ConfigError(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CameraError::InitializationError(msg) => {
                write!(f, "Camera initialization error: {}", msg)
            }
            CameraError::CaptureError(msg) => write!(f, "Capture error: {}", msg),
            CameraError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            CameraError::MuxingError(msg) => write!(f, "Muxing error: {}", msg),
            CameraError::IoError(msg) => write!(f, "IO error: {}", msg),
            CameraError::StreamError(msg) => write!(f, "Stream error: {}", msg),
            CameraError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for CameraError {}
