//! Configuration management for camview
//!
//! Provides TOML-backed configuration for the HTTP server, camera device,
//! and recording storage, with logged fallback to defaults when no config
//! file is present.

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CamviewConfig {
    pub server: ServerConfig,
    pub camera: CameraConfig,
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

/// Camera device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Device id as understood by the capture backend, or "synthetic"
    /// for the built-in test-pattern source
    pub device_id: String,
    /// Capture resolution [width, height]
    pub resolution: [u32; 2],
    /// Capture and recording frame rate
    pub fps: f32,
}

/// Recording storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where finished recordings are written
    pub recordings_dir: String,
    /// JPEG quality for the live stream (1-100)
    pub jpeg_quality: u8,
}

impl Default for CamviewConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            camera: CameraConfig {
                device_id: "0".to_string(),
                resolution: [640, 480],
                fps: 20.0,
            },
            storage: StorageConfig {
                recordings_dir: "recordings".to_string(),
                jpeg_quality: 80,
            },
        }
    }
}

impl CamviewConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CameraError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: CamviewConfig = toml::from_str(&contents)
            .map_err(|e| CameraError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("camview.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.camera.resolution[0] == 0 || self.camera.resolution[1] == 0 {
            return Err("Invalid capture resolution".to_string());
        }
        if self.camera.fps <= 0.0 || self.camera.fps > 240.0 {
            return Err("Invalid FPS (must be 1-240)".to_string());
        }
        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err("JPEG quality must be between 1 and 100".to_string());
        }
        if self.storage.recordings_dir.is_empty() {
            return Err("Recordings directory must not be empty".to_string());
        }
        Ok(())
    }
}
