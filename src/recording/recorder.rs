//! MP4 recorder combining the H.264 encoder with the muxide muxer

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use muxide::api::{Metadata, MuxerBuilder, VideoCodec};

use super::config::{RecordingConfig, RecordingStats};
use super::encoder::VideoEncoder;
use crate::errors::CameraError;
use crate::types::CameraFrame;

/// An open recording: encodes frames to H.264 and muxes them into an MP4
/// file. Consumed by `finish()`, which flushes and closes the output.
pub struct Recorder {
    encoder: VideoEncoder,
    muxer: muxide::api::Muxer<BufWriter<File>>,
    config: RecordingConfig,
    output_path: String,
    frame_count: u64,
    dropped_frames: u64,
    start_time: Option<Instant>,
    frame_duration_secs: f64,
}

impl Recorder {
    /// Create a recorder writing to the given file.
    pub fn new<P: AsRef<Path>>(
        output_path: P,
        config: RecordingConfig,
    ) -> Result<Self, CameraError> {
        let output_path_str = output_path.as_ref().to_string_lossy().to_string();

        let file = File::create(&output_path)
            .map_err(|e| CameraError::IoError(format!("Failed to create output file: {}", e)))?;
        let writer = BufWriter::new(file);

        let encoder = VideoEncoder::new(config.width, config.height)?;

        let mut metadata = Metadata::new().with_current_time();
        if let Some(ref title) = config.title {
            metadata = metadata.with_title(title);
        }

        let muxer = MuxerBuilder::new(writer)
            .video(VideoCodec::H264, config.width, config.height, config.fps)
            .with_fast_start(config.fast_start)
            .with_metadata(metadata)
            .build()
            .map_err(|e| CameraError::MuxingError(format!("Failed to create muxer: {}", e)))?;

        let frame_duration_secs = 1.0 / config.fps;

        Ok(Self {
            encoder,
            muxer,
            config,
            output_path: output_path_str,
            frame_count: 0,
            dropped_frames: 0,
            start_time: None,
            frame_duration_secs,
        })
    }

    /// Encode and mux one captured frame.
    pub fn write_frame(&mut self, frame: &CameraFrame) -> Result<(), CameraError> {
        if frame.width != self.config.width || frame.height != self.config.height {
            return Err(CameraError::EncodingError(format!(
                "Frame dimensions {}x{} don't match recording config {}x{}",
                frame.width, frame.height, self.config.width, self.config.height
            )));
        }

        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }

        let encoded = self.encoder.encode_rgb(&frame.data)?;

        // The encoder may emit nothing for a frame; skip rather than mux
        // an empty sample.
        if encoded.data.is_empty() {
            self.dropped_frames += 1;
            return Ok(());
        }

        let pts = self.frame_count as f64 * self.frame_duration_secs;
        self.muxer
            .write_video(pts, &encoded.data, encoded.is_keyframe)
            .map_err(|e| CameraError::MuxingError(format!("Failed to write frame: {}", e)))?;

        self.frame_count += 1;
        Ok(())
    }

    /// Finalize the file and return statistics.
    pub fn finish(self) -> Result<RecordingStats, CameraError> {
        let muxer_stats = self
            .muxer
            .finish_with_stats()
            .map_err(|e| CameraError::MuxingError(format!("Failed to finalize recording: {}", e)))?;

        Ok(RecordingStats {
            video_frames: muxer_stats.video_frames,
            duration_secs: muxer_stats.duration_secs,
            bytes_written: muxer_stats.bytes_written,
            dropped_frames: self.dropped_frames,
            output_path: self.output_path,
        })
    }

    /// Number of frames written so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Path of the file being written.
    pub fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::synthetic_frame;
    use std::env::temp_dir;

    #[test]
    fn test_recorder_creation() {
        let output = temp_dir().join("camview_test_create.mp4");
        let config = RecordingConfig::new(640, 480, 20.0);

        let result = Recorder::new(&output, config);
        assert!(result.is_ok(), "Recorder should be created successfully");

        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn test_record_synthetic_frames() {
        let output = temp_dir().join("camview_test_frames.mp4");
        let config = RecordingConfig::new(640, 480, 20.0).with_title("test clip");

        let mut recorder = Recorder::new(&output, config).expect("Recorder creation failed");

        for i in 0..20 {
            let frame = synthetic_frame(i, 640, 480);
            recorder.write_frame(&frame).expect("Frame write should succeed");
        }

        let stats = recorder.finish().expect("Finish should succeed");
        assert_eq!(stats.video_frames, 20, "Should have 20 frames");
        assert!(stats.bytes_written > 0, "Should have written bytes");

        let metadata = std::fs::metadata(&output).expect("File should exist");
        assert!(metadata.len() > 0, "File should have content");

        let _ = std::fs::remove_file(&output);
    }

    #[test]
    fn test_mismatched_dimensions_rejected() {
        let output = temp_dir().join("camview_test_dims.mp4");
        let config = RecordingConfig::new(640, 480, 20.0);

        let mut recorder = Recorder::new(&output, config).expect("Recorder creation failed");
        let frame = synthetic_frame(0, 320, 240);

        let result = recorder.write_frame(&frame);
        assert!(matches!(result, Err(CameraError::EncodingError(_))));

        let _ = std::fs::remove_file(&output);
    }
}
