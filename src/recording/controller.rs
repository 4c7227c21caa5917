//! Start/stop surface for recording sessions.
//!
//! At most one session is active at a time. The producer thread tees
//! frames through `write_frame`; HTTP handlers call `start`/`stop`. All
//! session access goes through one mutex, so a writer can never be closed
//! while a frame write is in flight.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::config::{RecordingConfig, RecordingStats};
use super::recorder::Recorder;
use crate::errors::CameraError;
use crate::types::CameraFrame;

pub struct RecordingController {
    active: AtomicBool,
    session: Mutex<Option<Recorder>>,
    config: RecordingConfig,
    recordings_dir: PathBuf,
}

impl RecordingController {
    pub fn new(recordings_dir: impl Into<PathBuf>, config: RecordingConfig) -> Self {
        Self {
            active: AtomicBool::new(false),
            session: Mutex::new(None),
            config,
            recordings_dir: recordings_dir.into(),
        }
    }

    /// Begin a recording session.
    ///
    /// Starting while a session is already active is a no-op; the running
    /// session keeps its writer. Returns the output path of the session
    /// that is active after the call.
    pub fn start(&self) -> Result<String, CameraError> {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(ref recorder) = *session {
            log::debug!("Recording already active, ignoring start");
            return Ok(recorder.output_path().to_string());
        }

        std::fs::create_dir_all(&self.recordings_dir).map_err(|e| {
            CameraError::IoError(format!("Failed to create recordings directory: {}", e))
        })?;

        let filename = format!("{}.mp4", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let path = self.recordings_dir.join(filename);

        let recorder = Recorder::new(&path, self.config.clone())?;
        let path_str = recorder.output_path().to_string();
        *session = Some(recorder);
        self.active.store(true, Ordering::Release);

        log::info!("Recording started: {}", path_str);
        Ok(path_str)
    }

    /// End the active recording session, if any.
    ///
    /// The active flag is cleared before the writer is taken and closed,
    /// so the producer stops teeing frames first. Stop without a session
    /// is a no-op returning `None`.
    pub fn stop(&self) -> Result<Option<RecordingStats>, CameraError> {
        self.active.store(false, Ordering::Release);

        let recorder = {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            session.take()
        };

        match recorder {
            Some(recorder) => {
                let stats = recorder.finish()?;
                log::info!(
                    "Recording stopped: {} frames, {:.2}s, {} bytes -> {}",
                    stats.video_frames,
                    stats.duration_secs,
                    stats.bytes_written,
                    stats.output_path
                );
                Ok(Some(stats))
            }
            None => {
                log::debug!("Stop requested with no active recording");
                Ok(None)
            }
        }
    }

    /// Whether a session is currently active.
    pub fn is_recording(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Tee one captured frame into the active session, if any.
    ///
    /// Called from the producer loop on every capture. Write failures are
    /// logged and the offending session is aborted rather than crashing
    /// the producer.
    pub fn write_frame(&self, frame: &CameraFrame) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref mut recorder) = *session {
            if let Err(e) = recorder.write_frame(frame) {
                log::error!("Dropping recording session after write failure: {}", e);
                self.active.store(false, Ordering::Release);
                *session = None;
            }
        }
    }
}
