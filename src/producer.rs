//! The frame producer: one background thread that runs for the process
//! lifetime, capturing frames and fanning them out to the shared frame
//! cell and the recording controller.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::capture::FrameSource;
use crate::frame_cell::SharedFrameCell;
use crate::recording::RecordingController;

/// Delay before retrying after a failed capture.
const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Spawn the capture loop on a dedicated thread.
///
/// Capture failures are treated as transient: logged and retried after a
/// short delay, so a glitching device does not take the server down.
pub fn spawn_capture_loop(
    mut source: Box<dyn FrameSource>,
    cell: Arc<SharedFrameCell>,
    controller: Arc<RecordingController>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("camview-capture".to_string())
        .spawn(move || loop {
            match source.capture_frame() {
                Ok(frame) => {
                    controller.write_frame(&frame);
                    cell.publish(frame);
                }
                Err(e) => {
                    log::warn!("Capture failed, retrying: {}", e);
                    thread::sleep(CAPTURE_RETRY_DELAY);
                }
            }
        })
        .expect("Failed to spawn capture thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SyntheticSource;
    use crate::recording::RecordingConfig;
    use crate::types::CameraFormat;

    #[test]
    fn test_capture_loop_fills_cell() {
        let cell = Arc::new(SharedFrameCell::new());
        let controller = Arc::new(RecordingController::new(
            std::env::temp_dir().join("camview_producer_test"),
            RecordingConfig::new(64, 48, 200.0),
        ));

        let source = Box::new(SyntheticSource::new(CameraFormat::new(64, 48, 200.0)));
        let _handle = spawn_capture_loop(source, Arc::clone(&cell), controller);

        let result = cell.next_after(0, Duration::from_secs(2));
        let (frame, seq) = result.expect("Producer should publish a frame");
        assert!(seq >= 1);
        assert_eq!(frame.width, 64);
        assert!(frame.is_well_formed());
    }
}
