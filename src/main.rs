use std::sync::Arc;

use camview::capture::open_source;
use camview::config::CamviewConfig;
use camview::frame_cell::SharedFrameCell;
use camview::producer::spawn_capture_loop;
use camview::recording::{RecordingConfig, RecordingController};
use camview::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    camview::init_logging();

    let config = CamviewConfig::load_or_default();
    config.validate().map_err(|e| format!("Invalid configuration: {}", e))?;

    let source = open_source(&config.camera)?;
    let format = source.format();

    let cell = Arc::new(SharedFrameCell::new());
    let controller = Arc::new(RecordingController::new(
        &config.storage.recordings_dir,
        RecordingConfig::new(format.width, format.height, format.fps as f64),
    ));

    let _capture = spawn_capture_loop(source, Arc::clone(&cell), Arc::clone(&controller));

    let state = AppState {
        cell,
        controller,
        recordings_dir: config.storage.recordings_dir.clone().into(),
        jpeg_quality: config.storage.jpeg_quality,
    };

    server::run(&config, state).await?;
    Ok(())
}
