//! HTTP surface: viewer page, MJPEG feed, recording controls, and the
//! recordings catalog with byte-range playback.

mod mjpeg;
mod pages;
mod recordings;

pub use mjpeg::encode_jpeg;
pub use recordings::{list_recordings, resolve_range, resolve_recording_path, RangeSpec};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::config::CamviewConfig;
use crate::errors::CameraError;
use crate::frame_cell::SharedFrameCell;
use crate::recording::RecordingController;

/// Shared application state handed to every request handler.
///
/// Owns the frame cell and the recording controller; constructed once at
/// startup and cloned per handler (all members are shared references).
#[derive(Clone)]
pub struct AppState {
    pub cell: Arc<SharedFrameCell>,
    pub controller: Arc<RecordingController>,
    pub recordings_dir: PathBuf,
    pub jpeg_quality: u8,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/video_feed", get(video_feed))
        .route("/start_recording", get(start_recording))
        .route("/stop_recording", get(stop_recording))
        .route("/recordings", get(recordings_index))
        .route("/recordings/{filename}", get(serve_recording))
        .with_state(state)
}

/// Bind and serve until the process exits.
pub async fn run(config: &CamviewConfig, state: AppState) -> Result<(), CameraError> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| CameraError::ConfigError(format!("Invalid bind address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CameraError::IoError(format!("Failed to bind {}: {}", addr, e)))?;

    log::info!("Serving on http://{}", addr);
    log::info!("Live feed at http://{}/video_feed", addr);

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| CameraError::StreamError(format!("Server error: {}", e)))
}

async fn index() -> Html<String> {
    Html(pages::index_page())
}

async fn video_feed(State(state): State<AppState>) -> Response {
    mjpeg::mjpeg_response(Arc::clone(&state.cell), state.jpeg_quality)
}

async fn start_recording(State(state): State<AppState>) -> Response {
    match state.controller.start() {
        Ok(_) => "Recording started".into_response(),
        Err(e) => {
            log::error!("Failed to start recording: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to start recording: {}", e),
            )
                .into_response()
        }
    }
}

async fn stop_recording(State(state): State<AppState>) -> Response {
    match state.controller.stop() {
        Ok(_) => "Recording stopped".into_response(),
        Err(e) => {
            log::error!("Failed to stop recording: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to stop recording: {}", e),
            )
                .into_response()
        }
    }
}

async fn recordings_index(State(state): State<AppState>) -> Response {
    match recordings::list_recordings(&state.recordings_dir) {
        Ok(names) => Html(pages::recordings_page(&names)).into_response(),
        Err(e) => {
            log::error!("Failed to list recordings: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list recordings".to_string(),
            )
                .into_response()
        }
    }
}

async fn serve_recording(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Response {
    recordings::serve_recording(&state.recordings_dir, &filename, &headers).await
}
