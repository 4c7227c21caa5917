//! MJPEG live streaming over `multipart/x-mixed-replace`.
//!
//! Each connected viewer gets its own lazy stream that pulls the latest
//! frame from the shared cell, JPEG-encodes it outside the lock, and
//! emits it as a boundary-delimited part. The stream is infinite; it ends
//! only when the client disconnects and the body is dropped.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::stream;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::frame_cell::SharedFrameCell;
use crate::types::CameraFrame;

/// Part boundary. Fixed string expected by the viewer page.
const MJPEG_BOUNDARY: &str = "frame";

/// How long a reader waits for a new frame before re-checking. Keeps the
/// blocking wait bounded so a stalled producer cannot pin worker threads.
const FRAME_WAIT: Duration = Duration::from_secs(1);

/// JPEG-encode a frame for streaming.
///
/// Returns `None` on encode failure; the caller skips the frame and moves
/// on to the next one rather than tearing down the connection.
pub fn encode_jpeg(frame: &CameraFrame, quality: u8) -> Option<Bytes> {
    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    encoder
        .write_image(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .ok()?;
    Some(Bytes::from(jpeg))
}

/// Frame a JPEG as one multipart chunk.
fn multipart_chunk(jpeg: &[u8]) -> Bytes {
    let head = format!(
        "--{}\r\nContent-Type: image/jpeg\r\n\r\n",
        MJPEG_BOUNDARY
    );
    let mut chunk = Vec::with_capacity(head.len() + jpeg.len() + 2);
    chunk.extend_from_slice(head.as_bytes());
    chunk.extend_from_slice(jpeg);
    chunk.extend_from_slice(b"\r\n");
    Bytes::from(chunk)
}

/// Build the streaming response for one viewer connection.
pub fn mjpeg_response(cell: Arc<SharedFrameCell>, quality: u8) -> Response {
    let frames = stream::unfold(0u64, move |mut last_seen| {
        let cell = Arc::clone(&cell);
        async move {
            loop {
                let waiter = {
                    let cell = Arc::clone(&cell);
                    tokio::task::spawn_blocking(move || cell.next_after(last_seen, FRAME_WAIT))
                };

                match waiter.await {
                    Ok(Some((frame, seq))) => {
                        last_seen = seq;
                        match encode_jpeg(&frame, quality) {
                            Some(jpeg) => {
                                return Some((
                                    Ok::<Bytes, Infallible>(multipart_chunk(&jpeg)),
                                    last_seen,
                                ));
                            }
                            None => {
                                log::warn!("JPEG encode failed, skipping frame {}", seq);
                                continue;
                            }
                        }
                    }
                    // Timed out waiting for a new frame; keep waiting.
                    Ok(None) => continue,
                    Err(e) => {
                        log::error!("Frame wait task failed: {}", e);
                        return None;
                    }
                }
            }
        }
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={}", MJPEG_BOUNDARY),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| {
            Response::new(Body::from("failed to build stream response"))
        })
}
