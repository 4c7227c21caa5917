//! Recordings catalog and byte-range playback.
//!
//! Finished MP4 files are listed newest-first and served with `Range`
//! support so browser `<video>` elements can seek. Requested paths are
//! canonicalized and confined to the recordings root; anything resolving
//! outside it is a 404, same as a missing file.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::errors::CameraError;

const RECORDING_EXT: &str = "mp4";
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// List recording filenames, newest first.
///
/// Timestamp-based names (`YYYYMMDD-HHMMSS.mp4`) sort newest-first under
/// plain descending lexicographic order. A missing directory is an empty
/// catalog, not an error.
pub fn list_recordings(dir: &Path) -> Result<Vec<String>, CameraError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(CameraError::IoError(format!(
                "Failed to read recordings directory: {}",
                e
            )))
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|ext| ext == RECORDING_EXT)
                .unwrap_or(false)
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();

    names.sort_by(|a, b| b.cmp(a));
    Ok(names)
}

/// How a `Range` header resolves against a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// No header, or one we cannot parse: serve the whole file.
    Full,
    /// Serve bytes `start..=end` (both in bounds).
    Partial { start: u64, end: u64 },
    /// Start is past the end of the file.
    Unsatisfiable,
}

/// Resolve an optional `Range` header value against the file size.
///
/// Only `bytes=<start>-[<end>]` is understood. Malformed headers degrade
/// to a full response, matching the probing behavior of browser video
/// elements; an omitted end means end-of-file, and an end past the file
/// is clamped.
pub fn resolve_range(header: Option<&str>, size: u64) -> RangeSpec {
    let header = match header {
        Some(h) => h,
        None => return RangeSpec::Full,
    };

    let spec = match header.trim().strip_prefix("bytes=") {
        Some(s) => s,
        None => return RangeSpec::Full,
    };

    let (start_str, end_str) = match spec.split_once('-') {
        Some(parts) => parts,
        None => return RangeSpec::Full,
    };

    let start: u64 = match start_str.trim().parse() {
        Ok(n) => n,
        Err(_) => return RangeSpec::Full,
    };

    if size == 0 || start >= size {
        return RangeSpec::Unsatisfiable;
    }

    let end = match end_str.trim() {
        "" => size - 1,
        s => match s.parse::<u64>() {
            Ok(n) => n.min(size - 1),
            Err(_) => return RangeSpec::Full,
        },
    };

    if end < start {
        return RangeSpec::Full;
    }

    RangeSpec::Partial { start, end }
}

/// Resolve a requested filename inside the recordings root.
///
/// Returns `None` when the file does not exist or the canonicalized path
/// escapes the root (e.g. via `..` components).
pub fn resolve_recording_path(root: &Path, filename: &str) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let candidate = root.join(filename).canonicalize().ok()?;

    if !candidate.starts_with(&root) || !candidate.is_file() {
        return None;
    }
    Some(candidate)
}

/// Serve a recording, honoring byte-range requests.
pub async fn serve_file(path: &Path, range_header: Option<&str>) -> Response {
    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(_) => return status_response(StatusCode::NOT_FOUND),
    };

    let size = match file.metadata().await {
        Ok(meta) => meta.len(),
        Err(_) => return status_response(StatusCode::INTERNAL_SERVER_ERROR),
    };

    // Bodies stream off the file handle in chunks; the full file is never
    // buffered in memory.
    match resolve_range(range_header, size) {
        RangeSpec::Full => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_LENGTH, size)
            .body(Body::from_stream(ReaderStream::new(file)))
            .unwrap_or_else(|_| status_response(StatusCode::INTERNAL_SERVER_ERROR)),
        RangeSpec::Partial { start, end } => {
            let len = end - start + 1;
            if file.seek(SeekFrom::Start(start)).await.is_err() {
                return status_response(StatusCode::INTERNAL_SERVER_ERROR);
            }
            let limited = file.take(len);
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, VIDEO_CONTENT_TYPE)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, len)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, size),
                )
                .body(Body::from_stream(ReaderStream::new(limited)))
                .unwrap_or_else(|_| status_response(StatusCode::INTERNAL_SERVER_ERROR))
        }
        RangeSpec::Unsatisfiable => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", size))
            .body(Body::empty())
            .unwrap_or_else(|_| status_response(StatusCode::INTERNAL_SERVER_ERROR)),
    }
}

/// Handler body shared by the route: confine the path, then serve.
pub async fn serve_recording(
    root: &Path,
    filename: &str,
    headers: &HeaderMap,
) -> Response {
    let path = match resolve_recording_path(root, filename) {
        Some(path) => path,
        None => {
            log::debug!("Recording not found or outside root: {}", filename);
            return status_response(StatusCode::NOT_FOUND);
        }
    };

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    serve_file(&path, range_header).await
}

fn status_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_range_no_header() {
        assert_eq!(resolve_range(None, 1000), RangeSpec::Full);
    }

    #[test]
    fn test_resolve_range_bounded() {
        assert_eq!(
            resolve_range(Some("bytes=0-99"), 1000),
            RangeSpec::Partial { start: 0, end: 99 }
        );
    }

    #[test]
    fn test_resolve_range_open_ended() {
        assert_eq!(
            resolve_range(Some("bytes=900-"), 1000),
            RangeSpec::Partial {
                start: 900,
                end: 999
            }
        );
    }

    #[test]
    fn test_resolve_range_end_clamped_to_file() {
        assert_eq!(
            resolve_range(Some("bytes=10-5000"), 1000),
            RangeSpec::Partial {
                start: 10,
                end: 999
            }
        );
    }

    #[test]
    fn test_resolve_range_malformed_degrades_to_full() {
        assert_eq!(resolve_range(Some("bytes=abc-def"), 1000), RangeSpec::Full);
        assert_eq!(resolve_range(Some("frames=0-10"), 1000), RangeSpec::Full);
        assert_eq!(resolve_range(Some("bytes=50-10"), 1000), RangeSpec::Full);
        assert_eq!(resolve_range(Some("bytes=nonsense"), 1000), RangeSpec::Full);
    }

    #[test]
    fn test_resolve_range_past_eof_unsatisfiable() {
        assert_eq!(
            resolve_range(Some("bytes=1000-"), 1000),
            RangeSpec::Unsatisfiable
        );
        assert_eq!(resolve_range(Some("bytes=0-"), 0), RangeSpec::Unsatisfiable);
    }

    #[test]
    fn test_list_recordings_missing_dir_is_empty() {
        let names =
            list_recordings(Path::new("/definitely/not/a/real/dir")).expect("Should not error");
        assert!(names.is_empty());
    }

    #[test]
    fn test_list_recordings_sorted_descending() {
        let dir = std::env::temp_dir().join("camview_list_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("20240101-000000.mp4"), b"a").unwrap();
        std::fs::write(dir.join("20240102-000000.mp4"), b"b").unwrap();
        std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

        let names = list_recordings(&dir).expect("Listing should succeed");
        assert_eq!(
            names,
            vec![
                "20240102-000000.mp4".to_string(),
                "20240101-000000.mp4".to_string()
            ]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = std::env::temp_dir().join("camview_traversal_test");
        std::fs::create_dir_all(&dir).unwrap();

        assert!(resolve_recording_path(&dir, "../../etc/passwd").is_none());
        assert!(resolve_recording_path(&dir, "/etc/passwd").is_none());
        assert!(resolve_recording_path(&dir, "missing.mp4").is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_path_inside_root_resolves() {
        let dir = std::env::temp_dir().join("camview_resolve_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("clip.mp4"), b"data").unwrap();

        let resolved = resolve_recording_path(&dir, "clip.mp4");
        assert!(resolved.is_some());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
