//! HTML pages for the viewer and the recordings catalog.

/// Live viewer page: the MJPEG feed plus recording controls.
pub fn index_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
  <title>camview</title>
  <style>
    body { font-family: sans-serif; background: #111; color: #eee; text-align: center; }
    img { max-width: 100%; border: 1px solid #444; margin-top: 1em; }
    button { margin: 0.5em; padding: 0.5em 1.5em; font-size: 1em; }
    a { color: #8cf; }
  </style>
</head>
<body>
  <h1>Live Camera</h1>
  <img src="/video_feed" alt="live feed">
  <div>
    <button onclick="fetch('/start_recording').then(r => r.text()).then(alert)">Start recording</button>
    <button onclick="fetch('/stop_recording').then(r => r.text()).then(alert)">Stop recording</button>
  </div>
  <p><a href="/recordings">Past recordings</a></p>
</body>
</html>"#
        .to_string()
}

/// Recordings catalog page: playable links, newest first.
pub fn recordings_page(names: &[String]) -> String {
    let mut items = String::new();
    if names.is_empty() {
        items.push_str("    <p>No recordings yet.</p>\n");
    } else {
        items.push_str("    <ul>\n");
        for name in names {
            items.push_str(&format!(
                "      <li><a href=\"/recordings/{name}\">{name}</a></li>\n"
            ));
        }
        items.push_str("    </ul>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>camview - recordings</title>
  <style>
    body {{ font-family: sans-serif; background: #111; color: #eee; }}
    a {{ color: #8cf; }}
  </style>
</head>
<body>
  <h1>Recordings</h1>
{items}  <p><a href="/">Back to live view</a></p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_page_links_feed() {
        let html = index_page();
        assert!(html.contains("/video_feed"));
        assert!(html.contains("/start_recording"));
        assert!(html.contains("/stop_recording"));
    }

    #[test]
    fn test_recordings_page_lists_files() {
        let html = recordings_page(&["20240102-000000.mp4".to_string()]);
        assert!(html.contains("/recordings/20240102-000000.mp4"));
    }

    #[test]
    fn test_recordings_page_empty_state() {
        let html = recordings_page(&[]);
        assert!(html.contains("No recordings yet"));
    }
}
