//! Concurrency tests for the shared frame cell.
//!
//! The core contract: a reader never observes a torn frame. Every `get`
//! returns either the empty state or a value some completed `publish`
//! stored, in full.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use camview::frame_cell::SharedFrameCell;
use camview::types::CameraFrame;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

/// Frame whose every byte equals its sequence-derived fill value, so a
/// mixture of two frames is detectable as a non-uniform buffer.
fn uniform_frame(fill: u8) -> CameraFrame {
    CameraFrame::new(
        vec![fill; (WIDTH * HEIGHT * 3) as usize],
        WIDTH,
        HEIGHT,
        "test".to_string(),
    )
}

#[test]
fn readers_never_observe_torn_frames() {
    let cell = Arc::new(SharedFrameCell::new());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let cell = Arc::clone(&cell);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut fill = 0u8;
            while !stop.load(Ordering::Relaxed) {
                cell.publish(uniform_frame(fill));
                fill = fill.wrapping_add(1);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut observed = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    if let Some((frame, _seq)) = cell.latest() {
                        let first = frame.data[0];
                        assert!(
                            frame.data.iter().all(|&b| b == first),
                            "Observed a torn frame: mixed fill values"
                        );
                        assert!(frame.is_well_formed());
                        observed += 1;
                    }
                }
                observed
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(300));
    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();

    for reader in readers {
        let observed = reader.join().unwrap();
        assert!(observed > 0, "Each reader should have seen frames");
    }
}

#[test]
fn sequence_numbers_are_monotonic_across_threads() {
    let cell = Arc::new(SharedFrameCell::new());

    let writer = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || {
            for fill in 0..100u8 {
                cell.publish(uniform_frame(fill));
            }
        })
    };

    let mut last_seen = 0u64;
    while last_seen < 100 {
        if let Some((_frame, seq)) = cell.next_after(last_seen, Duration::from_secs(2)) {
            assert!(seq > last_seen, "Sequence must strictly increase");
            last_seen = seq;
        } else {
            // Timed out: writer must already be done
            break;
        }
    }

    writer.join().unwrap();
    assert_eq!(cell.current_seq(), 100);
}
