//! Single-slot holder for the most recently captured frame.
//!
//! One producer overwrites the slot continuously; any number of readers
//! copy the current value out. There is no queue: a slow reader observes
//! dropped frames, never a backlog, and the producer never waits.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::types::CameraFrame;

struct CellInner {
    frame: Option<Arc<CameraFrame>>,
    seq: u64,
}

/// Lock-protected latest-frame cell with condvar wakeup for readers.
///
/// Every read observes either the empty state or a fully formed frame from
/// a completed `publish` call; the lock is held only for the pointer swap,
/// never across capture or encode work.
pub struct SharedFrameCell {
    inner: Mutex<CellInner>,
    cond: Condvar,
}

impl SharedFrameCell {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(CellInner {
                frame: None,
                seq: 0,
            }),
            cond: Condvar::new(),
        }
    }

    /// Overwrite the held frame and wake all waiting readers.
    ///
    /// Returns the sequence number assigned to this frame.
    pub fn publish(&self, frame: CameraFrame) -> u64 {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.frame = Some(Arc::new(frame));
        inner.seq += 1;
        let seq = inner.seq;
        drop(inner);
        self.cond.notify_all();
        seq
    }

    /// Non-blocking read of the current frame, if any has arrived yet.
    pub fn latest(&self) -> Option<(Arc<CameraFrame>, u64)> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.frame.as_ref().map(|f| (Arc::clone(f), inner.seq))
    }

    /// Block until a frame newer than `last_seen` is published, or the
    /// timeout elapses.
    ///
    /// Returns `None` only on timeout with no newer frame available, so
    /// callers retry instead of spinning on an empty cell.
    pub fn next_after(
        &self,
        last_seen: u64,
        timeout: Duration,
    ) -> Option<(Arc<CameraFrame>, u64)> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        while inner.seq <= last_seen {
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, result) = self
                .cond
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
            if result.timed_out() && inner.seq <= last_seen {
                return None;
            }
        }

        inner.frame.as_ref().map(|f| (Arc::clone(f), inner.seq))
    }

    /// Sequence number of the most recent publish (0 before the first).
    pub fn current_seq(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .seq
    }
}

impl Default for SharedFrameCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn test_frame(fill: u8) -> CameraFrame {
        CameraFrame::new(vec![fill; 4 * 4 * 3], 4, 4, "test".to_string())
    }

    #[test]
    fn test_empty_cell_returns_none() {
        let cell = SharedFrameCell::new();
        assert!(cell.latest().is_none());
        assert_eq!(cell.current_seq(), 0);
    }

    #[test]
    fn test_publish_overwrites() {
        let cell = SharedFrameCell::new();
        cell.publish(test_frame(1));
        cell.publish(test_frame(2));

        let (frame, seq) = cell.latest().expect("Cell should hold a frame");
        assert_eq!(seq, 2);
        assert_eq!(frame.data[0], 2, "Reader should observe the newest frame");
    }

    #[test]
    fn test_next_after_times_out_when_empty() {
        let cell = SharedFrameCell::new();
        let result = cell.next_after(0, Duration::from_millis(20));
        assert!(result.is_none());
    }

    #[test]
    fn test_next_after_wakes_on_publish() {
        let cell = Arc::new(SharedFrameCell::new());

        let writer = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                cell.publish(test_frame(7));
            })
        };

        let result = cell.next_after(0, Duration::from_secs(2));
        writer.join().unwrap();

        let (frame, seq) = result.expect("Reader should be woken by publish");
        assert_eq!(seq, 1);
        assert_eq!(frame.data[0], 7);
    }

    #[test]
    fn test_next_after_skips_already_seen() {
        let cell = SharedFrameCell::new();
        cell.publish(test_frame(1));
        // Seen seq 1 already; nothing newer arrives
        assert!(cell.next_after(1, Duration::from_millis(20)).is_none());
    }
}
