//! The shared frame slot.
//!
//! A single mutable cell holding the most recently published frame. One
//! writer (the playback loop) replaces the contents; any number of readers
//! take snapshots. Frames are stored behind an `Arc`, so the mutex is held
//! only for a pointer swap or clone — a reader can never observe a frame
//! mid-write and never blocks for longer than that swap. No queue is kept:
//! only the latest publication is ever visible.

use crate::frame::Frame;
use std::sync::{Arc, Mutex};

/// Handle to the shared slot. Clones refer to the same cell.
#[derive(Clone, Default)]
pub struct FrameSlot {
    current: Arc<Mutex<Option<Arc<Frame>>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot's contents with a newly transformed frame.
    pub fn publish(&self, frame: Frame) {
        if let Ok(mut current) = self.current.lock() {
            *current = Some(Arc::new(frame));
        }
    }

    /// The most recently published frame, or `None` before the first
    /// publication. The returned handle stays valid however many frames are
    /// published after it.
    pub fn snapshot(&self) -> Option<Arc<Frame>> {
        self.current.lock().ok()?.clone()
    }

    pub fn has_frame(&self) -> bool {
        self.current.lock().map(|c| c.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResizeFilter;
    use crate::source::SourceFrame;
    use common::Resolution;

    fn test_frame(shade: u8) -> Frame {
        let raw = SourceFrame::new(2, 2, vec![shade; 12]);
        Frame::from_source(raw, Resolution::new(2, 2), ResizeFilter::Nearest).unwrap()
    }

    #[test]
    fn test_empty_slot_snapshot_is_none() {
        let slot = FrameSlot::new();
        assert!(slot.snapshot().is_none());
        assert!(!slot.has_frame());
    }

    #[test]
    fn test_publish_then_snapshot() {
        let slot = FrameSlot::new();
        slot.publish(test_frame(7));

        let frame = slot.snapshot().unwrap();
        assert_eq!(frame.pixel(0, 0), (7, 7, 7));
        assert!(slot.has_frame());
    }

    #[test]
    fn test_latest_publication_wins() {
        let slot = FrameSlot::new();
        slot.publish(test_frame(1));
        slot.publish(test_frame(2));

        assert_eq!(slot.snapshot().unwrap().pixel(0, 0), (2, 2, 2));
    }

    #[test]
    fn test_old_snapshot_survives_republication() {
        let slot = FrameSlot::new();
        slot.publish(test_frame(1));

        let old = slot.snapshot().unwrap();
        slot.publish(test_frame(2));

        // The reader's handle still sees the frame it took.
        assert_eq!(old.pixel(0, 0), (1, 1, 1));
        assert_eq!(slot.snapshot().unwrap().pixel(0, 0), (2, 2, 2));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let slot = FrameSlot::new();
        let reader = slot.clone();

        slot.publish(test_frame(9));
        assert_eq!(reader.snapshot().unwrap().pixel(1, 1), (9, 9, 9));
    }
}
