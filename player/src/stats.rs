//! Playback statistics tracking.
//!
//! Counts what the pacing loop actually did with the decode stream:
//!
//! - published: frames that made it into the shared slot
//! - dropped: due indices that were never served because decode + transform
//!   ran slower than real time (gaps between consecutively served indices)
//! - skipped: frames lost to non-fatal transform failures
//!
//! Counters are atomic so the host can read them through `status()` while the
//! playback thread is writing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Tracks one session's playback statistics.
pub struct PlaybackStats {
    frames_published: AtomicU64,
    frames_dropped: AtomicU64,
    frames_skipped: AtomicU64,
    last_served_index: AtomicU64,
    last_stats_log: Mutex<Instant>,
}

impl PlaybackStats {
    pub fn new() -> Self {
        Self {
            frames_published: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            frames_skipped: AtomicU64::new(0),
            last_served_index: AtomicU64::new(0),
            last_stats_log: Mutex::new(Instant::now()),
        }
    }

    /// Record a successful publication of the frame at `index`.
    pub fn record_published(&self, index: u64) {
        self.frames_published.fetch_add(1, Ordering::Relaxed);
        self.record_served(index);
    }

    /// Record a frame lost to a non-fatal transform failure at `index`.
    pub fn record_skipped(&self, index: u64) {
        self.frames_skipped.fetch_add(1, Ordering::Relaxed);
        self.record_served(index);
    }

    fn record_served(&self, index: u64) {
        let last = self.last_served_index.swap(index, Ordering::Relaxed);
        if last != 0 && index > last + 1 {
            self.frames_dropped.fetch_add(index - last - 1, Ordering::Relaxed);
        }
    }

    pub fn frames_published(&self) -> u64 {
        self.frames_published.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped.load(Ordering::Relaxed)
    }

    /// Current drop rate as a percentage of all due frames seen.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.frames_dropped();
        let total = self.frames_published() + dropped;
        if total == 0 {
            0.0
        } else {
            (dropped as f64 / total as f64) * 100.0
        }
    }

    /// Log a stats summary if `interval` has elapsed since the last one.
    /// An interval of zero disables stats logging.
    pub fn maybe_log_stats(&self, interval: Duration, frame_rate: f64) {
        if interval.is_zero() {
            return;
        }

        let Ok(mut last_log) = self.last_stats_log.lock() else {
            return;
        };
        if last_log.elapsed() < interval {
            return;
        }

        log::info!(
            "Playback stats ({:.2} fps): {} published, {} dropped, {} skipped ({:.1}% drop rate)",
            frame_rate,
            self.frames_published(),
            self.frames_dropped(),
            self.frames_skipped(),
            self.drop_rate()
        );

        *last_log = Instant::now();
    }

    /// Reset counters at the start of a new session.
    pub fn reset(&self) {
        self.frames_published.store(0, Ordering::Relaxed);
        self.frames_dropped.store(0, Ordering::Relaxed);
        self.frames_skipped.store(0, Ordering::Relaxed);
        self.last_served_index.store(0, Ordering::Relaxed);
        if let Ok(mut last_log) = self.last_stats_log.lock() {
            *last_log = Instant::now();
        }
    }
}

impl Default for PlaybackStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publication_counting() {
        let stats = PlaybackStats::new();
        stats.record_published(1);
        stats.record_published(2);
        stats.record_published(3);

        assert_eq!(stats.frames_published(), 3);
        assert_eq!(stats.frames_dropped(), 0);
    }

    #[test]
    fn test_index_gaps_count_as_drops() {
        let stats = PlaybackStats::new();
        stats.record_published(1);
        // Decode stalled; indices 2..4 were never served.
        stats.record_published(5);

        assert_eq!(stats.frames_published(), 2);
        assert_eq!(stats.frames_dropped(), 3);
    }

    #[test]
    fn test_first_served_index_never_counts_drops() {
        let stats = PlaybackStats::new();
        // A slow first decode can land on index 3; there was no prior
        // publication for anything to be dropped relative to.
        stats.record_published(3);
        assert_eq!(stats.frames_dropped(), 0);

        stats.record_published(4);
        assert_eq!(stats.frames_dropped(), 0);
    }

    #[test]
    fn test_skips_tracked_separately() {
        let stats = PlaybackStats::new();
        stats.record_published(1);
        stats.record_skipped(2);
        stats.record_published(3);

        assert_eq!(stats.frames_published(), 2);
        assert_eq!(stats.frames_skipped(), 1);
        assert_eq!(stats.frames_dropped(), 0);
    }

    #[test]
    fn test_drop_rate() {
        let stats = PlaybackStats::new();
        assert_eq!(stats.drop_rate(), 0.0);

        stats.record_published(1);
        stats.record_published(3);
        // 1 dropped of 3 total.
        assert!((stats.drop_rate() - 33.33).abs() < 0.1);
    }

    #[test]
    fn test_reset() {
        let stats = PlaybackStats::new();
        stats.record_published(1);
        stats.record_skipped(4);
        stats.reset();

        assert_eq!(stats.frames_published(), 0);
        assert_eq!(stats.frames_dropped(), 0);
        assert_eq!(stats.frames_skipped(), 0);

        // A fresh session starts gap tracking over.
        stats.record_published(1);
        assert_eq!(stats.frames_dropped(), 0);
    }
}
