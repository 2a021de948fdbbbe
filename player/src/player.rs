//! Playback lifecycle and the pacing loop.
//!
//! `VideoPlayer` is the host-facing facade: `activate` opens the decode
//! source, records the scheduling clock origin and starts the background
//! playback thread; `deactivate` clears the active flag and joins that thread
//! before returning, so no publication can happen after it unblocks. The
//! render path and the resolution setter are safe to call from the host's
//! display thread while the loop runs.
//!
//! Exactly two threads interact per session: the playback thread owned here,
//! and the host thread calling `render`/`set_device_resolution`. They share
//! only the frame slot (mutex, held for a pointer swap) and the device
//! resolution (single atomic word).

use crate::config::{PlayerConfig, ResizeFilter};
use crate::frame::Frame;
use crate::render::{self, Canvas};
use crate::schedule::FrameSchedule;
use crate::slot::FrameSlot;
use crate::source::{DecodeSource, SourceOpener};
use crate::stats::PlaybackStats;
use common::{PlaybackState, PlayerError, PlayerStatus, Resolution};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Width and height packed into one atomic word.
///
/// The host writes it, the playback loop reads it once per iteration; packing
/// keeps the pair consistent without a lock — a resize can land between loop
/// iterations but never between reading the width and reading the height.
struct DeviceResolution(AtomicU64);

impl DeviceResolution {
    fn new(resolution: Resolution) -> Self {
        Self(AtomicU64::new(Self::pack(resolution)))
    }

    fn pack(resolution: Resolution) -> u64 {
        (u64::from(resolution.width) << 32) | u64::from(resolution.height)
    }

    fn store(&self, resolution: Resolution) {
        self.0.store(Self::pack(resolution), Ordering::Release);
    }

    fn load(&self) -> Resolution {
        let packed = self.0.load(Ordering::Acquire);
        Resolution::new((packed >> 32) as u32, packed as u32)
    }
}

/// A paced video playback session.
///
/// Owns one decode source opener, at most one background playback thread, a
/// shared frame slot and the cached native framerate. Dropping an active
/// player deactivates it first, so the slot is never torn down under a live
/// writer.
pub struct VideoPlayer {
    opener: Box<dyn SourceOpener>,
    config: PlayerConfig,
    slot: FrameSlot,
    resolution: Arc<DeviceResolution>,
    active: Arc<AtomicBool>,
    stats: Arc<PlaybackStats>,
    frame_rate: f64,
    worker: Option<JoinHandle<()>>,
}

impl VideoPlayer {
    pub fn new(opener: impl SourceOpener + 'static) -> Self {
        Self::with_config(opener, PlayerConfig::default())
    }

    pub fn with_config(opener: impl SourceOpener + 'static, config: PlayerConfig) -> Self {
        Self {
            opener: Box::new(opener),
            config,
            slot: FrameSlot::new(),
            resolution: Arc::new(DeviceResolution::new(Resolution::new(1, 1))),
            active: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(PlaybackStats::new()),
            frame_rate: 1.0,
            worker: None,
        }
    }

    pub fn name(&self) -> &'static str {
        "Video Player"
    }

    pub fn description(&self) -> &'static str {
        "Plays a video source paced against the wall clock into a shared frame buffer."
    }

    /// Start playback.
    ///
    /// Opens the decode source, validates its reported frame rate, records
    /// the scheduling clock origin and spawns the playback thread. Must only
    /// be called from the `Inactive` state; activating an active player is a
    /// precondition violation and is rejected with
    /// [`PlayerError::AlreadyActive`].
    pub fn activate(&mut self) -> Result<(), PlayerError> {
        if self.worker.is_some() {
            return Err(PlayerError::AlreadyActive);
        }

        let filter = ResizeFilter::from_name(&self.config.resize_filter).ok_or_else(|| {
            PlayerError::InvalidConfig(format!("unknown resize filter: {}", self.config.resize_filter))
        })?;

        let source = self.opener.open()?;
        let frame_rate = source.frame_rate();
        let schedule = FrameSchedule::new(Instant::now(), frame_rate)?;

        log::info!(
            "Starting playback at {:.2} fps ({:?} interval), device resolution {}",
            frame_rate,
            schedule.interval(),
            self.resolution.load()
        );

        self.frame_rate = frame_rate;
        self.stats.reset();
        self.active.store(true, Ordering::Release);

        let worker = Worker {
            schedule,
            filter,
            frame_rate,
            stats_interval: self.config.stats_interval(),
            slot: self.slot.clone(),
            resolution: Arc::clone(&self.resolution),
            active: Arc::clone(&self.active),
            stats: Arc::clone(&self.stats),
        };

        match thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || worker.run(source))
        {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.active.store(false, Ordering::Release);
                Err(e.into())
            }
        }
    }

    /// Stop playback.
    ///
    /// Clears the active flag (observed by the loop at its next iteration
    /// boundary) and joins the playback thread before returning: once this
    /// unblocks, no further frame is published. No-op when there is no live
    /// session — never activated, already deactivated, or the loop already
    /// stopped at end of stream.
    pub fn deactivate(&mut self) {
        self.active.store(false, Ordering::Release);

        if let Some(worker) = self.worker.take() {
            log::debug!("Waiting for playback thread to stop");
            if worker.join().is_err() {
                log::error!("Playback thread panicked");
            }
            log::info!(
                "Playback stopped: {} published, {} dropped, {} skipped",
                self.stats.frames_published(),
                self.stats.frames_dropped(),
                self.stats.frames_skipped()
            );
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Update the resolution frames are rescaled to.
    ///
    /// Takes effect at the playback loop's next iteration; a frame already in
    /// its transform step keeps the resolution it started with.
    pub fn set_device_resolution(&self, width: u32, height: u32) {
        let resolution = Resolution::new(width, height);
        self.resolution.store(resolution);
        log::debug!("Device resolution set to {}", resolution);
    }

    /// Native frame rate reported by the decode source at the last
    /// activation; hosts drive their render cadence from this.
    pub fn reported_framerate(&self) -> f64 {
        self.frame_rate
    }

    /// Copy the most recently published frame into `canvas`.
    ///
    /// No-op while the slot is empty. Safe to call at any lifecycle state and
    /// concurrently with the playback thread.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        if let Some(frame) = self.slot.snapshot() {
            render::blit(&frame, canvas);
        }
    }

    /// The most recently published frame, if any.
    pub fn snapshot(&self) -> Option<Arc<Frame>> {
        self.slot.snapshot()
    }

    /// Current session status for host introspection.
    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            state: if self.is_active() {
                PlaybackState::Active
            } else {
                PlaybackState::Inactive
            },
            frame_rate: self.frame_rate,
            resolution: self.resolution.load(),
            frames_published: self.stats.frames_published(),
            frames_dropped: self.stats.frames_dropped(),
            frames_skipped: self.stats.frames_skipped(),
        }
    }
}

impl Drop for VideoPlayer {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Everything the playback thread needs, moved into it at spawn.
struct Worker {
    schedule: FrameSchedule,
    filter: ResizeFilter,
    frame_rate: f64,
    stats_interval: Duration,
    slot: FrameSlot,
    resolution: Arc<DeviceResolution>,
    active: Arc<AtomicBool>,
    stats: Arc<PlaybackStats>,
}

impl Worker {
    /// The pacing loop.
    ///
    /// Each iteration: pull a frame (may block for arbitrary decode time),
    /// re-check the active flag, compute the due index from the wall clock,
    /// read the device resolution, transform, publish, then sleep until the
    /// next index becomes due. Transform failures skip the frame; source
    /// exhaustion or a source error ends the loop with the last published
    /// frame still held in the slot.
    fn run(self, mut source: Box<dyn DecodeSource>) {
        log::debug!("Playback thread running");

        loop {
            let raw = match source.next_frame() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    log::info!("Decode source exhausted, holding last frame");
                    break;
                }
                Err(e) => {
                    log::warn!("Decode source failed: {:#}, stopping playback", e);
                    break;
                }
            };

            if !self.active.load(Ordering::Acquire) {
                log::debug!("Deactivation observed, discarding in-flight frame");
                break;
            }

            let index = self.schedule.due_index(Instant::now());
            let target = self.resolution.load();

            match Frame::from_source(raw, target, self.filter) {
                Ok(frame) => {
                    log::trace!("Publishing frame {} at {}", index, target);
                    self.slot.publish(frame);
                    self.stats.record_published(index);
                }
                Err(e) => {
                    log::warn!("Skipping frame {}: {:#}", index, e);
                    self.stats.record_skipped(index);
                }
            }

            self.stats.maybe_log_stats(self.stats_interval, self.frame_rate);

            // Suspend until the next index is due; zero if already past it.
            let deadline = self.schedule.due_instant(index);
            let pause = deadline.saturating_duration_since(Instant::now());
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_resolution_roundtrip() {
        let resolution = DeviceResolution::new(Resolution::new(1, 1));
        assert_eq!(resolution.load(), Resolution::new(1, 1));

        resolution.store(Resolution::new(1920, 1080));
        assert_eq!(resolution.load(), Resolution::new(1920, 1080));

        resolution.store(Resolution::new(0, 0));
        assert_eq!(resolution.load(), Resolution::new(0, 0));
    }

    #[test]
    fn test_device_resolution_extremes() {
        let resolution = DeviceResolution::new(Resolution::new(u32::MAX, u32::MAX));
        assert_eq!(resolution.load(), Resolution::new(u32::MAX, u32::MAX));

        resolution.store(Resolution::new(u32::MAX, 1));
        assert_eq!(resolution.load(), Resolution::new(u32::MAX, 1));
    }
}
