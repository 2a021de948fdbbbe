//! Due-frame arithmetic over the playback clock.
//!
//! Pure functions of `(origin, interval, now)`. The playback loop never
//! increments a frame counter; it asks the schedule which frame index should
//! be visible at "now" and when that index's successor becomes due. Elapsed
//! time is divided in integer nanoseconds so index and instant round-trip
//! exactly at frame boundaries.

use common::PlayerError;
use std::time::{Duration, Instant};

/// Frame timing for one playback session.
///
/// `origin` is the wall-clock instant recorded when activation began and is
/// the zero point for all elapsed-time computations; `interval` is the
/// reciprocal of the decode source's reported native rate. Both are fixed for
/// the session's lifetime.
#[derive(Debug, Clone, Copy)]
pub struct FrameSchedule {
    origin: Instant,
    interval: Duration,
}

impl FrameSchedule {
    /// Build a schedule from the decode source's reported frame rate.
    ///
    /// Rejects rates that are non-positive, non-finite, or so high that the
    /// frame interval rounds to zero nanoseconds, all of which would poison
    /// the due-index division.
    pub fn new(origin: Instant, frame_rate: f64) -> Result<Self, PlayerError> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(PlayerError::InvalidFrameRate(frame_rate));
        }

        let interval = Duration::from_secs_f64(1.0 / frame_rate);
        if interval.is_zero() {
            return Err(PlayerError::InvalidFrameRate(frame_rate));
        }

        Ok(Self { origin, interval })
    }

    /// Index of the frame that should be visible at `now`.
    ///
    /// Computed as `floor(elapsed / interval) + 1`, so the index is 1 for the
    /// whole first interval and monotonically non-decreasing in `now`. `now`
    /// earlier than the origin clamps to index 1.
    pub fn due_index(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.origin);
        (elapsed.as_nanos() / self.interval.as_nanos()) as u64 + 1
    }

    /// Instant at which frame `index`'s successor becomes due.
    ///
    /// The loop sleeps until this instant after publishing frame `index`; if
    /// it has already passed the sleep is zero.
    pub fn due_instant(&self, index: u64) -> Instant {
        let nanos = self.interval.as_nanos().saturating_mul(u128::from(index));
        self.origin + Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Nominal time between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The session's clock origin.
    pub fn origin(&self) -> Instant {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_25fps() -> (Instant, FrameSchedule) {
        let origin = Instant::now();
        (origin, FrameSchedule::new(origin, 25.0).unwrap())
    }

    #[test]
    fn test_index_is_one_within_first_interval() {
        let (origin, schedule) = schedule_25fps();

        assert_eq!(schedule.due_index(origin), 1);
        assert_eq!(schedule.due_index(origin + Duration::from_millis(1)), 1);
        assert_eq!(schedule.due_index(origin + Duration::from_millis(39)), 1);
    }

    #[test]
    fn test_index_at_100ms_of_25fps_is_three() {
        // 25 fps -> 40ms interval; floor(100 / 40) + 1 = 3.
        let (origin, schedule) = schedule_25fps();
        assert_eq!(schedule.due_index(origin + Duration::from_millis(100)), 3);
    }

    #[test]
    fn test_index_is_monotonic() {
        let (origin, schedule) = schedule_25fps();

        let mut last = 0;
        for ms in 0..500 {
            let index = schedule.due_index(origin + Duration::from_millis(ms));
            assert!(index >= last, "index regressed at {}ms", ms);
            last = index;
        }
    }

    #[test]
    fn test_now_before_origin_clamps_to_one() {
        let origin = Instant::now() + Duration::from_secs(10);
        let schedule = FrameSchedule::new(origin, 25.0).unwrap();
        assert_eq!(schedule.due_index(Instant::now()), 1);
    }

    #[test]
    fn test_due_instant_is_origin_plus_index_intervals() {
        let (origin, schedule) = schedule_25fps();

        assert_eq!(schedule.due_instant(1), origin + Duration::from_millis(40));
        assert_eq!(schedule.due_instant(5), origin + Duration::from_millis(200));
    }

    #[test]
    fn test_due_instant_advances_index_by_exactly_one() {
        // Waking exactly at frame n's deadline must serve frame n + 1.
        let (_, schedule) = schedule_25fps();

        for index in [1, 2, 7, 100, 12345] {
            assert_eq!(schedule.due_index(schedule.due_instant(index)), index + 1);
        }
    }

    #[test]
    fn test_deadline_never_precedes_index_activation() {
        // The deadline for the current index is never more than one interval
        // behind the instant that produced the index.
        let (origin, schedule) = schedule_25fps();

        for ms in [0u64, 13, 40, 99, 100, 385] {
            let now = origin + Duration::from_millis(ms);
            let index = schedule.due_index(now);
            assert!(schedule.due_instant(index) + schedule.interval() > now);
        }
    }

    #[test]
    fn test_rejects_unusable_frame_rates() {
        let origin = Instant::now();

        for rate in [0.0, -25.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                FrameSchedule::new(origin, rate).is_err(),
                "rate {} accepted",
                rate
            );
        }

        // Interval rounds to zero nanoseconds.
        assert!(FrameSchedule::new(origin, 1e12).is_err());
    }

    #[test]
    fn test_interval_from_rate() {
        let (_, schedule) = schedule_25fps();
        assert_eq!(schedule.interval(), Duration::from_millis(40));
    }
}
