//! Real-time video playback pacing engine.
//!
//! A background thread pulls frames from a decode source at the source's own
//! pace, figures out which frame ought to be visible right now against a
//! free-running wall clock, rescales and channel-converts it, and publishes it
//! into a shared frame slot. A host-driven render pass copies the latest
//! snapshot into a canvas and never waits on the producer.
//!
//! The crate is split into small modules:
//!
//! - `schedule`: pure due-index / due-instant arithmetic over the clock origin
//! - `source`: the decode source contract plus a synthetic test source
//! - `frame`: the published frame type and the rescale + color transform
//! - `slot`: the single-cell shared frame slot (`publish` / `snapshot`)
//! - `render`: the canvas capability and the pixel blit
//! - `stats`: published/dropped/skipped counters and periodic stat logging
//! - `config`: engine tuning knobs (resize filter, stats cadence)
//! - `player`: the lifecycle facade that owns the playback thread
//!
//! # Pacing model
//!
//! Decode and transform cost per frame is variable and can exceed the frame
//! interval. The loop therefore never counts iterations; every iteration it
//! recomputes which frame index is due from elapsed wall-clock time, publishes
//! it, and sleeps until that index's successor becomes due. After any stall
//! the next computed index simply lands further ahead — playback self-corrects
//! instead of drifting, at the cost of appearing to skip frames (latest wins,
//! freshness over completeness).

pub mod config;
pub mod frame;
pub mod player;
pub mod render;
pub mod schedule;
pub mod slot;
pub mod source;
pub mod stats;

pub use common::{PlaybackState, PlayerError, PlayerStatus, Resolution};
pub use config::{PlayerConfig, ResizeFilter};
pub use frame::Frame;
pub use player::VideoPlayer;
pub use render::{BufferCanvas, Canvas};
pub use schedule::FrameSchedule;
pub use slot::FrameSlot;
pub use source::{DecodeSource, SourceFrame, SourceOpener, SyntheticSource};
pub use stats::PlaybackStats;
