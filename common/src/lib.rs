//! Common types shared between the playback engine and its host.
//!
//! This crate defines the data structures that cross the host boundary:
//! activation errors, the lifecycle state, and the status snapshot a host can
//! query while playback runs. Everything is serializable so a host can forward
//! status over whatever IPC or web surface it already has.
//!
//! # Examples
//!
//! ```
//! use common::{PlaybackState, PlayerStatus, Resolution};
//!
//! let status = PlayerStatus {
//!     state: PlaybackState::Active,
//!     frame_rate: 25.0,
//!     resolution: Resolution::new(64, 32),
//!     frames_published: 120,
//!     frames_dropped: 3,
//!     frames_skipped: 0,
//! };
//!
//! let json = serde_json::to_string(&status).unwrap();
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to the host at activation time.
///
/// Steady-state playback failures are absorbed by the engine (a frame is
/// skipped, the last frame is held); only activation can fail synchronously.
/// All errors are serializable for transmission across a host boundary.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerError {
    #[error("failed to open decode source: {0}")]
    SourceOpen(String),

    #[error("decode source reported unusable frame rate: {0}")]
    InvalidFrameRate(f64),

    #[error("player is already active")]
    AlreadyActive,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PlayerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Lifecycle state of a playback session.
///
/// The lifecycle has exactly two states; the playback thread stopping on its
/// own (end of stream) does not change it. Only `deactivate` moves a session
/// back to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Inactive,
    Active,
}

/// A device resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this resolution.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when either dimension is zero; such a resolution cannot be
    /// rendered to and causes the transform step to skip the frame.
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Snapshot of a playback session's state, queryable by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub state: PlaybackState,
    /// Native frame rate reported by the decode source (1.0 before the first
    /// activation).
    pub frame_rate: f64,
    /// Device resolution frames are currently rescaled to.
    pub resolution: Resolution,
    pub frames_published: u64,
    pub frames_dropped: u64,
    pub frames_skipped: u64,
}
