//! Decode source contract.
//!
//! Decoding itself lives outside this crate; the engine only consumes the
//! contract: open a source, read its native frame rate once, then pull raw
//! frames in decode order until the stream ends. Raw frames arrive in BGR
//! byte order (the convention of the decode services this engine fronts) and
//! are converted during the transform step.

use anyhow::Result;
use common::PlayerError;

/// A raw decoded frame as delivered by a decode source.
///
/// Pixel data is tightly packed BGR24, row-major, `width * height * 3` bytes.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl SourceFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Byte length a well-formed frame of these dimensions must have.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// An open decode source yielding successive raw frames.
///
/// The pull call may block for arbitrary decode time; the playback loop
/// tolerates that by recomputing the due frame index from the wall clock
/// after every pull.
pub trait DecodeSource: Send {
    /// Native playback rate in frames per second, as reported by the source.
    fn frame_rate(&self) -> f64;

    /// Pull the next frame in decode order. `Ok(None)` means end of stream.
    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;
}

/// Opens a decode source at activation time.
///
/// The resource location (file path, device, URL) is the opener's own
/// business; hosts usually capture it in a closure:
///
/// ```
/// use player::source::{DecodeSource, SourceOpener, SyntheticSource};
/// use common::PlayerError;
///
/// let mut opener = || -> Result<Box<dyn DecodeSource>, PlayerError> {
///     Ok(Box::new(SyntheticSource::new(8, 8, 25.0, 100)))
/// };
/// assert!(opener.open().is_ok());
/// ```
pub trait SourceOpener: Send {
    fn open(&mut self) -> Result<Box<dyn DecodeSource>, PlayerError>;
}

impl<F> SourceOpener for F
where
    F: FnMut() -> Result<Box<dyn DecodeSource>, PlayerError> + Send,
{
    fn open(&mut self) -> Result<Box<dyn DecodeSource>, PlayerError> {
        self()
    }
}

/// Deterministic test-pattern source for host bring-up and tests.
///
/// Yields `frame_count` frames of a moving white bar over a background whose
/// blue channel carries the frame ordinal, so any consumer can tell frames
/// apart without a real decoder.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_rate: f64,
    frame_count: u64,
    cursor: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, frame_rate: f64, frame_count: u64) -> Self {
        Self {
            width,
            height,
            frame_rate,
            frame_count,
            cursor: 0,
        }
    }

    fn pattern(&self, ordinal: u64) -> Vec<u8> {
        let bar_x = (ordinal % u64::from(self.width.max(1))) as u32;
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);

        for _y in 0..self.height {
            for x in 0..self.width {
                if x == bar_x {
                    data.extend_from_slice(&[255, 255, 255]);
                } else {
                    // BGR: ordinal in blue, position in red.
                    data.extend_from_slice(&[(ordinal % 256) as u8, 0, (x % 256) as u8]);
                }
            }
        }

        data
    }
}

impl DecodeSource for SyntheticSource {
    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        if self.cursor >= self.frame_count {
            return Ok(None);
        }

        let frame = SourceFrame::new(self.width, self.height, self.pattern(self.cursor));
        self.cursor += 1;
        Ok(Some(frame))
    }
}
