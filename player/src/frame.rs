//! The published frame and the rescale + color transform.
//!
//! A `Frame` is an owned, immutable-once-published RGB24 grid tagged with the
//! device resolution it was rescaled to. Construction from a raw decoded
//! frame does the whole per-frame transform: rescale to the device resolution
//! with `fast_image_resize`, then reorder channels from the source's BGR to
//! the render consumer's RGB. Transform failures (zero-area resolutions,
//! malformed source buffers) are ordinary errors the playback loop absorbs as
//! skip-this-frame conditions.

use crate::config::ResizeFilter;
use crate::source::SourceFrame;
use anyhow::{Context, Result, bail};
use common::Resolution;
use fast_image_resize as fr;
use image::RgbImage;

/// One fully transformed video frame, ready for the render consumer.
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Transform a raw decoded frame to `target` resolution and RGB order.
    pub fn from_source(raw: SourceFrame, target: Resolution, filter: ResizeFilter) -> Result<Self> {
        if target.is_zero_area() {
            bail!("target resolution {} has zero area", target);
        }
        if raw.width == 0 || raw.height == 0 {
            bail!("source frame {}x{} has zero area", raw.width, raw.height);
        }
        let expected = raw.expected_len();
        if raw.data.len() != expected {
            bail!(
                "source frame buffer is {} bytes, expected {} for {}x{}",
                raw.data.len(),
                expected,
                raw.width,
                raw.height
            );
        }

        let src = fr::images::Image::from_vec_u8(
            TryInto::try_into(raw.width)?,
            TryInto::try_into(raw.height)?,
            raw.data,
            fr::PixelType::U8x3,
        )
        .context("Failed to create source image")?;

        let mut dst = fr::images::Image::new(
            TryInto::try_into(target.width)?,
            TryInto::try_into(target.height)?,
            fr::PixelType::U8x3,
        );

        let mut resizer = fr::Resizer::new();
        resizer
            .resize(
                &src,
                &mut dst,
                &fr::ResizeOptions::new().resize_alg(filter.resize_alg()),
            )
            .context("Failed to resize frame")?;

        // BGR -> RGB
        let mut pixels = dst.into_vec();
        for pixel in pixels.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }

        let image = RgbImage::from_raw(target.width, target.height, pixels)
            .context("Failed to create frame buffer")?;

        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The resolution this frame was rescaled to.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.image.width(), self.image.height())
    }

    /// RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let p = self.image.get_pixel(x, y);
        (p[0], p[1], p[2])
    }

    /// Raw RGB24 pixel data, row-major, `width * height * 3` bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
