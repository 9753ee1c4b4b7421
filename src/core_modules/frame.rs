// THEORY:
// The `Frame` module is the most fundamental unit of the pipeline. Every stage
// consumes and produces the same thing: a rectangular, row-major grid of 8-bit
// pixel components. Capture hands one in, the compositor / grayscale / tone
// stages rewrite its bytes, the histogram engine reads it, and the encoder
// serializes it.
//
// Key architectural principles:
// 1.  **Dumb data container**: A `Frame` holds bytes plus the three numbers
//     needed to interpret them (width, height, channel layout). It performs no
//     image processing of its own; transforms live in their own modules.
// 2.  **One guarded invariant**: `data.len() == width * height * channels`,
//     enforced at construction. Index math everywhere else can then stay
//     unchecked and simple.
// 3.  **BGR end to end**: Color frames keep the capture byte order (blue,
//     green, red). Nothing in the pipeline reorders channels; only the encoder
//     swaps at the container boundary.
//
// Zero-sized frames (width or height of 0) are representable on purpose. A
// camera that is still warming up produces them, and the stages pass them
// through untouched; only the encoder treats emptiness as an error.

use crate::error::{PipelineError, Result};

pub type Byte = u8;
pub type Bytes = Vec<Byte>;

/// Channel layout of a frame's pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Single-channel 8-bit intensity.
    Gray,
    /// Three-channel 8-bit color in capture byte order: blue, green, red.
    Bgr,
}

impl PixelFormat {
    /// Number of bytes per pixel for this layout.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Bgr => 3,
        }
    }
}

/// A "dumb" data container representing one captured video frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Bytes,
}

impl Frame {
    /// Byte length a `width x height` buffer of `format` requires, or `None`
    /// when the product overflows `usize`.
    fn byte_len(width: u32, height: u32, format: PixelFormat) -> Option<usize> {
        (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(format.channels())
    }

    /// Wraps raw pixel data, checking it against the declared dimensions.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Bytes) -> Result<Self> {
        let expected = Self::byte_len(width, height, format).ok_or_else(|| {
            PipelineError::InvalidGeometry(format!(
                "frame dimensions {}x{} {:?} overflow the addressable byte range",
                width, height, format
            ))
        })?;
        if data.len() != expected {
            return Err(PipelineError::InvalidGeometry(format!(
                "frame data is {} bytes, but {}x{} {:?} requires {}",
                data.len(),
                width,
                height,
                format,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// A frame of the given dimensions with every component set to zero
    /// (black).
    ///
    /// Panics when the dimensions overflow the addressable byte range; use
    /// [`Frame::new`] to validate untrusted dimensions.
    pub fn zeroed(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = Self::byte_len(width, height, format)
            .expect("frame dimensions overflow the addressable byte range");
        Self {
            width,
            height,
            format,
            data: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// True when the frame covers no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[Byte] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [Byte] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Byte offset of the pixel at `(x, y)`.
    #[inline]
    fn byte_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels()
    }

    /// The channel bytes of the pixel at `(x, y)`.
    ///
    /// Coordinates are checked in debug builds; callers stay in range.
    pub fn pixel(&self, x: u32, y: u32) -> &[Byte] {
        debug_assert!(x < self.width && y < self.height);
        let start = self.byte_index(x, y);
        &self.data[start..start + self.channels()]
    }

    /// Mutable access to the channel bytes of the pixel at `(x, y)`.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [Byte] {
        debug_assert!(x < self.width && y < self.height);
        let start = self.byte_index(x, y);
        let channels = self.channels();
        &mut self.data[start..start + channels]
    }
}
