// THEORY:
// The `grayscale` module collapses a BGR frame to single-channel intensity
// using Rec. 601 luma weights (0.299 R + 0.587 G + 0.114 B), the same
// perceptual weighting broadcast video uses. It is the one stage that changes
// a frame's channel count, which is why it returns a new frame instead of
// rewriting in place. Feeding it an already-gray frame is a pass-through.

use crate::core_modules::frame::{Byte, Frame, PixelFormat};

/// Converts `frame` to single-channel grayscale.
///
/// Spatial dimensions are preserved; only the channel count changes. A frame
/// that is already grayscale is returned as-is.
pub fn to_grayscale(frame: Frame) -> Frame {
    if frame.format() == PixelFormat::Gray {
        return frame;
    }

    let mut gray = Frame::zeroed(frame.width(), frame.height(), PixelFormat::Gray);
    for (target, source) in gray
        .as_bytes_mut()
        .iter_mut()
        .zip(frame.as_bytes().chunks_exact(3))
    {
        // BGR byte order: blue first, red last.
        *target = luma(source[2], source[1], source[0]);
    }
    gray
}

/// Rec. 601 luma, rounded to the nearest byte. Computed in f64 for stability.
#[inline]
fn luma(red: Byte, green: Byte, blue: Byte) -> Byte {
    let y = 0.299_f64 * red as f64 + 0.587_f64 * green as f64 + 0.114_f64 * blue as f64;
    y.round().clamp(0.0, 255.0) as Byte
}
