// THEORY:
// The `tone_mapper` module is the pipeline's exposure control: one linear pass
// `p' = p * contrast + brightness` over every component of every pixel,
// rounded and clamped to the byte range. Channels are treated identically, so
// a gray frame and a color frame go through the same code path. The gain
// domain (finite, positive) is validated before any byte is written; the
// caller's frame is untouched on the error path.

use crate::core_modules::frame::{Byte, Frame};
use crate::core_modules::parameters::ToneParams;
use crate::error::Result;

/// Applies `p' = clamp(round(p * contrast + brightness), 0, 255)` to every
/// component of `frame` in place.
///
/// Fails with `InvalidParameter` when `contrast` is non-finite or not
/// positive; `brightness` may be any offset, including negative.
pub fn adjust(frame: &mut Frame, contrast: f32, brightness: i32) -> Result<()> {
    let tone = ToneParams::new(contrast, brightness)?;
    for component in frame.as_bytes_mut() {
        *component = map(*component, tone.contrast, tone.brightness);
    }
    Ok(())
}

#[inline]
fn map(component: Byte, contrast: f32, brightness: i32) -> Byte {
    let adjusted = component as f32 * contrast + brightness as f32;
    adjusted.round().clamp(0.0, 255.0) as Byte
}
