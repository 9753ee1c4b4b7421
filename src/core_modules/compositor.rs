// THEORY:
// The `compositor` module stamps a fixed logo onto a frame. It is a weighted
// additive blend, not alpha compositing: the frame keeps its full weight and
// the logo is added on top at reduced weight, which is what gives the
// watermark look on live video.
//
// Key architectural principles:
// 1.  **Bottom-right anchor**: The logo's bottom-right corner is pinned to the
//     frame's bottom-right corner, so it stays put across capture resolutions.
// 2.  **Saturating arithmetic**: Blended components clip at 255, never wrap.
//     A bright frame under a bright logo goes white, not black.
// 3.  **Geometry checked first**: An overlay that does not fit, or whose
//     channel layout differs from the frame's, fails before a single byte is
//     written, so the caller's frame is untouched on the error path.

use crate::core_modules::frame::{Byte, Frame};
use crate::error::{PipelineError, Result};

/// Blend weight of the underlying frame.
pub const W_FRAME: f32 = 1.0;
/// Blend weight of the logo overlay.
pub const W_LOGO: f32 = 0.7;

/// Blends `logo` onto the bottom-right corner of `frame` in place.
///
/// Pixels outside the logo's footprint are left bit-identical. Fails with
/// `InvalidGeometry` when the logo exceeds the frame in either dimension or
/// the pixel formats differ; the frame is unmodified in that case.
pub fn overlay(frame: &mut Frame, logo: &Frame) -> Result<()> {
    if logo.width() > frame.width() || logo.height() > frame.height() {
        return Err(PipelineError::InvalidGeometry(format!(
            "overlay {}x{} does not fit frame {}x{}",
            logo.width(),
            logo.height(),
            frame.width(),
            frame.height()
        )));
    }
    if logo.format() != frame.format() {
        return Err(PipelineError::InvalidGeometry(format!(
            "overlay format {:?} does not match frame format {:?}",
            logo.format(),
            frame.format()
        )));
    }

    let origin_x = frame.width() - logo.width();
    let origin_y = frame.height() - logo.height();

    for y in 0..logo.height() {
        for x in 0..logo.width() {
            let source = logo.pixel(x, y);
            let target = frame.pixel_mut(origin_x + x, origin_y + y);
            for (frame_component, logo_component) in target.iter_mut().zip(source) {
                *frame_component = blend(*frame_component, *logo_component);
            }
        }
    }

    Ok(())
}

/// `round(frame * W_FRAME + logo * W_LOGO)`, saturating at 255.
#[inline]
fn blend(frame_component: Byte, logo_component: Byte) -> Byte {
    let mixed = frame_component as f32 * W_FRAME + logo_component as f32 * W_LOGO;
    mixed.round().clamp(0.0, 255.0) as Byte
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::frame::PixelFormat;

    fn solid_frame(width: u32, height: u32, value: u8) -> Frame {
        let len = width as usize * height as usize * 3;
        Frame::new(width, height, PixelFormat::Bgr, vec![value; len]).unwrap()
    }

    #[test]
    fn blend_applies_fixed_weights() {
        let mut frame = solid_frame(2, 2, 100);
        let logo = solid_frame(1, 1, 100);
        overlay(&mut frame, &logo).unwrap();
        // 100 * 1.0 + 100 * 0.7 = 170
        assert_eq!(frame.pixel(1, 1), &[170, 170, 170]);
    }

    #[test]
    fn blend_rounds_to_nearest() {
        let mut frame = solid_frame(1, 1, 10);
        let logo = solid_frame(1, 1, 1);
        overlay(&mut frame, &logo).unwrap();
        // 10 * 1.0 + 1 * 0.7 = 10.7 -> 11
        assert_eq!(frame.pixel(0, 0), &[11, 11, 11]);
    }

    #[test]
    fn blend_saturates_instead_of_wrapping() {
        let mut frame = solid_frame(1, 1, 200);
        let logo = solid_frame(1, 1, 200);
        overlay(&mut frame, &logo).unwrap();
        assert_eq!(frame.pixel(0, 0), &[255, 255, 255]);
    }

    #[test]
    fn only_the_logo_footprint_is_touched() {
        let mut frame = solid_frame(4, 4, 50);
        let untouched = frame.clone();
        let logo = solid_frame(2, 2, 50);
        overlay(&mut frame, &logo).unwrap();

        for y in 0..4 {
            for x in 0..4 {
                if x >= 2 && y >= 2 {
                    assert_eq!(frame.pixel(x, y), &[85, 85, 85]);
                } else {
                    assert_eq!(frame.pixel(x, y), untouched.pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn footprint_is_anchored_bottom_right() {
        let mut frame = solid_frame(3, 2, 0);
        let logo = solid_frame(1, 1, 100);
        overlay(&mut frame, &logo).unwrap();
        assert_eq!(frame.pixel(2, 1), &[70, 70, 70]);
        assert_eq!(frame.pixel(0, 0), &[0, 0, 0]);
    }

    #[test]
    fn oversized_logo_leaves_frame_unmodified() {
        let mut frame = solid_frame(2, 2, 50);
        let before = frame.clone();
        let logo = solid_frame(3, 1, 50);
        let result = overlay(&mut frame, &logo);
        assert!(matches!(result, Err(PipelineError::InvalidGeometry(_))));
        assert_eq!(frame, before);
    }

    #[test]
    fn format_mismatch_is_invalid_geometry() {
        let mut frame = solid_frame(2, 2, 50);
        let before = frame.clone();
        let logo = Frame::zeroed(1, 1, PixelFormat::Gray);
        let result = overlay(&mut frame, &logo);
        assert!(matches!(result, Err(PipelineError::InvalidGeometry(_))));
        assert_eq!(frame, before);
    }
}
