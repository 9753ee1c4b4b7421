// THEORY:
// The `chart` module turns channel histograms into the image the user actually
// sees: per-channel polylines over a black square canvas. It is a tiny
// purpose-built rasterizer rather than a plotting library, because the whole
// drawing vocabulary is one primitive (a clipped straight line) and the canvas
// is a `Frame` like everything else in the pipeline.
//
// Key architectural principles:
// 1.  **One square side rules both axes**: `ChartStyle::size` is the canvas
//     width, the canvas height, the bin spacing (`max(1, size / 256)`) and the
//     normalization ceiling. There is no second dimension to keep in sync.
// 2.  **Clip, never wrap**: With the default 150-pixel canvas the 256-bin
//     polyline extends past the right edge, and a zero-value bin sits on the
//     baseline one row below the bottom edge. Out-of-canvas points are simply
//     not plotted; coordinates are never reduced modulo the canvas.
// 3.  **Fixed channel colors, caller-ordered strokes**: Intensity draws white,
//     blue/green/red draw their own primary (canvas is BGR). Channels are
//     stroked in the order given, so later channels overdraw earlier ones at
//     shared pixels, matching the layout order the histogram engine emits.

use crate::core_modules::frame::{Byte, Frame, PixelFormat};
use crate::core_modules::histogram::{BIN_COUNT, ChannelHistogram, ChannelKind};

/// Side length of the default histogram canvas, in pixels.
pub const DEFAULT_CANVAS_SIZE: u32 = 150;
/// Default stroke width of the polylines, in pixels.
pub const DEFAULT_LINE_THICKNESS: u32 = 2;

/// Geometry of the rendered chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Side length of the square canvas. Drives bin spacing on the x axis and
    /// the normalization ceiling on the y axis.
    pub size: u32,
    /// Stroke width of the polylines.
    pub thickness: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_CANVAS_SIZE,
            thickness: DEFAULT_LINE_THICKNESS,
        }
    }
}

/// Renders the given histograms as colored polylines on a black BGR canvas.
pub fn render(histograms: &[ChannelHistogram], style: &ChartStyle) -> Frame {
    let size = style.size;
    let mut canvas = Frame::zeroed(size, size, PixelFormat::Bgr);
    let bin_width = (size as usize / BIN_COUNT).max(1) as i64;

    for histogram in histograms {
        let color = channel_color(histogram.channel);
        let normalized = histogram.normalized(size);
        for bin in 1..BIN_COUNT {
            let from = (
                bin_width * (bin as i64 - 1),
                size as i64 - normalized[bin - 1] as i64,
            );
            let to = (bin_width * bin as i64, size as i64 - normalized[bin] as i64);
            draw_line(&mut canvas, from, to, color, style.thickness);
        }
    }

    canvas
}

/// Stroke color for a channel, in canvas (BGR) byte order.
fn channel_color(channel: ChannelKind) -> [Byte; 3] {
    match channel {
        ChannelKind::Intensity => [255, 255, 255],
        ChannelKind::Blue => [255, 0, 0],
        ChannelKind::Green => [0, 255, 0],
        ChannelKind::Red => [0, 0, 255],
    }
}

/// Bresenham rasterization between two points, clipped to the canvas.
fn draw_line(
    canvas: &mut Frame,
    from: (i64, i64),
    to: (i64, i64),
    color: [Byte; 3],
    thickness: u32,
) {
    let (mut x, mut y) = from;
    let (end_x, end_y) = to;
    let delta_x = (end_x - x).abs();
    let delta_y = -(end_y - y).abs();
    let step_x = if x < end_x { 1 } else { -1 };
    let step_y = if y < end_y { 1 } else { -1 };
    let mut error = delta_x + delta_y;

    loop {
        plot(canvas, x, y, color, thickness);
        if x == end_x && y == end_y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= delta_y {
            error += delta_y;
            x += step_x;
        }
        if doubled <= delta_x {
            error += delta_x;
            y += step_y;
        }
    }
}

/// Plots a `thickness`-sized square anchored at `(x, y)`; pixels falling
/// outside the canvas are dropped.
fn plot(canvas: &mut Frame, x: i64, y: i64, color: [Byte; 3], thickness: u32) {
    let reach = thickness.max(1) as i64;
    for offset_y in 0..reach {
        for offset_x in 0..reach {
            let px = x + offset_x;
            let py = y + offset_y;
            if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                canvas.pixel_mut(px as u32, py as u32).copy_from_slice(&color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(channel: ChannelKind, bin: usize) -> ChannelHistogram {
        let mut counts = [0u32; BIN_COUNT];
        counts[bin] = 10;
        ChannelHistogram { channel, counts }
    }

    fn thin(size: u32) -> ChartStyle {
        ChartStyle { size, thickness: 1 }
    }

    #[test]
    fn default_style_matches_the_preview_layout() {
        let style = ChartStyle::default();
        assert_eq!(style.size, 150);
        assert_eq!(style.thickness, 2);
    }

    #[test]
    fn canvas_is_a_black_bgr_square() {
        let canvas = render(&[], &ChartStyle::default());
        assert_eq!((canvas.width(), canvas.height()), (150, 150));
        assert_eq!(canvas.format(), PixelFormat::Bgr);
        assert!(canvas.as_bytes().iter().all(|&component| component == 0));
    }

    #[test]
    fn flat_histograms_leave_the_canvas_untouched() {
        let flat = ChannelHistogram {
            channel: ChannelKind::Intensity,
            counts: [0; BIN_COUNT],
        };
        let canvas = render(&[flat], &ChartStyle::default());
        assert!(canvas.as_bytes().iter().all(|&component| component == 0));
    }

    #[test]
    fn a_spike_reaches_the_top_row_at_its_bin() {
        let canvas = render(&[spike(ChannelKind::Intensity, 40)], &thin(150));
        assert_eq!(canvas.pixel(40, 0), &[255, 255, 255]);
    }

    #[test]
    fn channels_draw_in_their_own_colors() {
        let histograms = vec![
            spike(ChannelKind::Blue, 5),
            spike(ChannelKind::Green, 100),
            spike(ChannelKind::Red, 200),
        ];
        let canvas = render(&histograms, &thin(256));
        assert_eq!(canvas.pixel(5, 0), &[255, 0, 0]);
        assert_eq!(canvas.pixel(100, 0), &[0, 255, 0]);
        assert_eq!(canvas.pixel(200, 0), &[0, 0, 255]);
    }

    #[test]
    fn later_channels_overdraw_earlier_ones() {
        let histograms = vec![spike(ChannelKind::Blue, 64), spike(ChannelKind::Red, 64)];
        let canvas = render(&histograms, &thin(256));
        assert_eq!(canvas.pixel(64, 0), &[0, 0, 255]);
    }

    #[test]
    fn bins_past_the_right_edge_are_clipped_not_wrapped() {
        // 256 bins on a 150-wide canvas: the tail falls off the edge. A spike
        // out there must not reappear on the left via wrap-around.
        let canvas = render(&[spike(ChannelKind::Intensity, 220)], &thin(150));
        for x in 0..150 {
            assert_eq!(canvas.pixel(x, 0), &[0, 0, 0]);
        }
    }

    #[test]
    fn every_bin_shape_renders_without_panicking() {
        let mut counts = [0u32; BIN_COUNT];
        for (value, count) in counts.iter_mut().enumerate() {
            *count = (value as u32 * 7) % 97;
        }
        let histogram = ChannelHistogram {
            channel: ChannelKind::Intensity,
            counts,
        };
        let canvas = render(&[histogram], &ChartStyle::default());
        assert!(canvas.as_bytes().iter().any(|&component| component != 0));
    }

    #[test]
    fn bin_spacing_grows_with_the_canvas() {
        // 512 / 256 = 2 columns per bin.
        let canvas = render(&[spike(ChannelKind::Intensity, 100)], &thin(512));
        assert_eq!(canvas.pixel(200, 0), &[255, 255, 255]);
    }

    #[test]
    fn rendering_is_deterministic() {
        let histograms = vec![spike(ChannelKind::Blue, 12), spike(ChannelKind::Red, 30)];
        let first = render(&histograms, &ChartStyle::default());
        let second = render(&histograms, &ChartStyle::default());
        assert_eq!(first, second);
    }
}
