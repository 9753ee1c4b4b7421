// THEORY:
// The `histogram` module measures how a frame's intensity mass is distributed.
// For every active channel it produces a fixed 256-bin count vector: bin `v`
// holds the number of pixels whose component equals `v`. That vector is the
// raw material for the rendered chart, and it is recomputed from scratch every
// frame; histograms are derived data, replaced wholesale, never mutated.
//
// Key architectural principles:
// 1.  **One pass per channel**: Counting is a single O(width * height) sweep
//     over the flat byte buffer with a stride equal to the channel count. No
//     intermediate per-pixel structs are built.
// 2.  **Channel set follows the format**: A gray frame yields exactly one
//     intensity histogram; a BGR frame yields three independent histograms in
//     layout order (blue, green, red). The engine never invents channels.
// 3.  **Min-max normalization, per channel**: Rendering needs bins on a fixed
//     vertical scale. Each channel is normalized independently so its largest
//     bin touches the given height and its smallest sits at zero. That
//     preserves each curve's shape but deliberately gives up cross-channel
//     magnitude comparisons, which is the right trade for a live preview.
//
// A zero-pixel frame is not an error here: every bin counts zero, the
// histogram is flat, and flat histograms normalize to all zeros.

use crate::core_modules::frame::{Frame, PixelFormat};

/// Number of intensity levels an 8-bit channel can take.
pub const BIN_COUNT: usize = 256;

/// Which source channel a histogram was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// The single channel of a grayscale frame.
    Intensity,
    Blue,
    Green,
    Red,
}

/// The intensity distribution of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    /// Channel the counts were taken from.
    pub channel: ChannelKind,
    /// `counts[v]` is the number of pixels whose component equals `v`.
    pub counts: [u32; BIN_COUNT],
}

impl ChannelHistogram {
    fn compute_one(frame: &Frame, channel_index: usize, channel: ChannelKind) -> Self {
        let mut counts = [0u32; BIN_COUNT];
        let stride = frame.channels();
        for pixel in frame.as_bytes().chunks_exact(stride) {
            counts[pixel[channel_index] as usize] += 1;
        }
        Self { channel, counts }
    }

    /// One histogram per channel of `frame`, in the frame's layout order.
    pub fn compute_all(frame: &Frame) -> Vec<ChannelHistogram> {
        match frame.format() {
            PixelFormat::Gray => vec![Self::compute_one(frame, 0, ChannelKind::Intensity)],
            PixelFormat::Bgr => vec![
                Self::compute_one(frame, 0, ChannelKind::Blue),
                Self::compute_one(frame, 1, ChannelKind::Green),
                Self::compute_one(frame, 2, ChannelKind::Red),
            ],
        }
    }

    /// Total number of counted samples. Always equals the frame's pixel count.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }

    /// Min-max normalizes the counts onto `[0, height]`: the largest bin maps
    /// to `height`, the smallest to 0, the rest proportionally in between,
    /// rounded to the nearest integer. A flat histogram maps to all zeros.
    pub fn normalized(&self, height: u32) -> Vec<u32> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        let min = self.counts.iter().copied().min().unwrap_or(0);
        if max == min {
            return vec![0; BIN_COUNT];
        }
        let range = (max - min) as f64;
        self.counts
            .iter()
            .map(|&count| (((count - min) as f64 / range) * height as f64).round() as u32)
            .collect()
    }
}
