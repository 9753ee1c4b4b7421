// THEORY:
// The `encoder` module is the only boundary where frames leave pixel-buffer
// form. Everything inside the pipeline is raw BGR/gray bytes; display
// surfaces and the logo file on disk speak PNG. PNG is used because it is
// lossless: a frame must survive encode/decode bit-identically, or the
// histogram shown next to the preview would describe a different image than
// the one on screen.
//
// The container stores color as RGB, so BGR frames have their outer channels
// swapped on the way in and again on the way out. Grayscale frames map 1:1
// onto 8-bit luma. Emptiness is decided here and nowhere else: a zero-sized
// frame flows through every transform stage untouched, but there is no such
// thing as a zero-sized PNG, so encoding one is an `EncodingFailure`.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::core_modules::frame::{Byte, Bytes, Frame, PixelFormat};
use crate::error::{PipelineError, Result};

/// A losslessly encoded image, ready to hand to a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
    /// The PNG container bytes.
    pub bytes: Bytes,
}

/// Serializes `frame` as a PNG.
///
/// Fails with `EncodingFailure` for a zero-sized frame; every other frame
/// round-trips exactly through [`decode`].
pub fn encode(frame: &Frame) -> Result<EncodedImage> {
    if frame.is_empty() {
        return Err(PipelineError::EncodingFailure(format!(
            "cannot encode a {}x{} frame",
            frame.width(),
            frame.height()
        )));
    }

    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    let write_result = match frame.format() {
        PixelFormat::Gray => encoder.write_image(
            frame.as_bytes(),
            frame.width(),
            frame.height(),
            ExtendedColorType::L8,
        ),
        PixelFormat::Bgr => encoder.write_image(
            &swap_red_blue(frame.as_bytes()),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        ),
    };
    write_result.map_err(|error| PipelineError::EncodingFailure(error.to_string()))?;

    Ok(EncodedImage {
        width: frame.width(),
        height: frame.height(),
        bytes,
    })
}

/// Deserializes PNG (or any container the `image` crate recognizes) bytes
/// back into a frame. Single-channel images come back as `Gray`, everything
/// else as `Bgr`.
pub fn decode(bytes: &[Byte]) -> Result<Frame> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|error| PipelineError::EncodingFailure(error.to_string()))?;

    match decoded {
        DynamicImage::ImageLuma8(gray) => {
            let (width, height) = gray.dimensions();
            Frame::new(width, height, PixelFormat::Gray, gray.into_raw())
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            Frame::new(width, height, PixelFormat::Bgr, swap_red_blue(rgb.as_raw()))
        }
    }
}

/// Reads and decodes an image file, e.g. the logo overlay.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let resource = |reason: String| PipelineError::ResourceLoadFailure {
        path: path.display().to_string(),
        reason,
    };
    let bytes = std::fs::read(path).map_err(|error| resource(error.to_string()))?;
    decode(&bytes).map_err(|error| resource(error.to_string()))
}

/// Swaps the first and third component of every pixel. BGR -> RGB and back
/// are the same permutation.
fn swap_red_blue(data: &[Byte]) -> Bytes {
    let mut swapped = data.to_vec();
    for pixel in swapped.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
    swapped
}
