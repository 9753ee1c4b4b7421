// Example runner for the `iris_vision` library: drives a capture session
// from a synthetic frame source and writes the delivered artifacts to disk,
// standing in for a camera and a preview window.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use env_logger::Env;
use log::{info, warn};

use iris_vision::pipeline::{
    DEFAULT_LOGO_NAME, DEFAULT_RESOURCE_BASE, EncodedImage, Frame, FramePipeline, PipelineConfig,
    PixelFormat, StageFault, TransformParameters,
};
use iris_vision::runtime::{
    CaptureSession, DisplaySink, FrameSource, SessionConfig, SharedParameters,
};

/// A camera stand-in: a BGR gradient that drifts a little every frame.
struct SyntheticSource {
    width: u32,
    height: u32,
    tick: u32,
}

impl FrameSource for SyntheticSource {
    fn grab(&mut self) -> Option<Frame> {
        let mut frame = Frame::zeroed(self.width, self.height, PixelFormat::Bgr);
        for y in 0..self.height {
            for x in 0..self.width {
                let pixel = frame.pixel_mut(x, y);
                pixel[0] = ((x + self.tick) % 256) as u8;
                pixel[1] = ((y + self.tick / 2) % 256) as u8;
                pixel[2] = ((x + y) % 256) as u8;
            }
        }
        self.tick = self.tick.wrapping_add(1);
        Some(frame)
    }
}

/// A preview-window stand-in: writes each delivered artifact pair to disk.
struct DiskSink {
    dir: PathBuf,
    cycle: u32,
}

impl DiskSink {
    fn write(&self, name: &str, image: &EncodedImage) {
        let path = self.dir.join(format!("{name}_{:04}.png", self.cycle));
        if let Err(error) = std::fs::write(&path, &image.bytes) {
            warn!("could not write {}: {error}", path.display());
        }
    }
}

impl DisplaySink for DiskSink {
    fn present_frame(&mut self, image: Option<&EncodedImage>) {
        self.cycle += 1;
        if let Some(image) = image {
            self.write("frame", image);
        }
    }

    fn present_histogram(&mut self, image: Option<&EncodedImage>) {
        if let Some(image) = image {
            self.write("histogram", image);
        }
    }

    fn report_faults(&mut self, faults: &[StageFault]) {
        for fault in faults {
            warn!("cycle {}: {:?}", self.cycle + 1, fault);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Logging & Argument Parsing ---
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().collect();
    let output_dir = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("preview_out"));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    // --- 2. Pipeline Setup ---
    // A missing resources/logo.png just disables the overlay stage.
    let pipeline = FramePipeline::new(PipelineConfig::default())
        .with_logo_from(Path::new(DEFAULT_RESOURCE_BASE), DEFAULT_LOGO_NAME);

    // --- 3. Initial Parameters ---
    let params = SharedParameters::new(TransformParameters::from_text("1.2", "12", false, true)?);

    // --- 4. Session Start ---
    let source = SyntheticSource {
        width: 320,
        height: 240,
        tick: 0,
    };
    let sink = DiskSink {
        dir: output_dir.clone(),
        cycle: 0,
    };
    let mut session = CaptureSession::start(
        source,
        pipeline,
        params.clone(),
        sink,
        SessionConfig::default(),
    );

    // --- 5. Run, Then Flip a Setting Mid-Stream ---
    tokio::time::sleep(Duration::from_millis(500)).await;
    info!("switching to grayscale preview");
    params.set(TransformParameters::from_text("", "", true, true)?);
    tokio::time::sleep(Duration::from_millis(500)).await;

    // --- 6. Shutdown ---
    info!(
        "dropped {} frame(s) along the way",
        session.mailbox().dropped_frames()
    );
    session.stop().await;
    info!("artifacts written to {}", output_dir.display());
    Ok(())
}
