// THEORY:
// The `pipeline` module is the top-level API for the frame engine. It
// encapsulates the per-frame stage sequence behind a single call: hand in a
// captured frame and a parameter snapshot, get back the encoded preview image
// and the encoded histogram chart.
//
// Its central policy is graceful degradation. A stage that cannot run with
// this frame's inputs (an overlay that does not fit, a gain outside its
// domain) is skipped and recorded as a fault on the output, and the rest of
// the sequence still runs. Only encoding is allowed to fail the invocation,
// because without an encoded image there is nothing to deliver. The pipeline
// itself holds no per-frame state; the only thing it owns between invocations
// is the pre-decoded logo overlay.

use std::path::Path;

use log::{info, warn};

use crate::core_modules::{chart, compositor, encoder, grayscale, tone_mapper};

// Re-export the data types callers hold on both sides of a pipeline call.
pub use crate::core_modules::chart::ChartStyle;
pub use crate::core_modules::encoder::EncodedImage;
pub use crate::core_modules::frame::{Frame, PixelFormat};
pub use crate::core_modules::histogram::{ChannelHistogram, ChannelKind};
pub use crate::core_modules::parameters::{ToneParams, TransformParameters};
pub use crate::error::{PipelineError, Result};

/// Directory the logo overlay is loaded from by default.
pub const DEFAULT_RESOURCE_BASE: &str = "resources";
/// File name of the logo overlay inside the resource base.
pub const DEFAULT_LOGO_NAME: &str = "logo.png";

/// Configuration for a `FramePipeline`, allowing for tunable rendering.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Geometry of the rendered histogram chart.
    pub chart: ChartStyle,
}

/// A recoverable, stage-local degradation recorded on the invocation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageFault {
    /// The compositor stage did not run; the frame passed through unmodified.
    OverlaySkipped(String),
    /// The tone-mapping stage did not run; the frame passed through unmodified.
    ToneSkipped(String),
}

/// The rendered products of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct FrameArtifacts {
    /// The processed frame, PNG-encoded.
    pub frame: EncodedImage,
    /// The histogram chart of the processed frame, PNG-encoded.
    pub histogram: EncodedImage,
    /// Stages that degraded instead of running this invocation.
    pub faults: Vec<StageFault>,
}

/// The main, top-level struct for the frame engine.
pub struct FramePipeline {
    config: PipelineConfig,
    logo: Option<Frame>,
}

impl FramePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config, logo: None }
    }

    /// Attaches a pre-decoded logo overlay.
    pub fn with_logo(mut self, logo: Frame) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Loads the logo overlay from `base/name`.
    ///
    /// A missing or undecodable file downgrades to "no overlay": the pipeline
    /// stays fully usable and the compositor stage is skipped when asked for.
    pub fn with_logo_from(mut self, base: &Path, name: &str) -> Self {
        let path = base.join(name);
        match encoder::load_frame(&path) {
            Ok(logo) => {
                info!(
                    "loaded logo overlay {} ({}x{})",
                    path.display(),
                    logo.width(),
                    logo.height()
                );
                self.logo = Some(logo);
            }
            Err(error) => {
                warn!("logo overlay disabled: {error}");
                self.logo = None;
            }
        }
        self
    }

    /// The currently attached logo overlay, if any.
    pub fn logo(&self) -> Option<&Frame> {
        self.logo.as_ref()
    }

    /// Runs the full stage sequence over one captured frame.
    ///
    /// The frame is consumed; each invocation owns its input outright. The
    /// only error this returns is `EncodingFailure`; every stage-local
    /// problem is degraded into a [`StageFault`] instead.
    pub fn process(&self, mut frame: Frame, params: TransformParameters) -> Result<FrameArtifacts> {
        let mut faults = Vec::new();

        // --- 1. Logo Compositing ---
        // An enabled overlay with no logo loaded is a quiet skip; the load
        // failure was already reported when the pipeline was built.
        if params.overlay_enabled {
            if let Some(logo) = &self.logo {
                if let Err(error) = compositor::overlay(&mut frame, logo) {
                    warn!("overlay skipped: {error}");
                    faults.push(StageFault::OverlaySkipped(error.to_string()));
                }
            }
        }

        // --- 2. Grayscale Conversion ---
        if params.grayscale {
            frame = grayscale::to_grayscale(frame);
        }

        // --- 3. Tone Mapping ---
        if let Some(tone) = params.tone {
            if let Err(error) = tone_mapper::adjust(&mut frame, tone.contrast, tone.brightness) {
                warn!("tone mapping skipped: {error}");
                faults.push(StageFault::ToneSkipped(error.to_string()));
            }
        }

        // --- 4. Histogram Rendering ---
        // The chart always describes the frame as it leaves the stages above.
        let histograms = ChannelHistogram::compute_all(&frame);
        let chart_frame = chart::render(&histograms, &self.config.chart);

        // --- 5. Encoding ---
        let frame_image = encoder::encode(&frame)?;
        let histogram_image = encoder::encode(&chart_frame)?;

        Ok(FrameArtifacts {
            frame: frame_image,
            histogram: histogram_image,
            faults,
        })
    }
}
