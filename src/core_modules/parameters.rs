// THEORY:
// The `parameters` module is the pipeline's control surface, reduced to data.
// Whatever sits in front of the pipeline (checkboxes, text fields, a config
// service) is flattened into one immutable `TransformParameters` snapshot per
// invocation, so a frame is always processed under a single consistent view
// of the settings. Stages never read live control state.

use crate::error::{PipelineError, Result};

/// Contrast/brightness settings for the tone-mapping stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    /// Multiplicative gain applied to every component. Finite and positive.
    pub contrast: f32,
    /// Additive offset applied after the gain. May be negative.
    pub brightness: i32,
}

impl ToneParams {
    /// Validates the contrast domain up front so the tone mapper itself never
    /// sees an out-of-domain gain.
    pub fn new(contrast: f32, brightness: i32) -> Result<Self> {
        if !contrast.is_finite() || contrast <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "contrast must be a finite positive number, got {contrast}"
            )));
        }
        Ok(Self {
            contrast,
            brightness,
        })
    }

    /// The identity mapping: every component passes through unchanged.
    pub fn identity() -> Self {
        Self {
            contrast: 1.0,
            brightness: 0,
        }
    }
}

/// The complete parameter snapshot for one pipeline invocation.
///
/// Built fresh per frame and never mutated afterwards; there is no
/// persistence between frames or across process restarts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformParameters {
    /// `None` disables the tone-mapping stage for this frame.
    pub tone: Option<ToneParams>,
    /// Convert the frame to single-channel grayscale ahead of tone mapping.
    pub grayscale: bool,
    /// Composite the logo overlay onto the frame (when a logo is loaded).
    pub overlay_enabled: bool,
}

impl TransformParameters {
    /// Builds a snapshot from the raw text a control surface hands over.
    ///
    /// An untouched settings panel reads as blank text: if either tone field
    /// is blank after trimming, tone mapping is simply off for this frame and
    /// the result is `Ok`. Only text that is present but malformed, or a
    /// contrast outside its domain, is an `InvalidParameter`.
    pub fn from_text(
        contrast: &str,
        brightness: &str,
        grayscale: bool,
        overlay_enabled: bool,
    ) -> Result<Self> {
        let contrast = contrast.trim();
        let brightness = brightness.trim();

        let tone = if contrast.is_empty() || brightness.is_empty() {
            None
        } else {
            let contrast_value: f32 = contrast.parse().map_err(|_| {
                PipelineError::InvalidParameter(format!("contrast is not a number: '{contrast}'"))
            })?;
            let brightness_value: i32 = brightness.parse().map_err(|_| {
                PipelineError::InvalidParameter(format!(
                    "brightness is not a whole number: '{brightness}'"
                ))
            })?;
            Some(ToneParams::new(contrast_value, brightness_value)?)
        };

        Ok(Self {
            tone,
            grayscale,
            overlay_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let tone = ToneParams::identity();
        assert_eq!(tone.contrast, 1.0);
        assert_eq!(tone.brightness, 0);
    }

    #[test]
    fn contrast_domain_is_enforced() {
        assert!(ToneParams::new(1.5, -20).is_ok());
        assert!(matches!(
            ToneParams::new(0.0, 0),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            ToneParams::new(-1.0, 0),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            ToneParams::new(f32::NAN, 0),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            ToneParams::new(f32::INFINITY, 0),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn blank_text_disables_tone_without_error() {
        let params = TransformParameters::from_text("", "", false, true).unwrap();
        assert_eq!(params.tone, None);
        assert!(params.overlay_enabled);
    }

    #[test]
    fn partially_filled_text_disables_tone() {
        let params = TransformParameters::from_text("1.2", "  ", true, false).unwrap();
        assert_eq!(params.tone, None);
        assert!(params.grayscale);
    }

    #[test]
    fn valid_text_parses_with_whitespace() {
        let params = TransformParameters::from_text(" 2.5 ", " -30 ", false, false).unwrap();
        assert_eq!(
            params.tone,
            Some(ToneParams {
                contrast: 2.5,
                brightness: -30
            })
        );
    }

    #[test]
    fn malformed_text_is_an_invalid_parameter() {
        assert!(matches!(
            TransformParameters::from_text("bright", "10", false, false),
            Err(PipelineError::InvalidParameter(_))
        ));
        assert!(matches!(
            TransformParameters::from_text("1.0", "ten", false, false),
            Err(PipelineError::InvalidParameter(_))
        ));
        // Fractional brightness is out of domain, the offset is integral.
        assert!(matches!(
            TransformParameters::from_text("1.0", "10.5", false, false),
            Err(PipelineError::InvalidParameter(_))
        ));
    }

    #[test]
    fn out_of_domain_contrast_text_is_rejected() {
        assert!(matches!(
            TransformParameters::from_text("-2.0", "0", false, false),
            Err(PipelineError::InvalidParameter(_))
        ));
    }
}
