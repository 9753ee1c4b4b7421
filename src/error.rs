use thiserror::Error;

/// Frame pipeline errors.
///
/// Every variant is stage-local: the orchestrator reacts by skipping or
/// degrading the one stage that failed, never by tearing down the
/// capture/display cycle. Only `EncodingFailure` is propagated to the
/// caller, because there is nothing sensible to deliver in its place.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A buffer dimension made the requested operation impossible, e.g. an
    /// overlay larger than the frame it targets, or mismatched channel
    /// counts between two buffers.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A numeric parameter was malformed or outside its documented domain,
    /// e.g. a non-positive or non-finite contrast factor.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A frame could not be serialized or deserialized, e.g. a zero-sized
    /// frame handed to the encoder, or bytes that are not a valid image.
    #[error("encoding failure: {0}")]
    EncodingFailure(String),

    /// A resource file (the logo overlay) was missing or undecodable.
    #[error("resource load failure for '{path}': {reason}")]
    ResourceLoadFailure { path: String, reason: String },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, PipelineError>;
