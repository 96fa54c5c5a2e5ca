//! Error types
use thiserror::Error;

/// Errors surfaced by the spectrogram pipeline and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// A setting is malformed or out of range.  The rejected change was not applied.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A sample chunk does not fit into the sliding window
    #[error("chunk of {chunk} samples overruns a window of {capacity} samples")]
    BufferOverrun { chunk: usize, capacity: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The waveform file could not be decoded
    #[error("decoding failed: {0}")]
    Decode(#[from] hound::Error),

    /// The output image could not be encoded
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The live capture device failed
    #[error("capture failed: {0}")]
    Capture(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn invalid<T, S: Into<String>>(msg: S) -> Result<T> {
    Err(Error::InvalidConfiguration(msg.into()))
}
