use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Custom error types for the image-fingerprint library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error from the image library
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Invalid argument supplied to a computation entry point
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source image is not a flat, non-empty 2D image
    #[error("Unsupported image shape: {width}x{height}")]
    UnsupportedImageShape { width: u32, height: u32 },

    /// Source image channel count outside the engine's supported set
    #[error("Unsupported channel layout: {channels} channel(s)")]
    UnsupportedChannelLayout { channels: u8 },

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Outcome of decoding a fingerprint from its text encoding.
///
/// Running out of fields before the buffer is full is a soft failure: the
/// decoded prefix is kept, a warning is logged, and the caller decides
/// whether a partial fingerprint is usable.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// Every expected field was read.
    Complete,
    /// The input ended after `filled` fields.
    Underrun { filled: usize },
}

impl DecodeStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeStatus::Complete)
    }
}
