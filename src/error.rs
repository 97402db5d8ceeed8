//! Error types for GPON downstream frame decoding

use thiserror::Error;

/// Result type for GPON decoding operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error types encountered while decoding the downstream byte stream
///
/// An absent sync word is not an error and is reported as `None` by
/// [`crate::sync::SyncLocator::find`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not enough buffered bits to decode; retry once more input arrives
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Header or BWmap fields are inconsistent; recovered by skip-and-rescan
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Buffer access past the end of the accumulated stream
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

impl ParseError {
    /// Create a new InsufficientData error
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        ParseError::InsufficientData(msg.into())
    }

    /// Create a new MalformedFrame error
    pub fn malformed_frame(msg: impl Into<String>) -> Self {
        ParseError::MalformedFrame(msg.into())
    }

    /// Create a new OutOfRange error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        ParseError::OutOfRange(msg.into())
    }
}
