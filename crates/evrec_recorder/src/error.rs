//! Recorder error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a recording or playback session.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The log file could not be opened; the session never started
    #[error("Failed to open event log {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file was opened but could not be read in full
    #[error("Failed to read event log {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Appending or flushing a record failed mid-session
    #[error("Failed to write event log: {0}")]
    Write(#[source] io::Error),
}

/// Per-record decode failures. These never abort a log load; the
/// offending record is logged and skipped.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The record body ended before its payload was complete
    #[error("record body truncated")]
    Truncated,

    /// The record carries an event tag this build does not know
    #[error("unknown event tag {0}")]
    UnknownTag(u8),

    /// A dropped-file path was not valid UTF-8 on a platform that requires it
    #[error("dropped file path is not valid UTF-8")]
    InvalidPath,
}

impl From<io::Error> for FormatError {
    fn from(_: io::Error) -> Self {
        // Decoding only ever reads from in-memory slices, where the sole
        // failure is running out of bytes.
        FormatError::Truncated
    }
}

/// Screenshot capture and encoding errors.
#[derive(Error, Debug)]
pub enum ScreenshotError {
    /// Width or height is zero
    #[error("cannot encode an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    /// The pixel buffer does not match the declared dimensions
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// The image format cannot represent these dimensions
    #[error("{width}x{height} exceeds the format's size limit")]
    DimensionsTooLarge { width: u32, height: u32 },

    /// The PNG encoder rejected the image
    #[error("PNG encoding error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;
