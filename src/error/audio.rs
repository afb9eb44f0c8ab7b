// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Error code range: 1001-1004
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// WAV file could not be opened or its header is malformed
    pub const OPEN_FAILED: i32 = 1001;

    /// A sample could not be decoded mid-stream
    pub const READ_FAILED: i32 = 1002;

    /// Sample format / bit depth combination is not supported
    pub const UNSUPPORTED_FORMAT: i32 = 1003;

    /// Header declares zero channels
    pub const ZERO_CHANNELS: i32 = 1004;
}

/// Log an audio error with structured context
///
/// This function logs audio errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=WavLoader, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio decoding errors
///
/// These errors cover turning a file on disk into a mono waveform.
/// Silent or very short recordings decode fine and are not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// WAV file could not be opened
    OpenFailed { path: String, reason: String },

    /// Sample decoding failed
    ReadFailed { path: String, reason: String },

    /// Unsupported sample format
    UnsupportedFormat { path: String, bits_per_sample: u16 },

    /// Header declares zero channels
    ZeroChannels { path: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::OpenFailed { .. } => AudioErrorCodes::OPEN_FAILED,
            AudioError::ReadFailed { .. } => AudioErrorCodes::READ_FAILED,
            AudioError::UnsupportedFormat { .. } => AudioErrorCodes::UNSUPPORTED_FORMAT,
            AudioError::ZeroChannels { .. } => AudioErrorCodes::ZERO_CHANNELS,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::OpenFailed { path, reason } => {
                format!("Failed to open {}: {}", path, reason)
            }
            AudioError::ReadFailed { path, reason } => {
                format!("Error reading samples from {}: {}", path, reason)
            }
            AudioError::UnsupportedFormat {
                path,
                bits_per_sample,
            } => {
                format!(
                    "Unsupported bits_per_sample={} in {}",
                    bits_per_sample, path
                )
            }
            AudioError::ZeroChannels { path } => format!("{} has zero channels", path),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}
