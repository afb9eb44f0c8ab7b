// Error types for the speech risk pipeline
//
// This module defines custom error types for audio decoding and risk scoring,
// providing structured error handling with stable numeric error codes.
//
// Degenerate input (silence, empty transcript, zero-length audio) is never an
// error: the extractors absorb it with default values. Only decoding failures,
// shape violations and failures of the external collaborators surface here.

mod audio;
mod scoring;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use scoring::{log_scoring_error, ScoringError, ScoringErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling for
/// callers that only want a number and a sentence.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
