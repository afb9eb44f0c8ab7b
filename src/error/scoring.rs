// Scoring error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Scoring error code constants
///
/// Error code range: 2001-2006
pub struct ScoringErrorCodes {}

impl ScoringErrorCodes {
    /// Feature vector length differs from the fixed layout
    pub const SHAPE_VIOLATION: i32 = 2001;

    /// Anomaly model failed to produce a decision value
    pub const MODEL_FAILURE: i32 = 2002;

    /// Score scaler failed to normalize the raw score
    pub const SCALER_FAILURE: i32 = 2003;

    /// Speech-to-text collaborator failed
    pub const TRANSCRIPTION_FAILURE: i32 = 2004;

    /// Model or scaler artifact is structurally invalid
    pub const ARTIFACT_INVALID: i32 = 2005;

    /// Model or scaler artifact could not be read or parsed
    pub const ARTIFACT_UNREADABLE: i32 = 2006;
}

/// Log a scoring error with structured context
pub fn log_scoring_error(err: &ScoringError, context: &str) {
    error!(
        "Scoring error in {}: code={}, component=RiskScorer, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Risk scoring errors
///
/// Failures of the anomaly model, scaler or transcriber are carried to the
/// caller unchanged. There is no fallback label.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Feature vector of the wrong length reached the scorer
    ShapeViolation { expected: usize, actual: usize },

    /// Anomaly model failure
    ModelFailure { reason: String },

    /// Scaler failure
    ScalerFailure { reason: String },

    /// Transcriber failure
    TranscriptionFailure { reason: String },

    /// Artifact parsed but is inconsistent
    ArtifactInvalid { artifact: String, reason: String },

    /// Artifact could not be read or deserialized
    ArtifactUnreadable { path: String, reason: String },
}

impl ErrorCode for ScoringError {
    fn code(&self) -> i32 {
        match self {
            ScoringError::ShapeViolation { .. } => ScoringErrorCodes::SHAPE_VIOLATION,
            ScoringError::ModelFailure { .. } => ScoringErrorCodes::MODEL_FAILURE,
            ScoringError::ScalerFailure { .. } => ScoringErrorCodes::SCALER_FAILURE,
            ScoringError::TranscriptionFailure { .. } => ScoringErrorCodes::TRANSCRIPTION_FAILURE,
            ScoringError::ArtifactInvalid { .. } => ScoringErrorCodes::ARTIFACT_INVALID,
            ScoringError::ArtifactUnreadable { .. } => ScoringErrorCodes::ARTIFACT_UNREADABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            ScoringError::ShapeViolation { expected, actual } => {
                format!(
                    "Feature vector must have exactly {} values (got {})",
                    expected, actual
                )
            }
            ScoringError::ModelFailure { reason } => {
                format!("Anomaly model failed: {}", reason)
            }
            ScoringError::ScalerFailure { reason } => {
                format!("Score scaler failed: {}", reason)
            }
            ScoringError::TranscriptionFailure { reason } => {
                format!("Transcription failed: {}", reason)
            }
            ScoringError::ArtifactInvalid { artifact, reason } => {
                format!("Invalid {} artifact: {}", artifact, reason)
            }
            ScoringError::ArtifactUnreadable { path, reason } => {
                format!("Cannot load artifact {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoringError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ScoringError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_error_codes() {
        assert_eq!(
            ScoringError::ShapeViolation {
                expected: 10,
                actual: 3
            }
            .code(),
            2001
        );
        assert_eq!(
            ScoringError::ModelFailure {
                reason: "test".to_string()
            }
            .code(),
            2002
        );
        assert_eq!(
            ScoringError::ScalerFailure {
                reason: "test".to_string()
            }
            .code(),
            2003
        );
        assert_eq!(
            ScoringError::TranscriptionFailure {
                reason: "test".to_string()
            }
            .code(),
            2004
        );
        assert_eq!(
            ScoringError::ArtifactInvalid {
                artifact: "scaler".to_string(),
                reason: "test".to_string()
            }
            .code(),
            2005
        );
        assert_eq!(
            ScoringError::ArtifactUnreadable {
                path: "model.json".to_string(),
                reason: "test".to_string()
            }
            .code(),
            2006
        );
    }

    #[test]
    fn test_shape_violation_message() {
        let err = ScoringError::ShapeViolation {
            expected: 10,
            actual: 11,
        };
        assert!(err.message().contains("exactly 10"));
        assert!(err.message().contains("got 11"));
    }

    #[test]
    fn test_error_propagation() {
        fn may_fail() -> Result<f64, ScoringError> {
            Err(ScoringError::ModelFailure {
                reason: "unavailable".to_string(),
            })
        }

        fn caller() -> Result<f64, ScoringError> {
            let raw = may_fail()?;
            Ok(-raw)
        }

        assert_eq!(
            caller(),
            Err(ScoringError::ModelFailure {
                reason: "unavailable".to_string()
            })
        );
    }
}
