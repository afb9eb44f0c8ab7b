//! Transcripts and the speech-to-text seam
//!
//! Transcription itself is an external collaborator. The crate only defines
//! the [`Transcriber`] trait plus two simple implementations used by the CLI
//! and by tests: a fixed text and a text file read on demand.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::audio::Waveform;
use crate::error::ScoringError;

/// Text recognized from one recording
///
/// Stored whitespace-trimmed. May be empty when no speech was recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing but whitespace was recognized
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Transcript {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Speech-to-text collaborator
///
/// Implementations must be shareable across concurrent requests.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, waveform: &Waveform) -> Result<Transcript, ScoringError>;
}

/// Returns the same text for every waveform
#[derive(Debug, Clone)]
pub struct FixedTranscriber {
    transcript: Transcript,
}

impl FixedTranscriber {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::new(text),
        }
    }
}

impl Transcriber for FixedTranscriber {
    fn transcribe(&self, _waveform: &Waveform) -> Result<Transcript, ScoringError> {
        Ok(self.transcript.clone())
    }
}

/// Reads a UTF-8 transcript from disk each time it is asked
#[derive(Debug, Clone)]
pub struct TranscriptFile {
    path: PathBuf,
}

impl TranscriptFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Transcriber for TranscriptFile {
    fn transcribe(&self, _waveform: &Waveform) -> Result<Transcript, ScoringError> {
        fs::read_to_string(&self.path)
            .map(Transcript::new)
            .map_err(|err| ScoringError::TranscriptionFailure {
                reason: format!("{}: {}", self.path.display(), err),
            })
    }
}
