// Speech Risk - cognitive-decline risk screening from speech recordings
// Acoustic + linguistic feature extraction scored by a pre-trained anomaly model

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod scoring;
pub mod transcript;

// Re-exports for convenience
pub use analysis::features::{FeatureAssembler, FeatureVector, SignalFeatureExtractor};
pub use analysis::{AnalysisReport, RecordingAnalysis, RiskAnalyzer};
pub use audio::{load_wav, Waveform};
pub use config::AnalysisConfig;
pub use error::{AudioError, ErrorCode, ScoringError};
pub use scoring::{AnomalyModel, FittedScaler, IsolationForest, RiskLabel, RiskScorer, ScoreScaler};
pub use transcript::{FixedTranscriber, Transcriber, Transcript, TranscriptFile};

use tracing_subscriber::filter::LevelFilter;

/// Install a stderr fmt subscriber; `log` records are forwarded to it
///
/// Safe to call more than once: later calls are ignored.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
