// Feature extraction for speech risk scoring
//
// This module turns one recording (waveform + transcript) into the fixed
// 10-value vector consumed by the anomaly model.
//
// Module organization:
// - types: Data structures (AcousticFeatures, TextFeatures, FeatureVector)
// - fft: FFT computation with windowing, cross-correlation
// - pitch: YIN fundamental frequency tracking
// - rhythm: Tempo estimation from the onset envelope
// - temporal: Time-domain features (jitter, shimmer, duration)
// - text: Transcript statistics (words, sentences, hesitations)
// - mod.rs: Coordinators (SignalFeatureExtractor, FeatureAssembler)
//
// Vector layout:
// [pitch_mean, jitter, word_count, sentence_count, duration_sec,
//  pitch_std, speech_rate, avg_words_per_sentence, hesitation_count, shimmer]
//
// References:
// - de Cheveigné, A. & Kawahara, H. (2002). YIN, a fundamental frequency
//   estimator for speech and music
// - Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming

pub(crate) mod fft;
pub mod pitch;
pub mod rhythm;
pub mod temporal;
pub mod text;
mod types;

pub use types::{AcousticFeatures, FeatureVector, TextFeatures, FEATURE_COUNT, FEATURE_NAMES};

use crate::audio::Waveform;
use crate::config::{AnalysisConfig, AssemblerConfig, PitchConfig, RhythmConfig};
use crate::transcript::Transcript;
use pitch::PitchTracker;
use rhythm::TempoEstimator;

/// SignalFeatureExtractor coordinates the acoustic measurements
///
/// Never fails: empty, silent or zero-rate input degrades to defaults.
pub struct SignalFeatureExtractor {
    pitch_tracker: PitchTracker,
    tempo_estimator: TempoEstimator,
}

impl SignalFeatureExtractor {
    pub fn new(pitch: PitchConfig, rhythm: RhythmConfig) -> Self {
        Self {
            pitch_tracker: PitchTracker::new(pitch),
            tempo_estimator: TempoEstimator::new(rhythm),
        }
    }

    /// Extract the six acoustic measurements from a waveform
    pub fn extract(&self, waveform: &Waveform) -> AcousticFeatures {
        let samples = waveform.samples();
        let sample_rate = waveform.sample_rate();

        let contour = self.pitch_tracker.track(samples, sample_rate);
        let (pitch_mean, pitch_std) = temporal::mean_and_std(contour.iter().map(|&f| f as f64));

        let tempo = self.tempo_estimator.estimate_bpm(samples, sample_rate);

        let features = AcousticFeatures {
            pitch_mean,
            pitch_std,
            jitter: temporal::compute_jitter(samples),
            shimmer: temporal::compute_shimmer(samples),
            duration_sec: temporal::compute_duration(samples.len(), sample_rate),
            speech_rate: rhythm::speech_rate_from_bpm(tempo),
        };

        log::debug!(
            "[SignalFeatureExtractor] {} pitch frames, tempo {:.1} BPM: {:?}",
            contour.len(),
            tempo,
            features
        );

        features
    }
}

impl Default for SignalFeatureExtractor {
    fn default() -> Self {
        Self::new(PitchConfig::default(), RhythmConfig::default())
    }
}

/// FeatureAssembler combines both extractors into a [`FeatureVector`]
pub struct FeatureAssembler {
    signal: SignalFeatureExtractor,
    policy: AssemblerConfig,
}

impl FeatureAssembler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            signal: SignalFeatureExtractor::new(config.pitch.clone(), config.rhythm.clone()),
            policy: config.assembler.clone(),
        }
    }

    /// Build the 10-value vector for one recording
    ///
    /// A blank transcript short-circuits to the all-zero vector without
    /// touching the waveform, unless the assembler is configured to retain
    /// acoustic features, in which case the text slots are zero and the
    /// acoustic slots are measured.
    pub fn assemble(&self, waveform: &Waveform, transcript: &Transcript) -> FeatureVector {
        if transcript.is_blank() {
            if !self.policy.retain_acoustic_on_empty_transcript {
                log::debug!("[FeatureAssembler] Blank transcript, using zero vector");
                return FeatureVector::zeros();
            }
            let acoustic = self.signal.extract(waveform);
            return FeatureVector::from_parts(&acoustic, &TextFeatures::default());
        }

        let acoustic = self.signal.extract(waveform);
        let text = text::extract_text_features(transcript.as_str());
        FeatureVector::from_parts(&acoustic, &text)
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
