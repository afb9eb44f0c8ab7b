// Types module - Data structures for recording features
//
// This module defines the measurements produced by the signal and text
// extractors and the fixed-layout vector handed to the anomaly model.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Number of values in a [`FeatureVector`]
pub const FEATURE_COUNT: usize = 10;

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "pitch_mean",
    "jitter",
    "word_count",
    "sentence_count",
    "duration_sec",
    "pitch_std",
    "speech_rate",
    "avg_words_per_sentence",
    "hesitation_count",
    "shimmer",
];

/// Measurements taken directly from the waveform
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Mean fundamental frequency over all pitch frames, in Hz
    pub pitch_mean: f64,

    /// Standard deviation of the fundamental frequency, in Hz
    pub pitch_std: f64,

    /// Mean absolute first difference of the samples
    ///
    /// A sample-level stand-in for cycle-to-cycle pitch perturbation.
    pub jitter: f64,

    /// Standard deviation of the raw samples
    ///
    /// A sample-level stand-in for cycle-to-cycle amplitude perturbation.
    pub shimmer: f64,

    /// Recording length in seconds
    pub duration_sec: f64,

    /// Rhythmic event rate in events per second (tempo / 60)
    pub speech_rate: f64,
}

/// Statistics derived from the transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_words_per_sentence: f64,
    pub hesitation_count: usize,
}

/// Fixed-order input to the anomaly model
///
/// Always exactly [`FEATURE_COUNT`] values; missing signal is 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn zeros() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Lay out acoustic and text measurements in model order
    pub fn from_parts(acoustic: &AcousticFeatures, text: &TextFeatures) -> Self {
        Self {
            values: [
                acoustic.pitch_mean,
                acoustic.jitter,
                text.word_count as f64,
                text.sentence_count as f64,
                acoustic.duration_sec,
                acoustic.pitch_std,
                acoustic.speech_rate,
                text.avg_words_per_sentence,
                text.hesitation_count as f64,
                acoustic.shimmer,
            ],
        }
    }

    /// Build from an arbitrary slice, rejecting any other length
    pub fn from_slice(values: &[f64]) -> Result<Self, ScoringError> {
        let values: [f64; FEATURE_COUNT] =
            values
                .try_into()
                .map_err(|_| ScoringError::ShapeViolation {
                    expected: FEATURE_COUNT,
                    actual: values.len(),
                })?;
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// (name, value) pairs in vector order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = ScoringError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

/// Serialized as an ordered name -> value map
impl Serialize for FeatureVector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.named() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
