//! Configuration management for analysis parameters
//!
//! This module provides runtime configuration loading from JSON files so the
//! pitch tracker, tempo estimator and decision threshold can be tuned without
//! recompilation. Defaults match the extraction the bundled models were fitted on.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default decision threshold on the normalized anomaly score
pub const DEFAULT_RISK_THRESHOLD: f64 = 2.3;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub pitch: PitchConfig,
    pub rhythm: RhythmConfig,
    pub risk: RiskConfig,
    pub assembler: AssemblerConfig,
}

/// YIN pitch tracker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Lowest admissible fundamental frequency in Hz
    pub fmin: f32,
    /// Highest admissible fundamental frequency in Hz
    pub fmax: f32,
    /// Analysis frame length in samples
    pub frame_length: usize,
    /// Hop between frame starts in samples
    pub hop_length: usize,
    /// Cumulative-mean-normalized difference below which a trough is accepted
    pub trough_threshold: f32,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            fmin: 50.0,
            fmax: 500.0,
            frame_length: 2048,
            hop_length: 512,
            trough_threshold: 0.1,
        }
    }
}

/// Onset envelope and tempo estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    /// STFT window size in samples
    pub window_size: usize,
    /// STFT hop size in samples
    pub hop_size: usize,
    /// Center of the log-normal tempo prior
    pub start_bpm: f32,
    /// Width of the tempo prior in octaves
    pub std_bpm: f32,
    /// Longest autocorrelation lag considered, in seconds
    pub max_lag_seconds: f32,
    /// Lower bound of the tempo search range
    pub min_bpm: f32,
    /// Upper bound of the tempo search range
    pub max_bpm: f32,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            hop_size: 512,
            start_bpm: 120.0,
            std_bpm: 1.0,
            max_lag_seconds: 8.0,
            min_bpm: 30.0,
            max_bpm: 320.0,
        }
    }
}

/// Decision boundary configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Normalized scores strictly below this value are low risk
    pub threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RISK_THRESHOLD,
        }
    }
}

/// Feature vector assembly policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Compute acoustic features even when the transcript is blank.
    ///
    /// Off by default: a blank transcript yields the all-zero vector.
    pub retain_acoustic_on_empty_transcript: bool,
}

impl AnalysisConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file cannot be
    /// read or parsed. Missing sections and fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Same configuration with a different decision threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.risk.threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.pitch.fmin, 50.0);
        assert_eq!(config.pitch.fmax, 500.0);
        assert_eq!(config.pitch.hop_length, config.pitch.frame_length / 4);
        assert_eq!(config.rhythm.start_bpm, 120.0);
        assert_eq!(config.risk.threshold, 2.3);
        assert!(!config.assembler.retain_acoustic_on_empty_transcript);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AnalysisConfig::default().with_threshold(1.5);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AnalysisConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.risk.threshold, 1.5);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AnalysisConfig =
            serde_json::from_str(r#"{ "risk": { "threshold": 3.0 } }"#).unwrap();

        assert_eq!(parsed.risk.threshold, 3.0);
        assert_eq!(parsed.pitch, PitchConfig::default());
        assert_eq!(parsed.rhythm, RhythmConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AnalysisConfig::load_from_file("/nonexistent/speech_risk/config.json");
        assert_eq!(config, AnalysisConfig::default());
    }
}
