// Analysis module - recording to risk label pipeline
//
// This module wires the feature assembler to the risk scorer. One analyzer
// instance is read-only after construction and can serve concurrent requests.
//
// Pipeline:
//   Waveform + Transcript → FeatureAssembler → FeatureVector
//                         → AnomalyModel → negate → ScoreScaler → threshold
//                         → RiskLabel

pub mod features;
pub mod onset;

use serde::Serialize;

use crate::audio::Waveform;
use crate::config::AnalysisConfig;
use crate::error::{log_scoring_error, ScoringError};
use crate::scoring::{AnomalyModel, RiskLabel, RiskScorer, ScoreScaler};
use crate::transcript::{Transcriber, Transcript};
use features::{FeatureAssembler, FeatureVector};

/// Full result of scoring one recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub features: FeatureVector,
    pub raw_score: f64,
    pub normalized_score: f64,
    pub label: RiskLabel,
}

/// Transcript plus report, for callers that let the analyzer transcribe
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingAnalysis {
    pub transcript: Transcript,
    pub report: AnalysisReport,
}

/// RiskAnalyzer runs the complete pipeline for one recording at a time
pub struct RiskAnalyzer<M, S> {
    config: AnalysisConfig,
    assembler: FeatureAssembler,
    scorer: RiskScorer<M, S>,
}

impl<M: AnomalyModel, S: ScoreScaler> RiskAnalyzer<M, S> {
    /// Build an analyzer; the decision threshold comes from `config.risk`
    pub fn new(config: AnalysisConfig, model: M, scaler: S) -> Self {
        let assembler = FeatureAssembler::new(&config);
        let scorer = RiskScorer::with_threshold(model, scaler, config.risk.threshold);
        Self {
            config,
            assembler,
            scorer,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Feature vector only, without scoring
    pub fn features(&self, waveform: &Waveform, transcript: &Transcript) -> FeatureVector {
        self.assembler.assemble(waveform, transcript)
    }

    /// Classify one recording
    pub fn analyze(
        &self,
        waveform: &Waveform,
        transcript: &Transcript,
    ) -> Result<RiskLabel, ScoringError> {
        self.assess(waveform, transcript).map(|report| report.label)
    }

    /// Classify one recording and keep every intermediate value
    pub fn assess(
        &self,
        waveform: &Waveform,
        transcript: &Transcript,
    ) -> Result<AnalysisReport, ScoringError> {
        tracing::debug!(
            "[RiskAnalyzer] Assessing {:.2}s at {} Hz, {} transcript chars",
            waveform.duration_secs(),
            waveform.sample_rate(),
            transcript.as_str().len()
        );

        let features = self.assembler.assemble(waveform, transcript);
        let assessment = self.scorer.score(&features).map_err(|err| {
            log_scoring_error(&err, "RiskAnalyzer::assess");
            err
        })?;

        tracing::info!(
            "[RiskAnalyzer] raw={:.4} normalized={:.4} -> {}",
            assessment.raw_score,
            assessment.normalized_score,
            assessment.label
        );

        Ok(AnalysisReport {
            features,
            raw_score: assessment.raw_score,
            normalized_score: assessment.normalized_score,
            label: assessment.label,
        })
    }

    /// Transcribe, then assess
    pub fn analyze_recording(
        &self,
        transcriber: &dyn Transcriber,
        waveform: &Waveform,
    ) -> Result<RecordingAnalysis, ScoringError> {
        let transcript = transcriber.transcribe(waveform).map_err(|err| {
            log_scoring_error(&err, "RiskAnalyzer::analyze_recording");
            err
        })?;
        if transcript.is_blank() {
            tracing::info!("[RiskAnalyzer] No speech recognized");
        }
        let report = self.assess(waveform, &transcript)?;
        Ok(RecordingAnalysis { transcript, report })
    }
}
