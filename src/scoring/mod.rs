// Scoring - anomaly score to risk label
//
// The anomaly model and the score scaler are external collaborators injected
// into the scorer. The scorer owns the two conventions that must not drift
// when either collaborator is swapped:
//
// 1. Sign: the model's native decision value is lower for more anomalous
//    input. The scorer negates it so larger = more anomalous.
// 2. Threshold: normalized < threshold is LowRisk, everything else
//    (including the threshold itself) is HighRisk.

mod artifact;
pub mod isolation_forest;
pub mod scaler;

pub use artifact::load_json_artifact;
pub use isolation_forest::IsolationForest;
pub use scaler::FittedScaler;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::features::FeatureVector;
use crate::config::DEFAULT_RISK_THRESHOLD;
use crate::error::ScoringError;

/// Pre-trained unsupervised anomaly model
///
/// Must be read-only during scoring so one instance can serve concurrent
/// requests.
pub trait AnomalyModel: Send + Sync {
    /// Raw decision value; lower (more negative) means more anomalous
    fn decision_function(&self, features: &FeatureVector) -> Result<f64, ScoringError>;
}

/// Pre-fitted single-feature scaler
pub trait ScoreScaler: Send + Sync {
    fn transform(&self, raw_score: f64) -> Result<f64, ScoringError>;
}

impl<F> AnomalyModel for F
where
    F: Fn(&FeatureVector) -> Result<f64, ScoringError> + Send + Sync,
{
    fn decision_function(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        self(features)
    }
}

impl<F> ScoreScaler for F
where
    F: Fn(f64) -> Result<f64, ScoringError> + Send + Sync,
{
    fn transform(&self, raw_score: f64) -> Result<f64, ScoringError> {
        self(raw_score)
    }
}

/// Binary risk category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl RiskLabel {
    /// Strict `<` for LowRisk; NaN compares false and lands in HighRisk
    pub fn from_normalized(normalized_score: f64, threshold: f64) -> Self {
        if normalized_score < threshold {
            RiskLabel::LowRisk
        } else {
            RiskLabel::HighRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::HighRisk => "High Risk",
        }
    }

    /// Presentation style key
    pub fn style_class(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "low-risk",
            RiskLabel::HighRisk => "high-risk",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the scorer computed for one vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Negated model decision value (larger = more anomalous)
    pub raw_score: f64,
    /// Scaler output compared against the threshold
    pub normalized_score: f64,
    pub label: RiskLabel,
}

/// RiskScorer maps feature vectors to risk labels
pub struct RiskScorer<M, S> {
    model: M,
    scaler: S,
    threshold: f64,
}

impl<M: AnomalyModel, S: ScoreScaler> RiskScorer<M, S> {
    /// Scorer with the default calibration threshold
    pub fn new(model: M, scaler: S) -> Self {
        Self::with_threshold(model, scaler, DEFAULT_RISK_THRESHOLD)
    }

    pub fn with_threshold(model: M, scaler: S, threshold: f64) -> Self {
        Self {
            model,
            scaler,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Run model, sign inversion, scaler and threshold
    ///
    /// Collaborator failures are returned as-is; no label is guessed.
    pub fn score(&self, features: &FeatureVector) -> Result<RiskAssessment, ScoringError> {
        let decision = self.model.decision_function(features)?;
        let raw_score = -decision;
        let normalized_score = self.scaler.transform(raw_score)?;
        let label = RiskLabel::from_normalized(normalized_score, self.threshold);

        log::debug!(
            "[RiskScorer] decision={:.6} raw={:.6} normalized={:.6} threshold={} -> {}",
            decision,
            raw_score,
            normalized_score,
            self.threshold,
            label
        );

        Ok(RiskAssessment {
            raw_score,
            normalized_score,
            label,
        })
    }

    /// Score an untyped slice, raising ShapeViolation unless it has 10 values
    pub fn score_values(&self, values: &[f64]) -> Result<RiskAssessment, ScoringError> {
        let features = FeatureVector::from_slice(values)?;
        self.score(&features)
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<RiskLabel, ScoringError> {
        self.score(features).map(|assessment| assessment.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn constant_model(decision: f64) -> impl AnomalyModel {
        move |_: &FeatureVector| -> Result<f64, ScoringError> { Ok(decision) }
    }

    fn identity_scaler() -> impl ScoreScaler {
        |raw: f64| -> Result<f64, ScoringError> { Ok(raw) }
    }

    #[test]
    fn test_threshold_boundary_is_high_risk() {
        assert_eq!(RiskLabel::from_normalized(2.3, 2.3), RiskLabel::HighRisk);
        assert_eq!(
            RiskLabel::from_normalized(2.299_999, 2.3),
            RiskLabel::LowRisk
        );
        assert_eq!(RiskLabel::from_normalized(f64::NAN, 2.3), RiskLabel::HighRisk);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let scores = [-5.0, 0.0, 1.0, 2.29, 2.3, 2.31, 10.0];
        let labels: Vec<RiskLabel> = scores
            .iter()
            .map(|&s| RiskLabel::from_normalized(s, DEFAULT_RISK_THRESHOLD))
            .collect();

        let first_high = labels
            .iter()
            .position(|&l| l == RiskLabel::HighRisk)
            .unwrap();
        assert!(labels[..first_high].iter().all(|&l| l == RiskLabel::LowRisk));
        assert!(labels[first_high..].iter().all(|&l| l == RiskLabel::HighRisk));
    }

    #[test]
    fn test_decision_value_is_negated() {
        // Model says -3.0 (very anomalous); raw score must be +3.0
        let scorer = RiskScorer::new(constant_model(-3.0), identity_scaler());
        let assessment = scorer.score(&FeatureVector::zeros()).unwrap();

        assert_eq!(assessment.raw_score, 3.0);
        assert_eq!(assessment.normalized_score, 3.0);
        assert_eq!(assessment.label, RiskLabel::HighRisk);

        let scorer = RiskScorer::new(constant_model(3.0), identity_scaler());
        assert_eq!(
            scorer.classify(&FeatureVector::zeros()).unwrap(),
            RiskLabel::LowRisk
        );
    }

    #[test]
    fn test_scaler_receives_negated_score() {
        let scorer = RiskScorer::new(constant_model(0.25), |raw: f64| -> Result<f64, ScoringError> {
            assert_eq!(raw, -0.25);
            Ok(raw * 10.0 + 5.0)
        });
        let assessment = scorer.score(&FeatureVector::zeros()).unwrap();
        assert_eq!(assessment.normalized_score, 2.5);
        assert_eq!(assessment.label, RiskLabel::HighRisk);
    }

    #[test]
    fn test_threshold_is_overridable() {
        let scorer = RiskScorer::with_threshold(constant_model(-1.0), identity_scaler(), 0.5);
        assert_eq!(scorer.threshold(), 0.5);
        assert_eq!(
            scorer.classify(&FeatureVector::zeros()).unwrap(),
            RiskLabel::HighRisk
        );
    }

    #[test]
    fn test_model_failure_propagates_without_scaling() {
        let scaler_calls = AtomicUsize::new(0);
        let failing = |_: &FeatureVector| -> Result<f64, ScoringError> {
            Err(ScoringError::ModelFailure {
                reason: "unavailable".to_string(),
            })
        };
        let counting = |raw: f64| -> Result<f64, ScoringError> {
            scaler_calls.fetch_add(1, Ordering::SeqCst);
            Ok(raw)
        };

        let scorer = RiskScorer::new(failing, counting);
        let result = scorer.score(&FeatureVector::zeros());

        assert!(matches!(result, Err(ScoringError::ModelFailure { .. })));
        assert_eq!(scaler_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scaler_failure_propagates() {
        let scorer = RiskScorer::new(constant_model(0.0), |_: f64| -> Result<f64, ScoringError> {
            Err(ScoringError::ScalerFailure {
                reason: "not fitted".to_string(),
            })
        });
        assert!(matches!(
            scorer.classify(&FeatureVector::zeros()),
            Err(ScoringError::ScalerFailure { .. })
        ));
    }

    #[test]
    fn test_score_values_checks_shape() {
        let scorer = RiskScorer::new(constant_model(1.0), identity_scaler());

        assert_eq!(
            scorer.score_values(&[0.0; 7]),
            Err(ScoringError::ShapeViolation {
                expected: 10,
                actual: 7
            })
        );
        assert!(scorer.score_values(&[0.0; 10]).is_ok());
    }

    #[test]
    fn test_label_presentation() {
        assert_eq!(RiskLabel::LowRisk.to_string(), "Low Risk");
        assert_eq!(RiskLabel::HighRisk.style_class(), "high-risk");
        assert_eq!(
            serde_json::to_string(&RiskLabel::HighRisk).unwrap(),
            "\"High Risk\""
        );
    }
}
