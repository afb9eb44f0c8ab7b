// Scaler - pre-fitted single-feature score normalization
//
// Artifacts are tagged JSON objects mirroring the fitted attributes of the
// usual one-column scalers:
//
//   {"kind": "standard", "mean": [m], "scale": [s]}   -> (x - m) / s
//   {"kind": "min_max",  "min":  [b], "scale": [s]}   -> x * s + b
//
// For "standard", a missing mean skips centering and a missing scale skips
// scaling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load_json_artifact, ScoreScaler};
use crate::error::ScoringError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    Standard {
        #[serde(default)]
        mean: Option<Vec<f64>>,
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl FittedScaler {
    /// Load and validate a scaler artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let scaler: FittedScaler = load_json_artifact(path)?;
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn standard(mean: f64, scale: f64) -> Result<Self, ScoringError> {
        let scaler = FittedScaler::Standard {
            mean: Some(vec![mean]),
            scale: Some(vec![scale]),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn min_max(min: f64, scale: f64) -> Result<Self, ScoringError> {
        let scaler = FittedScaler::MinMax {
            min: vec![min],
            scale: vec![scale],
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Every parameter must be a single finite value; scales must be non-zero
    pub fn validate(&self) -> Result<(), ScoringError> {
        match self {
            FittedScaler::Standard { mean, scale } => {
                if let Some(mean) = mean {
                    single_value("mean", mean)?;
                }
                if let Some(scale) = scale {
                    non_zero("scale", single_value("scale", scale)?)?;
                }
            }
            FittedScaler::MinMax { min, scale } => {
                single_value("min", min)?;
                non_zero("scale", single_value("scale", scale)?)?;
            }
        }
        Ok(())
    }

    fn apply(&self, x: f64) -> f64 {
        match self {
            FittedScaler::Standard { mean, scale } => {
                let centered = match mean {
                    Some(mean) => x - mean[0],
                    None => x,
                };
                match scale {
                    Some(scale) => centered / scale[0],
                    None => centered,
                }
            }
            FittedScaler::MinMax { min, scale } => x * scale[0] + min[0],
        }
    }
}

impl ScoreScaler for FittedScaler {
    fn transform(&self, raw_score: f64) -> Result<f64, ScoringError> {
        if !raw_score.is_finite() {
            return Err(ScoringError::ScalerFailure {
                reason: format!("raw score {} is not finite", raw_score),
            });
        }

        // validate() already ran for loaded scalers; deserialized-in-place
        // values still need the shape check before indexing
        self.validate()
            .map_err(|err| ScoringError::ScalerFailure {
                reason: err.to_string(),
            })?;

        Ok(self.apply(raw_score))
    }
}

fn invalid(reason: String) -> ScoringError {
    ScoringError::ArtifactInvalid {
        artifact: "scaler".to_string(),
        reason,
    }
}

fn single_value(name: &str, values: &[f64]) -> Result<f64, ScoringError> {
    match values {
        [value] if value.is_finite() => Ok(*value),
        [value] => Err(invalid(format!("{} {} is not finite", name, value))),
        _ => Err(invalid(format!(
            "{} must hold exactly 1 value, got {}",
            name,
            values.len()
        ))),
    }
}

fn non_zero(name: &str, value: f64) -> Result<f64, ScoringError> {
    if value == 0.0 {
        return Err(invalid(format!("{} must be non-zero", name)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_transform() {
        let scaler = FittedScaler::standard(0.1, 0.05).unwrap();
        let normalized = scaler.transform(0.2).unwrap();
        assert!((normalized - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = FittedScaler::min_max(1.0, 4.0).unwrap();
        assert_eq!(scaler.transform(0.5).unwrap(), 3.0);
    }

    #[test]
    fn test_standard_without_parameters_is_identity() {
        let scaler: FittedScaler = serde_json::from_str(r#"{"kind": "standard"}"#).unwrap();
        assert_eq!(scaler.transform(-0.7).unwrap(), -0.7);
    }

    #[test]
    fn test_parses_tagged_json() {
        let scaler: FittedScaler =
            serde_json::from_str(r#"{"kind": "min_max", "min": [0.5], "scale": [2.0]}"#).unwrap();
        assert_eq!(
            scaler,
            FittedScaler::MinMax {
                min: vec![0.5],
                scale: vec![2.0]
            }
        );
        assert!(serde_json::from_str::<FittedScaler>(r#"{"kind": "robust"}"#).is_err());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            FittedScaler::standard(0.0, 0.0),
            Err(ScoringError::ArtifactInvalid { .. })
        ));
        assert!(FittedScaler::min_max(f64::NAN, 1.0).is_err());

        let two_columns = FittedScaler::Standard {
            mean: Some(vec![0.0, 1.0]),
            scale: Some(vec![1.0, 1.0]),
        };
        assert!(two_columns.validate().is_err());
        assert!(matches!(
            two_columns.transform(1.0),
            Err(ScoringError::ScalerFailure { .. })
        ));
    }

    #[test]
    fn test_non_finite_score_is_scaler_failure() {
        let scaler = FittedScaler::standard(0.0, 1.0).unwrap();
        assert!(matches!(
            scaler.transform(f64::NAN),
            Err(ScoringError::ScalerFailure { .. })
        ));
        assert!(scaler.transform(f64::INFINITY).is_err());
    }
}
