// Artifact loading helpers shared by the model and scaler evaluators

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ScoringError;

/// Read and deserialize a JSON model artifact
///
/// Unlike configuration, artifacts have no defaults: any read or parse
/// failure is returned to the caller.
pub fn load_json_artifact<T, P>(path: P) -> Result<T, ScoringError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let unreadable = |reason: String| ScoringError::ArtifactUnreadable {
        path: path.display().to_string(),
        reason,
    };

    let contents = fs::read_to_string(path).map_err(|err| unreadable(err.to_string()))?;
    let artifact = serde_json::from_str(&contents).map_err(|err| unreadable(err.to_string()))?;

    log::info!("[Artifact] Loaded {:?}", path);
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_is_unreadable() {
        let result: Result<serde_json::Value, _> =
            load_json_artifact("/nonexistent/speech_risk/model.json");
        assert!(matches!(
            result,
            Err(ScoringError::ArtifactUnreadable { .. })
        ));
    }

    #[test]
    fn test_malformed_artifact_is_unreadable() {
        let path = std::env::temp_dir().join(format!(
            "speech_risk_bad_artifact_{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();

        let result: Result<serde_json::Value, _> = load_json_artifact(&path);
        match result {
            Err(ScoringError::ArtifactUnreadable { path: p, .. }) => {
                assert!(p.contains("speech_risk_bad_artifact"));
            }
            other => panic!("Expected ArtifactUnreadable, got {:?}", other),
        }

        fs::remove_file(path).ok();
    }
}
