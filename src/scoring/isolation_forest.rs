//! Isolation forest evaluator
//!
//! Evaluates a pre-trained isolation forest exported as JSON. Each tree is
//! stored as parallel node arrays (the fitted tree attributes): for node `i`,
//! `children_left[i] == -1` marks a leaf; otherwise samples with
//! `x[feature[i]] <= threshold[i]` go left.
//!
//! Scoring follows Liu, Ting & Zhou (2008):
//!
//! - path length h(x) = edges from root to leaf + c(n_leaf)
//! - c(n) = 2 H(n - 1) - 2 (n - 1) / n, with c(1) = 0 and c(2) = 1
//! - score_samples(x) = -2^(-mean h(x) / c(max_samples))
//! - decision_function(x) = score_samples(x) - offset
//!
//! so negative decision values mark outliers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{load_json_artifact, AnomalyModel};
use crate::analysis::features::{FeatureVector, FEATURE_COUNT};
use crate::error::ScoringError;

const TREE_LEAF: i64 = -1;
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// One exported isolation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub n_node_samples: Vec<u64>,
    /// Column subset this tree was trained on; `feature` indexes into it
    #[serde(default)]
    pub features: Option<Vec<usize>>,
}

/// Exported forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForestArtifact {
    pub n_features: usize,
    pub max_samples: usize,
    #[serde(default = "default_offset")]
    pub offset: f64,
    pub trees: Vec<IsolationTreeArtifact>,
}

fn default_offset() -> f64 {
    -0.5
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        samples: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    /// Edges walked to the leaf plus the expected depth of the unsplit leaf
    fn path_length(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        let mut depth = 0usize;

        loop {
            match self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Trees were fitted on f32 inputs
                    let value = x[feature] as f32 as f64;
                    idx = if value <= threshold { left } else { right };
                    depth += 1;
                }
                Node::Leaf { samples } => return depth as f64 + average_path_length(samples),
            }
        }
    }
}

/// Validated, ready-to-score isolation forest
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationForest {
    n_features: usize,
    max_samples: usize,
    offset: f64,
    trees: Vec<IsolationTree>,
}

impl IsolationForest {
    /// Load and validate a forest from a JSON artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let artifact: IsolationForestArtifact = load_json_artifact(path)?;
        Self::try_from(artifact)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Anomaly score in [-1, 0); closer to -1 is more anomalous
    pub fn score_samples(&self, x: &[f64]) -> Result<f64, ScoringError> {
        if x.len() != self.n_features {
            return Err(ScoringError::ShapeViolation {
                expected: self.n_features,
                actual: x.len(),
            });
        }

        let total: f64 = self.trees.iter().map(|tree| tree.path_length(x)).sum();
        let mean_depth = total / self.trees.len() as f64;
        let denominator = average_path_length(self.max_samples as u64);
        // Depth ratio is taken as 1 when c(max_samples) is 0
        if denominator == 0.0 {
            return Ok(-0.5);
        }

        Ok(-(2f64.powf(-mean_depth / denominator)))
    }
}

impl AnomalyModel for IsolationForest {
    fn decision_function(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        Ok(self.score_samples(features.as_slice())? - self.offset)
    }
}

impl TryFrom<IsolationForestArtifact> for IsolationForest {
    type Error = ScoringError;

    fn try_from(artifact: IsolationForestArtifact) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ScoringError::ArtifactInvalid {
            artifact: "isolation forest".to_string(),
            reason,
        };

        if artifact.n_features != FEATURE_COUNT {
            return Err(invalid(format!(
                "n_features is {}, expected {}",
                artifact.n_features, FEATURE_COUNT
            )));
        }
        if artifact.trees.is_empty() {
            return Err(invalid("forest has no trees".to_string()));
        }
        if artifact.max_samples == 0 {
            return Err(invalid("max_samples must be at least 1".to_string()));
        }
        if !artifact.offset.is_finite() {
            return Err(invalid(format!("offset {} is not finite", artifact.offset)));
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, tree)| {
                build_tree(tree, artifact.n_features)
                    .map_err(|reason| invalid(format!("tree {}: {}", i, reason)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            n_features: artifact.n_features,
            max_samples: artifact.max_samples,
            offset: artifact.offset,
            trees,
        })
    }
}

fn build_tree(tree: &IsolationTreeArtifact, n_features: usize) -> Result<IsolationTree, String> {
    let n = tree.children_left.len();
    if n == 0 {
        return Err("tree has no nodes".to_string());
    }
    if [
        tree.children_right.len(),
        tree.feature.len(),
        tree.threshold.len(),
        tree.n_node_samples.len(),
    ]
    .iter()
    .any(|&len| len != n)
    {
        return Err("node arrays differ in length".to_string());
    }
    if let Some(subset) = &tree.features {
        if let Some(&bad) = subset.iter().find(|&&f| f >= n_features) {
            return Err(format!("feature subset index {} out of range", bad));
        }
    }

    let column = |raw: i64| -> Result<usize, String> {
        let local = usize::try_from(raw).map_err(|_| format!("negative feature {}", raw))?;
        let global = match &tree.features {
            Some(subset) => *subset
                .get(local)
                .ok_or_else(|| format!("feature {} outside subset", local))?,
            None => local,
        };
        if global >= n_features {
            return Err(format!("feature {} out of range", global));
        }
        Ok(global)
    };

    // Children must point forward so every walk terminates
    let child = |node: usize, raw: i64| -> Result<usize, String> {
        usize::try_from(raw)
            .ok()
            .filter(|&c| c > node && c < n)
            .ok_or_else(|| format!("node {} has invalid child {}", node, raw))
    };

    let nodes = (0..n)
        .map(|i| {
            let left = tree.children_left[i];
            let right = tree.children_right[i];
            match (left == TREE_LEAF, right == TREE_LEAF) {
                (true, true) => Ok(Node::Leaf {
                    samples: tree.n_node_samples[i],
                }),
                (false, false) => Ok(Node::Split {
                    feature: column(tree.feature[i])?,
                    threshold: tree.threshold[i],
                    left: child(i, left)?,
                    right: child(i, right)?,
                }),
                _ => Err(format!("node {} has exactly one child", i)),
            }
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(IsolationTree { nodes })
}

/// c(n): average path length of an unsuccessful BST search over n points
pub fn average_path_length(n: u64) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}
