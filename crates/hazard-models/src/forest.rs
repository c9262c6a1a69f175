//! Decision-forest classifier
//!
//! An exported ensemble of binary decision trees: split nodes route on
//! `feature < threshold`, leaves carry the positive-class fraction, and
//! the forest probability is the mean over trees. Artifacts are validated
//! at load time (forward-only child indices, in-range feature indices) so
//! scoring never indexes out of bounds.

use crate::{Hazard, HazardClassifier, ModelError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probability: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Score a feature vector. Assumes the tree passed validation.
    fn score(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { probability } => return *probability,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Serialized form of a fitted forest: the feature schema plus the trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub hazard: Hazard,
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

/// A validated, immutable decision forest for one hazard.
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    hazard: Hazard,
    feature_names: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let hazard = artifact.hazard;
        let n_features = artifact.feature_names.len();

        if n_features == 0 {
            return Err(ModelError::InvalidModel {
                hazard,
                reason: "empty feature schema".to_string(),
            });
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::InvalidModel {
                hazard,
                reason: "empty ensemble".to_string(),
            });
        }

        for (t, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::InvalidModel {
                    hazard,
                    reason: format!("tree {t} has no nodes"),
                });
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { probability } => {
                        if !(0.0..=1.0).contains(probability) {
                            return Err(ModelError::InvalidModel {
                                hazard,
                                reason: format!("tree {t} node {i}: leaf probability {probability} outside [0,1]"),
                            });
                        }
                    }
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= n_features {
                            return Err(ModelError::InvalidModel {
                                hazard,
                                reason: format!("tree {t} node {i}: feature index {feature} out of range"),
                            });
                        }
                        // Children must point forward, which also rules out cycles.
                        if *left <= i || *right <= i || *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(ModelError::InvalidModel {
                                hazard,
                                reason: format!("tree {t} node {i}: invalid child indices {left}/{right}"),
                            });
                        }
                    }
                }
            }
        }

        Ok(Self {
            hazard,
            feature_names: artifact.feature_names,
            trees: artifact.trees,
        })
    }

    pub fn hazard(&self) -> Hazard {
        self.hazard
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl HazardClassifier for ForestClassifier {
    fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features() {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features(),
                got: features.len(),
            });
        }

        let sum: f64 = self.trees.iter().map(|t| t.score(features)).sum();
        Ok((sum / self.trees.len() as f64).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { probability: low },
                TreeNode::Leaf { probability: high },
            ],
        }
    }

    fn artifact(trees: Vec<DecisionTree>) -> ModelArtifact {
        ModelArtifact {
            hazard: Hazard::Flood,
            feature_names: vec!["a".to_string(), "b".to_string()],
            trees,
        }
    }

    #[test]
    fn test_stump_routing() {
        let forest = ForestClassifier::from_artifact(artifact(vec![stump(0, 5.0, 0.2, 0.8)])).unwrap();

        assert_eq!(forest.predict_probability(&[1.0, 0.0]).unwrap(), 0.2);
        assert_eq!(forest.predict_probability(&[9.0, 0.0]).unwrap(), 0.8);
        // Split is strict less-than; the threshold itself goes right
        assert_eq!(forest.predict_probability(&[5.0, 0.0]).unwrap(), 0.8);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = ForestClassifier::from_artifact(artifact(vec![
            stump(0, 5.0, 0.2, 0.8),
            stump(1, 5.0, 0.4, 0.6),
        ]))
        .unwrap();

        let p = forest.predict_probability(&[1.0, 9.0]).unwrap();
        assert!((p - 0.4).abs() < 1e-9, "mean of 0.2 and 0.6: {p}");
    }

    #[test]
    fn test_shape_mismatch() {
        let forest = ForestClassifier::from_artifact(artifact(vec![stump(0, 5.0, 0.2, 0.8)])).unwrap();

        let err = forest.predict_probability(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ShapeMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_rejects_empty_ensemble() {
        let err = ForestClassifier::from_artifact(artifact(vec![])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_feature() {
        let err = ForestClassifier::from_artifact(artifact(vec![stump(7, 5.0, 0.2, 0.8)])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel { .. }));
    }

    #[test]
    fn test_rejects_backward_child_index() {
        let tree = DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 5.0,
                    left: 0, // points at itself
                    right: 1,
                },
                TreeNode::Leaf { probability: 0.5 },
            ],
        };
        let err = ForestClassifier::from_artifact(artifact(vec![tree])).unwrap_err();
        assert!(matches!(err, ModelError::InvalidModel { .. }));
    }

    #[test]
    fn test_artifact_json_round_trip() {
        let art = artifact(vec![stump(0, 5.0, 0.2, 0.8)]);
        let json = serde_json::to_string(&art).unwrap();
        let back: ModelArtifact = serde_json::from_str(&json).unwrap();
        let forest = ForestClassifier::from_artifact(back).unwrap();
        assert_eq!(forest.predict_probability(&[1.0, 0.0]).unwrap(), 0.2);
    }
}
