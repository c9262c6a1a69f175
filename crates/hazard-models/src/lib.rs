//! Hazard Models Library
//!
//! The inference seam of the risk pipeline. A pre-fit classifier is an
//! opaque collaborator behind [`HazardClassifier`]: given a feature vector
//! of the expected fixed length and order, return the positive-class
//! probability. One concrete implementation is provided — an averaged
//! ensemble of binary decision trees deserialized from JSON artifacts —
//! and [`ModelRegistry`] holds one classifier per hazard, loaded once at
//! process start and borrowed read-only for the process lifetime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod forest;
pub mod registry;

pub use forest::{DecisionTree, ForestClassifier, ModelArtifact, TreeNode};
pub use registry::ModelRegistry;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("missing model artifact for {hazard} at {path:?}: {source}")]
    MissingArtifact {
        hazard: Hazard,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed model artifact for {hazard} at {path:?}: {source}")]
    MalformedArtifact {
        hazard: Hazard,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid model for {hazard}: {reason}")]
    InvalidModel { hazard: Hazard, reason: String },
    #[error("feature vector length mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
    #[error("no classifier registered for {0}")]
    NotRegistered(Hazard),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// The four modeled disaster types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Flood,
    Cyclone,
    Fire,
    Earthquake,
}

impl Hazard {
    pub const ALL: [Hazard; 4] = [
        Hazard::Flood,
        Hazard::Cyclone,
        Hazard::Fire,
        Hazard::Earthquake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Flood => "flood",
            Hazard::Cyclone => "cyclone",
            Hazard::Fire => "fire",
            Hazard::Earthquake => "earthquake",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Hazard::Flood => "Flood",
            Hazard::Cyclone => "Cyclone",
            Hazard::Fire => "Forest Fire",
            Hazard::Earthquake => "Earthquake",
        }
    }
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pre-fit binary classifier for one hazard.
///
/// Implementations must not mutate on predict; the registry shares them
/// read-only across requests.
pub trait HazardClassifier: Send + Sync {
    /// Length of the feature vector the model expects.
    fn n_features(&self) -> usize;

    /// Positive-class probability for a feature vector in the model's
    /// fixed feature order. Rejects mismatched lengths with
    /// [`ModelError::ShapeMismatch`].
    fn predict_probability(&self, features: &[f64]) -> Result<f64>;
}
