//! Model registry
//!
//! One classifier per hazard, loaded from `<dir>/<hazard>_model.json` once
//! at process start. The registry is immutable after construction and is
//! passed by reference into each request's pipeline invocation; it is
//! never re-loaded or mutated per request.

use crate::{ForestClassifier, Hazard, HazardClassifier, ModelArtifact, ModelError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ModelRegistry {
    models: HashMap<Hazard, Box<dyn HazardClassifier>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.models.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ModelRegistry {
    /// Artifact file name for a hazard.
    pub fn artifact_file(hazard: Hazard) -> String {
        format!("{hazard}_model.json")
    }

    /// Load all four hazard models from a directory.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading model artifacts from {:?}", dir);

        let mut models: HashMap<Hazard, Box<dyn HazardClassifier>> = HashMap::new();
        for hazard in Hazard::ALL {
            let path = dir.join(Self::artifact_file(hazard));
            let forest = load_artifact(hazard, &path)?;
            info!(
                "Loaded {} model: {} features, {} trees",
                hazard,
                forest.feature_names().len(),
                forest.n_trees()
            );
            models.insert(hazard, Box::new(forest));
        }

        Ok(Self { models })
    }

    /// Build a registry from pre-constructed classifiers.
    pub fn from_classifiers(
        classifiers: impl IntoIterator<Item = (Hazard, Box<dyn HazardClassifier>)>,
    ) -> Self {
        Self {
            models: classifiers.into_iter().collect(),
        }
    }

    pub fn get(&self, hazard: Hazard) -> Result<&dyn HazardClassifier> {
        self.models
            .get(&hazard)
            .map(|m| m.as_ref())
            .ok_or(ModelError::NotRegistered(hazard))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn hazards(&self) -> impl Iterator<Item = Hazard> + '_ {
        self.models.keys().copied()
    }
}

fn load_artifact(hazard: Hazard, path: &Path) -> Result<ForestClassifier> {
    let file = File::open(path).map_err(|source| ModelError::MissingArtifact {
        hazard,
        path: PathBuf::from(path),
        source,
    })?;
    let reader = BufReader::new(file);
    let artifact: ModelArtifact =
        serde_json::from_reader(reader).map_err(|source| ModelError::MalformedArtifact {
            hazard,
            path: PathBuf::from(path),
            source,
        })?;

    if artifact.hazard != hazard {
        return Err(ModelError::InvalidModel {
            hazard,
            reason: format!("artifact at {path:?} is for {}", artifact.hazard),
        });
    }

    ForestClassifier::from_artifact(artifact)
}
