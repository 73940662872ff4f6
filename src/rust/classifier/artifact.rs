use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{error, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ClassifierError;
use super::model::{LogisticRegression, LogisticRegressionArtifact, ProbabilisticClassifier};
use super::vectorizer::{TextVectorizer, TfidfArtifact, TfidfVectorizer};

/// On-disk classifier artifact, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegressionArtifact),
}

/// On-disk vectorizer artifact, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorizerArtifact {
    Tfidf(TfidfArtifact),
}

impl ModelArtifact {
    pub fn into_classifier(self) -> Result<Arc<dyn ProbabilisticClassifier>, ClassifierError> {
        match self {
            Self::LogisticRegression(artifact) => {
                Ok(Arc::new(LogisticRegression::from_artifact(artifact)?))
            }
        }
    }
}

impl VectorizerArtifact {
    pub fn into_vectorizer(self) -> Result<Arc<dyn TextVectorizer>, ClassifierError> {
        match self {
            Self::Tfidf(artifact) => Ok(Arc::new(TfidfVectorizer::from_artifact(artifact)?)),
        }
    }
}

/// Lowercase hex SHA-256 digest of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Reads an artifact file, optionally verifying its SHA-256 digest.
fn read_verified(path: &Path, expected_hash: Option<&str>, file_type: &str) -> Result<Vec<u8>, ClassifierError> {
    if !path.exists() {
        return Err(ClassifierError::ArtifactLoadError(format!(
            "{} file not found: {}",
            file_type,
            path.display()
        )));
    }

    let bytes = fs::read(path).map_err(|e| {
        error!("Failed to read {} file {:?}: {}", file_type, path, e);
        ClassifierError::ArtifactLoadError(format!("Failed to read {} file: {}", file_type, e))
    })?;
    info!("Read {} bytes from {:?}", bytes.len(), path);

    if let Some(expected) = expected_hash {
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            error!("{} hash mismatch: expected {}, got {}", file_type, expected, actual);
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Hash mismatch for {} file: expected {}, got {}",
                file_type, expected, actual
            )));
        }
        info!("{} file hash verified", file_type);
    }

    Ok(bytes)
}

/// Loads a classifier artifact from a JSON file.
///
/// # Errors
/// - `ArtifactLoadError` if the file is missing or unreadable
/// - `ArtifactLoadError` if `expected_hash` is given and does not match
/// - `ArtifactLoadError` if the content is not a valid classifier artifact
pub fn load_model_file(
    path: &Path,
    expected_hash: Option<&str>,
) -> Result<Arc<dyn ProbabilisticClassifier>, ClassifierError> {
    let bytes = read_verified(path, expected_hash, "model")?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|e| {
        ClassifierError::ArtifactLoadError(format!("Invalid model artifact {}: {}", path.display(), e))
    })?;
    artifact.into_classifier()
}

/// Loads a vectorizer artifact from a JSON file.
///
/// # Errors
/// Same conditions as [`load_model_file`], for the vectorizer.
pub fn load_vectorizer_file(
    path: &Path,
    expected_hash: Option<&str>,
) -> Result<Arc<dyn TextVectorizer>, ClassifierError> {
    let bytes = read_verified(path, expected_hash, "vectorizer")?;
    let artifact: VectorizerArtifact = serde_json::from_slice(&bytes).map_err(|e| {
        ClassifierError::ArtifactLoadError(format!(
            "Invalid vectorizer artifact {}: {}",
            path.display(),
            e
        ))
    })?;
    artifact.into_vectorizer()
}
