use std::net::SocketAddr;
use std::path::PathBuf;

use crate::classifier::Preprocessing;

pub const DEFAULT_MODEL_PATH: &str = "logistic_model.json";
pub const DEFAULT_VECTORIZER_PATH: &str = "vectorizer.json";
pub const DEFAULT_HISTORY_PATH: &str = "history.json";
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SHA-256 digest for {artifact}: expected 64 hex characters, got {value:?}")]
    InvalidChecksum { artifact: String, value: String },
    #[error("History limit must be at least 1")]
    InvalidHistoryLimit,
}

/// Runtime configuration shared by every surface of the application
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the classifier artifact
    pub model_path: PathBuf,
    /// Path to the vectorizer artifact
    pub vectorizer_path: PathBuf,
    /// Expected SHA-256 of the classifier artifact, verified at load when set
    pub model_sha256: Option<String>,
    /// Expected SHA-256 of the vectorizer artifact, verified at load when set
    pub vectorizer_sha256: Option<String>,
    /// Path to the JSON history file
    pub history_path: PathBuf,
    /// Number of records shown in the history panel
    pub history_limit: usize,
    pub preprocessing: Preprocessing,
    /// Show the raw class and model classes next to the verdict
    pub diagnostics: bool,
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            vectorizer_path: PathBuf::from(DEFAULT_VECTORIZER_PATH),
            model_sha256: None,
            vectorizer_sha256: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            history_limit: DEFAULT_HISTORY_LIMIT,
            preprocessing: Preprocessing::default(),
            diagnostics: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

impl AppConfig {
    /// Checks values that cannot be expressed in the field types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidHistoryLimit);
        }
        for (artifact, digest) in [("model", &self.model_sha256), ("vectorizer", &self.vectorizer_sha256)] {
            if let Some(value) = digest {
                if value.len() != 64 || !value.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(ConfigError::InvalidChecksum {
                        artifact: artifact.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
