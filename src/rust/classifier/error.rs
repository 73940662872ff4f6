use std::fmt;

/// Represents the different types of errors that can occur in the news classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// A model or vectorizer artifact is missing, unreadable, corrupt or of the wrong shape
    ArtifactLoadError(String),
    /// Error occurred while vectorizing text or making predictions
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactLoadError(msg) => write!(f, "Artifact load error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<regex::Error> for ClassifierError {
    fn from(err: regex::Error) -> Self {
        ClassifierError::ArtifactLoadError(format!("Invalid token pattern: {}", err))
    }
}
