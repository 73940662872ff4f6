use std::fmt;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::sigmoid;
use super::Features;

/// A fitted classifier that yields a class id and per-class probabilities.
///
/// Probabilities are indexed by [`classes`](Self::classes) order.
pub trait ProbabilisticClassifier: Send + Sync + fmt::Debug {
    /// Class ids in the order used by [`predict_proba`](Self::predict_proba)
    fn classes(&self) -> &[i64];

    /// Number of features the classifier expects
    fn n_features(&self) -> usize;

    fn predict(&self, features: &Features) -> Result<i64, ClassifierError>;

    fn predict_proba(&self, features: &Features) -> Result<Vec<f64>, ClassifierError>;
}

/// Serialized form of a fitted binary logistic regression model: two classes,
/// a single coefficient row and a single intercept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

/// Binary linear classifier with a logistic link.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<i64>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LogisticRegression {
    /// Builds a model from its serialized form.
    ///
    /// # Errors
    /// - `ArtifactLoadError` if the model does not declare exactly two classes
    /// - `ArtifactLoadError` if there is not exactly one coefficient row and one intercept
    /// - `ArtifactLoadError` if the coefficient row is empty
    pub fn from_artifact(artifact: LogisticRegressionArtifact) -> Result<Self, ClassifierError> {
        if artifact.classes.len() != 2 {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Model must declare exactly 2 classes (FAKE, REAL), found {}",
                artifact.classes.len()
            )));
        }
        if artifact.coef.len() != 1 {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Binary model must have 1 coefficient row, found {}",
                artifact.coef.len()
            )));
        }
        if artifact.intercept.len() != 1 {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Binary model must have 1 intercept, found {}",
                artifact.intercept.len()
            )));
        }

        let width = artifact.coef[0].len();
        if width == 0 {
            return Err(ClassifierError::ArtifactLoadError("Coefficient row must be non-empty".into()));
        }

        let flat: Vec<f64> = artifact.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((1, width), flat).map_err(|e| {
            ClassifierError::ArtifactLoadError(format!("Failed to shape coefficients: {}", e))
        })?;

        Ok(Self {
            classes: artifact.classes,
            coef,
            intercept: Array1::from(artifact.intercept),
        })
    }

    /// Signed distance of the sample to the separating hyperplane.
    /// Positive scores favour the second class.
    pub fn decision_function(&self, features: &Features) -> Result<f64, ClassifierError> {
        if features.len() != self.coef.ncols() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.coef.ncols(),
                features.len()
            )));
        }
        let scores = self.coef.dot(features) + &self.intercept;
        Ok(scores[0])
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn predict(&self, features: &Features) -> Result<i64, ClassifierError> {
        let score = self.decision_function(features)?;
        Ok(if score > 0.0 { self.classes[1] } else { self.classes[0] })
    }

    fn predict_proba(&self, features: &Features) -> Result<Vec<f64>, ClassifierError> {
        let p = sigmoid(self.decision_function(features)?);
        Ok(vec![1.0 - p, p])
    }
}
