use std::path::Path;
use std::sync::Arc;

use log::{error, info};

use super::artifact::{load_model_file, load_vectorizer_file};
use super::classifier::NewsClassifier;
use super::error::ClassifierError;
use super::model::ProbabilisticClassifier;
use super::vectorizer::TextVectorizer;
use super::Preprocessing;

/// A builder for constructing a [`NewsClassifier`] with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    vectorizer_path: Option<String>,
    model: Option<Arc<dyn ProbabilisticClassifier>>,
    vectorizer: Option<Arc<dyn TextVectorizer>>,
    preprocessing: Preprocessing,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use newscheck::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text normalization applied before vectorizing.
    /// Defaults to [`Preprocessing::Lowercase`].
    pub fn with_preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    /// Loads the classifier artifact from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the classifier artifact
    /// * `expected_hash` - Optional SHA-256 hex digest the file must match
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty
    ///   - A classifier is already set
    ///   - The file doesn't exist or cannot be read
    ///   - The file's digest differs from `expected_hash`
    ///   - The file is not a valid classifier artifact
    ///
    /// # Example
    /// ```no_run
    /// use newscheck::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_model_file("logistic_model.json", None);
    /// ```
    pub fn with_model_file(
        mut self,
        path: impl AsRef<Path>,
        expected_hash: Option<&str>,
    ) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ClassifierError::ArtifactLoadError("Model path cannot be empty".into()));
        }
        if self.model.is_some() {
            return Err(ClassifierError::ArtifactLoadError("Model already set".into()));
        }

        let model = load_model_file(path, expected_hash).map_err(|e| {
            error!("Failed to load model: {}", e);
            e
        })?;
        info!(
            "Model loaded successfully ({} classes, {} features)",
            model.classes().len(),
            model.n_features()
        );

        self.model_path = Some(path.to_string_lossy().to_string());
        self.model = Some(model);
        Ok(self)
    }

    /// Loads the vectorizer artifact from a JSON file.
    ///
    /// Fails under the same conditions as [`with_model_file`](Self::with_model_file).
    pub fn with_vectorizer_file(
        mut self,
        path: impl AsRef<Path>,
        expected_hash: Option<&str>,
    ) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ClassifierError::ArtifactLoadError("Vectorizer path cannot be empty".into()));
        }
        if self.vectorizer.is_some() {
            return Err(ClassifierError::ArtifactLoadError("Vectorizer already set".into()));
        }

        let vectorizer = load_vectorizer_file(path, expected_hash).map_err(|e| {
            error!("Failed to load vectorizer: {}", e);
            e
        })?;
        info!("Vectorizer loaded successfully (vocabulary size {})", vectorizer.vocabulary_size());

        self.vectorizer_path = Some(path.to_string_lossy().to_string());
        self.vectorizer = Some(vectorizer);
        Ok(self)
    }

    /// Uses an already constructed classifier instead of loading one from disk
    pub fn with_model(mut self, model: Arc<dyn ProbabilisticClassifier>) -> Result<Self, ClassifierError> {
        if self.model.is_some() {
            return Err(ClassifierError::ArtifactLoadError("Model already set".into()));
        }
        self.model = Some(model);
        Ok(self)
    }

    /// Uses an already constructed vectorizer instead of loading one from disk
    pub fn with_vectorizer(mut self, vectorizer: Arc<dyn TextVectorizer>) -> Result<Self, ClassifierError> {
        if self.vectorizer.is_some() {
            return Err(ClassifierError::ArtifactLoadError("Vectorizer already set".into()));
        }
        self.vectorizer = Some(vectorizer);
        Ok(self)
    }

    /// Builds and returns the final NewsClassifier instance
    ///
    /// # Returns
    /// * `Result<NewsClassifier, ClassifierError>` - The constructed classifier if successful, or an error if:
    ///   - No classifier or no vectorizer was set
    ///   - The classifier does not declare exactly two classes
    ///   - The classifier's feature count differs from the vectorizer's vocabulary size
    pub fn build(self) -> Result<NewsClassifier, ClassifierError> {
        let model = self
            .model
            .ok_or_else(|| ClassifierError::ArtifactLoadError("No model loaded".into()))?;
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| ClassifierError::ArtifactLoadError("No vectorizer loaded".into()))?;

        Self::validate_artifacts(model.as_ref(), vectorizer.as_ref())?;
        info!("Artifacts validated successfully");

        Ok(NewsClassifier {
            model_path: self.model_path,
            vectorizer_path: self.vectorizer_path,
            model,
            vectorizer,
            preprocessing: self.preprocessing,
        })
    }

    /// Validates that the two artifacts can be chained into a FAKE/REAL classifier
    fn validate_artifacts(
        model: &dyn ProbabilisticClassifier,
        vectorizer: &dyn TextVectorizer,
    ) -> Result<(), ClassifierError> {
        let classes = model.classes();
        if classes.len() != 2 {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Model must have exactly 2 classes (FAKE, REAL), found {}",
                classes.len()
            )));
        }

        if model.n_features() != vectorizer.vocabulary_size() {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Model expects {} features but vectorizer produces {}",
                model.n_features(),
                vectorizer.vocabulary_size()
            )));
        }

        Ok(())
    }
}
