use std::sync::Arc;

use log::debug;

use super::error::ClassifierError;
use super::model::ProbabilisticClassifier;
use super::vectorizer::TextVectorizer;
use super::{ClassProbabilities, ClassifierInfo, Prediction, Preprocessing, Verdict};

/// A thread-safe FAKE/REAL news classifier chaining a text vectorizer and a
/// probabilistic classifier.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync`: both artifacts are immutable
/// after loading and held behind `Arc`, so the classifier can be shared
/// across request handlers with `Arc<NewsClassifier>`.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use newscheck::NewsClassifier;
///
/// let classifier = NewsClassifier::builder()
///     .with_model_file("logistic_model.json", None)?
///     .with_vectorizer_file("vectorizer.json", None)?
///     .build()?;
///
/// let prediction = classifier.classify("Breaking: stocks rise after earnings report")?;
/// println!("{} (REAL={:.4})", prediction.verdict, prediction.probabilities.real);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NewsClassifier {
    pub model_path: Option<String>,
    pub vectorizer_path: Option<String>,
    pub model: Arc<dyn ProbabilisticClassifier>,
    pub vectorizer: Arc<dyn TextVectorizer>,
    pub preprocessing: Preprocessing,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<NewsClassifier>();
    }
};

impl NewsClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded artifacts
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            vectorizer_path: self.vectorizer_path.clone(),
            classes: self.model.classes().to_vec(),
            n_features: self.model.n_features(),
            preprocessing: self.preprocessing,
        }
    }

    /// Classifies a news text as REAL or FAKE.
    ///
    /// The input is rejected when it is empty after trimming. Otherwise the
    /// configured preprocessing is applied to the untrimmed input before
    /// vectorizing. Class `1` maps to [`Verdict::Real`], any other class to
    /// [`Verdict::Fake`].
    ///
    /// # Errors
    /// - `ValidationError` if the input is empty or whitespace only
    /// - `PredictionError` if vectorizing or predicting fails, or the
    ///   classifier does not return exactly two probabilities
    pub fn classify(&self, text: &str) -> Result<Prediction, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("empty input".into()));
        }

        let cleaned = self.preprocessing.apply(text);
        let features = self.vectorizer.transform(&cleaned)?;
        let raw_class = self.model.predict(&features)?;
        let proba = self.model.predict_proba(&features)?;

        let (fake, real) = match proba.as_slice() {
            [fake, real] => (*fake, *real),
            other => {
                return Err(ClassifierError::PredictionError(format!(
                    "Expected 2 class probabilities, got {}",
                    other.len()
                )))
            }
        };
        debug!("Raw prediction: {}, probabilities: FAKE={:.4}, REAL={:.4}", raw_class, fake, real);

        Ok(Prediction {
            verdict: Verdict::from_class(raw_class),
            raw_class,
            probabilities: ClassProbabilities { fake, real },
            classes: self.model.classes().to_vec(),
        })
    }
}
