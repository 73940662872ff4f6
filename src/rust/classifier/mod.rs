use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

mod error;
pub mod artifact;
mod model;
pub mod builder;
mod utils;
mod vectorizer;
pub(crate) mod classifier;

pub use error::ClassifierError;
pub use classifier::NewsClassifier;
pub use builder::ClassifierBuilder;
pub use model::{LogisticRegression, LogisticRegressionArtifact, ProbabilisticClassifier};
pub use vectorizer::{Norm, TextVectorizer, TfidfArtifact, TfidfVectorizer};

/// Dense feature vector produced by a [`TextVectorizer`]
pub type Features = Array1<f64>;

/// The class id that maps to [`Verdict::Real`]; every other id is [`Verdict::Fake`].
pub const REAL_CLASS: i64 = 1;

/// Final verdict shown to the user and stored in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Fake,
}

impl Verdict {
    pub fn from_class(class: i64) -> Self {
        if class == REAL_CLASS {
            Verdict::Real
        } else {
            Verdict::Fake
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text normalization applied before vectorizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preprocessing {
    /// Pass the input through unchanged
    Identity,
    /// Lowercase the input
    #[default]
    Lowercase,
}

impl Preprocessing {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Preprocessing::Identity => text.to_string(),
            Preprocessing::Lowercase => text.to_lowercase(),
        }
    }
}

impl fmt::Display for Preprocessing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preprocessing::Identity => f.write_str("identity"),
            Preprocessing::Lowercase => f.write_str("lowercase"),
        }
    }
}

/// Probability of each verdict, taken from the classifier's `[FAKE, REAL]` output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub fake: f64,
    pub real: f64,
}

/// Outcome of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub verdict: Verdict,
    /// Class id as returned by the classifier, before mapping
    pub raw_class: i64,
    pub probabilities: ClassProbabilities,
    /// The classifier's declared class order
    pub classes: Vec<i64>,
}

/// Information about the loaded artifacts and classifier configuration
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path to the classifier artifact, if loaded from disk
    pub model_path: Option<String>,
    /// Path to the vectorizer artifact, if loaded from disk
    pub vectorizer_path: Option<String>,
    /// Class ids declared by the classifier
    pub classes: Vec<i64>,
    /// Width of the feature vectors
    pub n_features: usize,
    pub preprocessing: Preprocessing,
}
