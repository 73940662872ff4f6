use std::collections::{HashMap, HashSet};
use std::fmt;

use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{l1_normalize, l2_normalize};
use super::Features;

/// Turns raw text into the feature vector a classifier consumes.
///
/// Implementations must be immutable after construction so that one instance
/// can serve any number of concurrent classifications.
pub trait TextVectorizer: Send + Sync + fmt::Debug {
    /// Width of the vectors produced by [`transform`](Self::transform)
    fn vocabulary_size(&self) -> usize;

    /// Converts a single document into a feature vector.
    ///
    /// # Errors
    /// - `PredictionError` if the document cannot be vectorized
    fn transform(&self, text: &str) -> Result<Features, ClassifierError>;
}

/// Vector normalization applied after term weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Serialized form of a fitted TF-IDF vectorizer.
///
/// Field names and defaults follow scikit-learn's `TfidfVectorizer`, so an
/// exported fitted vectorizer maps onto this struct one field at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    pub vocabulary: HashMap<String, usize>,
    /// `None` disables idf weighting
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"(?u)\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// A fitted term-frequency / inverse-document-frequency vectorizer.
pub struct TfidfVectorizer {
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
}

impl fmt::Debug for TfidfVectorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("lowercase", &self.lowercase)
            .field("token_pattern", &self.token_pattern.as_str())
            .field("ngram_range", &self.ngram_range)
            .field("stop_words", &self.stop_words.len())
            .field("norm", &self.norm)
            .field("use_idf", &self.idf.is_some())
            .finish()
    }
}

impl TfidfVectorizer {
    /// Builds a vectorizer from its serialized form, checking that the
    /// vocabulary, idf weights and n-gram range are mutually consistent.
    ///
    /// # Errors
    /// - `ArtifactLoadError` if the token pattern does not compile
    /// - `ArtifactLoadError` if vocabulary indices are not exactly `0..len`
    /// - `ArtifactLoadError` if the idf vector length differs from the vocabulary size
    /// - `ArtifactLoadError` if the n-gram range is empty or starts at zero
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, ClassifierError> {
        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ArtifactLoadError(format!(
                "Invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }
        if artifact.vocabulary.is_empty() {
            return Err(ClassifierError::ArtifactLoadError("Vocabulary is empty".into()));
        }

        let mut indices: Vec<usize> = artifact.vocabulary.values().copied().collect();
        indices.sort_unstable();
        if indices.iter().enumerate().any(|(expected, &idx)| expected != idx) {
            return Err(ClassifierError::ArtifactLoadError(
                "Vocabulary indices must cover 0..len exactly once".into(),
            ));
        }

        let idf = match artifact.idf {
            Some(weights) if weights.len() != artifact.vocabulary.len() => {
                return Err(ClassifierError::ArtifactLoadError(format!(
                    "idf has {} weights but vocabulary has {} terms",
                    weights.len(),
                    artifact.vocabulary.len()
                )));
            }
            Some(weights) => Some(Array1::from(weights)),
            None => None,
        };

        Ok(Self {
            lowercase: artifact.lowercase,
            token_pattern: Regex::new(&artifact.token_pattern)?,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            binary: artifact.binary,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            vocabulary: artifact.vocabulary,
            idf,
        })
    }

    /// Splits a document into the terms looked up in the vocabulary:
    /// tokens matched by the token pattern, minus stop words, expanded into
    /// the configured word n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        // A capturing group in the pattern selects the token, as in scikit-learn
        let tokens: Vec<&str> = if self.token_pattern.captures_len() > 1 {
            self.token_pattern
                .captures_iter(&text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
                .collect()
        } else {
            self.token_pattern.find_iter(&text).map(|m| m.as_str()).collect()
        };
        let tokens: Vec<&str> = tokens
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().map(|t| t.to_string()));
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }
        terms
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> Result<Features, ClassifierError> {
        let mut tf = Array1::<f64>::zeros(self.vocabulary.len());
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                tf[idx] += 1.0;
            }
        }

        if self.binary {
            tf.mapv_inplace(|x| if x > 0.0 { 1.0 } else { 0.0 });
        }
        if self.sublinear_tf {
            tf.mapv_inplace(|x| if x > 0.0 { 1.0 + x.ln() } else { 0.0 });
        }
        if let Some(idf) = &self.idf {
            tf *= idf;
        }

        let features = match self.norm {
            Some(Norm::L2) => l2_normalize(&tf),
            Some(Norm::L1) => l1_normalize(&tf),
            None => tf,
        };

        if features.iter().any(|x| !x.is_finite()) {
            return Err(ClassifierError::PredictionError(
                "Vectorizer produced non-finite feature values".into(),
            ));
        }
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(terms: &[&str]) -> TfidfArtifact {
        TfidfArtifact {
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: (1, 1),
            stop_words: Vec::new(),
            binary: false,
            sublinear_tf: false,
            norm: Some(Norm::L2),
            vocabulary: terms
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect(),
            idf: None,
        }
    }

    #[test]
    fn test_default_pattern_skips_single_characters() {
        let vectorizer = TfidfVectorizer::from_artifact(artifact(&["stocks"])).unwrap();
        assert_eq!(
            vectorizer.analyze("A Stocks rise, I think!"),
            vec!["stocks", "rise", "think"]
        );
    }

    #[test]
    fn test_lowercase_can_be_disabled() {
        let mut a = artifact(&["Stocks"]);
        a.lowercase = false;
        let vectorizer = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(vectorizer.analyze("Stocks stocks"), vec!["Stocks", "stocks"]);
        let features = vectorizer.transform("Stocks stocks").unwrap();
        assert!((features[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_stop_words_and_bigrams() {
        let mut a = artifact(&["stocks"]);
        a.stop_words = vec!["the".into()];
        a.ngram_range = (1, 2);
        let vectorizer = TfidfVectorizer::from_artifact(a).unwrap();
        assert_eq!(
            vectorizer.analyze("the stocks rise"),
            vec!["stocks", "rise", "stocks rise"]
        );
    }

    #[test]
    fn test_tfidf_weights_match_hand_computation() {
        // counts: stocks=2, rise=1; idf: stocks=1.0, rise=2.0 -> raw [2, 2]
        let mut a = artifact(&["stocks", "rise", "fall"]);
        a.idf = Some(vec![1.0, 2.0, 3.0]);
        let vectorizer = TfidfVectorizer::from_artifact(a).unwrap();
        let features = vectorizer.transform("stocks rise stocks unknown").unwrap();
        let expected = 1.0 / 2f64.sqrt();
        assert!((features[0] - expected).abs() < 1e-12);
        assert!((features[1] - expected).abs() < 1e-12);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn test_sublinear_and_binary_tf() {
        let mut a = artifact(&["stocks", "rise"]);
        a.norm = None;
        a.sublinear_tf = true;
        let vectorizer = TfidfVectorizer::from_artifact(a.clone()).unwrap();
        let features = vectorizer.transform("stocks stocks stocks rise").unwrap();
        assert!((features[0] - (1.0 + 3f64.ln())).abs() < 1e-12);
        assert!((features[1] - 1.0).abs() < 1e-12);

        a.sublinear_tf = false;
        a.binary = true;
        let vectorizer = TfidfVectorizer::from_artifact(a).unwrap();
        let features = vectorizer.transform("stocks stocks stocks rise").unwrap();
        assert_eq!(features.to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_out_of_vocabulary_text_yields_zero_vector() {
        let vectorizer = TfidfVectorizer::from_artifact(artifact(&["stocks"])).unwrap();
        let features = vectorizer.transform("nothing known here").unwrap();
        assert_eq!(features.to_vec(), vec![0.0]);
    }

    #[test]
    fn test_rejects_inconsistent_artifacts() {
        let mut a = artifact(&["stocks", "rise"]);
        a.idf = Some(vec![1.0]);
        assert!(matches!(
            TfidfVectorizer::from_artifact(a),
            Err(ClassifierError::ArtifactLoadError(_))
        ));

        let mut a = artifact(&["stocks"]);
        a.vocabulary.insert("rise".into(), 5);
        assert!(TfidfVectorizer::from_artifact(a).is_err());

        let mut a = artifact(&["stocks"]);
        a.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_artifact(a).is_err());

        let mut a = artifact(&["stocks"]);
        a.token_pattern = "(".into();
        assert!(TfidfVectorizer::from_artifact(a).is_err());
    }

    #[test]
    fn test_artifact_defaults() {
        let a: TfidfArtifact = serde_json::from_str(r#"{"vocabulary": {"stocks": 0}}"#).unwrap();
        assert!(a.lowercase);
        assert_eq!(a.ngram_range, (1, 1));
        assert_eq!(a.norm, Some(Norm::L2));
        assert!(a.idf.is_none());

        let a: TfidfArtifact =
            serde_json::from_str(r#"{"vocabulary": {"stocks": 0}, "norm": null}"#).unwrap();
        assert_eq!(a.norm, None);
    }
}
