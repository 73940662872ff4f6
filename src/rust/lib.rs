//! Fake news detection: a pre-fitted TF-IDF vectorizer and a pre-trained
//! logistic regression classifier label news text as REAL or FAKE, and every
//! classification is appended to a JSON history file.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use newscheck::{NewsClassifier, Preprocessing, Verdict};
//!
//! let classifier = NewsClassifier::builder()
//!     .with_preprocessing(Preprocessing::Lowercase)
//!     .with_model_file("logistic_model.json", None)?
//!     .with_vectorizer_file("vectorizer.json", None)?
//!     .build()?;
//!
//! let prediction = classifier.classify("Breaking: stocks rise after earnings report")?;
//! match prediction.verdict {
//!     Verdict::Real => println!("This news seems REAL."),
//!     Verdict::Fake => println!("This news seems FAKE."),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Recording history
//!
//! [`ClassificationService`] pairs a classifier with a [`HistoryStore`] and
//! keeps the file and the in-memory log identical after every append:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use newscheck::{ClassificationService, HistoryStore, HistoryView, NewsClassifier};
//!
//! let classifier = NewsClassifier::builder()
//!     .with_model_file("logistic_model.json", None)?
//!     .with_vectorizer_file("vectorizer.json", None)?
//!     .build()?;
//! let service = ClassificationService::open(Arc::new(classifier), HistoryStore::new("history.json"))?;
//!
//! service.classify("Scientists confirm the moon is made of cheese").await?;
//! if let HistoryView::Entries(entries) = service.recent_history(10).await {
//!     for entry in entries {
//!         println!("{} {} {}", entry.timestamp, entry.result, entry.excerpt);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod history;
pub mod service;
pub mod web;

pub use classifier::{
    ClassProbabilities, ClassifierBuilder, ClassifierError, ClassifierInfo, NewsClassifier, Prediction,
    Preprocessing, Verdict,
};
pub use config::{AppConfig, ConfigError};
pub use history::{HistoryEntryView, HistoryError, HistoryLog, HistoryRecord, HistoryStore, HistoryView};
pub use service::{Classification, ClassificationService, ServiceError};

/// Initializes `env_logger`, defaulting to the `info` level when `RUST_LOG` is unset
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}
