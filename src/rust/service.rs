use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::classifier::{ClassifierError, NewsClassifier, Prediction};
use crate::history::{recent, HistoryError, HistoryLog, HistoryRecord, HistoryStore, HistoryView};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl ServiceError {
    /// True when the request was rejected before anything was classified or stored
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Classifier(ClassifierError::ValidationError(_)))
    }
}

/// Result of a classification that was recorded in the history
#[derive(Debug, Clone)]
pub struct Classification {
    pub prediction: Prediction,
    pub record: HistoryRecord,
}

/// Classifies text and keeps the persisted history in step with memory.
///
/// The classifier is shared read-only. The history is guarded by a single
/// async mutex, so within one process appends are serialized and the file
/// always matches the in-memory log.
pub struct ClassificationService {
    classifier: Arc<NewsClassifier>,
    store: HistoryStore,
    history: Mutex<HistoryLog>,
}

impl ClassificationService {
    /// Creates the service, restoring the history from `store`.
    ///
    /// # Errors
    /// Fails if the history file exists but cannot be read or parsed; a
    /// corrupt history is never silently replaced.
    pub fn open(classifier: Arc<NewsClassifier>, store: HistoryStore) -> Result<Self, HistoryError> {
        let history = store.load()?;
        Ok(Self::new(classifier, store, history))
    }

    pub fn new(classifier: Arc<NewsClassifier>, store: HistoryStore, history: HistoryLog) -> Self {
        Self {
            classifier,
            store,
            history: Mutex::new(history),
        }
    }

    pub fn classifier(&self) -> &NewsClassifier {
        &self.classifier
    }

    /// Classifies `text` and appends the outcome to the history.
    ///
    /// Nothing is recorded when classification fails. When the history file
    /// cannot be written the in-memory history is left unchanged as well.
    pub async fn classify(&self, text: &str) -> Result<Classification, ServiceError> {
        let prediction = match self.classifier.classify(text) {
            Ok(prediction) => prediction,
            Err(e @ ClassifierError::ValidationError(_)) => {
                warn!("Rejected classification request: {}", e);
                return Err(e.into());
            }
            Err(e) => {
                error!("Classification failed: {}", e);
                return Err(e.into());
            }
        };

        let record = HistoryRecord::new(text, prediction.verdict);
        let mut history = self.history.lock().await;
        let updated = self.store.append(&history, record.clone()).map_err(|e| {
            error!("Failed to record classification: {}", e);
            e
        })?;
        *history = updated;

        info!(
            "Classified as {} (FAKE={:.4}, REAL={:.4}); history now has {} records",
            prediction.verdict,
            prediction.probabilities.fake,
            prediction.probabilities.real,
            history.len()
        );
        Ok(Classification { prediction, record })
    }

    /// The `limit` most recent records, newest first
    pub async fn recent_history(&self, limit: usize) -> HistoryView {
        let history = self.history.lock().await;
        recent(&history, limit)
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }
}
