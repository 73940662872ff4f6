//! Classification history: records, the JSON file store and the recent-entries view.

use std::io;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::classifier::Verdict;

mod render;
mod store;

pub use render::{excerpt, recent, HistoryEntryView, HistoryView, EXCERPT_CHARS};
pub use store::HistoryStore;

/// Format of [`HistoryRecord::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("History file {path} is not a valid history: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to replace history file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// One classification as stored in the history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    /// Raw user input, untrimmed
    pub text: String,
    pub result: Verdict,
}

impl HistoryRecord {
    /// Creates a record stamped with the current local time
    pub fn new(text: impl Into<String>, result: Verdict) -> Self {
        Self::at(Local::now().format(TIMESTAMP_FORMAT).to_string(), text, result)
    }

    pub fn at(timestamp: impl Into<String>, text: impl Into<String>, result: Verdict) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: text.into(),
            result,
        }
    }
}

/// Chronologically ordered classification records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    /// Returns a copy of this log with `record` appended
    pub fn with_record(&self, record: HistoryRecord) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend_from_slice(&self.records);
        records.push(record);
        Self { records }
    }
}

impl From<Vec<HistoryRecord>> for HistoryLog {
    fn from(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }
}
