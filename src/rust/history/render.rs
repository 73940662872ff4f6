use serde::Serialize;

use super::HistoryLog;
use crate::classifier::Verdict;

/// Number of characters of the input text kept in a history excerpt
pub const EXCERPT_CHARS: usize = 80;

const ELLIPSIS: &str = "...";

/// Display form of one history record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntryView {
    pub timestamp: String,
    pub excerpt: String,
    pub result: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// Nothing has been classified yet
    Empty,
    /// Newest first
    Entries(Vec<HistoryEntryView>),
}

/// First [`EXCERPT_CHARS`] characters of `text` followed by an ellipsis marker.
/// The marker is always appended, whether or not anything was cut.
pub fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(EXCERPT_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

/// The last `limit` records of `log`, newest first
pub fn recent(log: &HistoryLog, limit: usize) -> HistoryView {
    let records = log.records();
    let start = records.len().saturating_sub(limit);
    if start == records.len() {
        return HistoryView::Empty;
    }

    HistoryView::Entries(
        records[start..]
            .iter()
            .rev()
            .map(|record| HistoryEntryView {
                timestamp: record.timestamp.clone(),
                excerpt: excerpt(&record.text),
                result: record.result,
            })
            .collect(),
    )
}
