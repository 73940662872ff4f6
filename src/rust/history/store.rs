use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use super::{HistoryError, HistoryLog, HistoryRecord};

/// File-backed history: one pretty-printed JSON array rewritten in full on every append.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader never observes a partially written history.
/// There is no cross-process locking; concurrent writers race and the last
/// rename wins.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole history. A missing file is an empty history.
    ///
    /// # Errors
    /// - `Io` if the file exists but cannot be read
    /// - `Parse` if the content is not a JSON array of history records
    pub fn load(&self) -> Result<HistoryLog, HistoryError> {
        if !self.path.exists() {
            info!("No history file at {:?}, starting with an empty history", self.path);
            return Ok(HistoryLog::new());
        }

        let data = fs::read(&self.path)?;
        let log: HistoryLog = serde_json::from_slice(&data).map_err(|source| HistoryError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        info!("Loaded {} history records from {:?}", log.len(), self.path);
        Ok(log)
    }

    /// Returns `log` with `record` appended, after replacing the backing file
    /// with the serialization of the returned log. On error `log` remains the
    /// state that is on disk.
    pub fn append(&self, log: &HistoryLog, record: HistoryRecord) -> Result<HistoryLog, HistoryError> {
        let updated = log.with_record(record);
        self.save(&updated)?;
        Ok(updated)
    }

    fn save(&self, log: &HistoryLog) -> Result<(), HistoryError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(log).map_err(HistoryError::Serialize)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!("Wrote {} history records ({} bytes) to {:?}", log.len(), json.len(), self.path);
        Ok(())
    }
}
