//! History sinks.
//!
//! The CSV store holds its file handle behind a single `parking_lot::Mutex`.
//! The file is created (or opened for append) on the first append, and each
//! append writes its complete row with one `write_all` while the lock is
//! held, so concurrent requests never interleave partial rows.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::record::{HistoryRecord, header_row};

/// Append-only destination for completed analyses.
pub trait HistorySink: Send + Sync {
    fn append(&self, record: &HistoryRecord) -> Result<(), LedgerError>;
}

impl<S: HistorySink + ?Sized> HistorySink for &S {
    fn append(&self, record: &HistoryRecord) -> Result<(), LedgerError> {
        (**self).append(record)
    }
}

impl<S: HistorySink + ?Sized> HistorySink for Box<S> {
    fn append(&self, record: &HistoryRecord) -> Result<(), LedgerError> {
        (**self).append(record)
    }
}

/// CSV file sink with a fixed six-column header.
#[derive(Debug)]
pub struct CsvHistoryStore {
    path: PathBuf,
    lock_timeout: Duration,
    file: Mutex<Option<File>>,
}

impl CsvHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, lock_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            lock_timeout,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.path.clone(), config.lock_timeout)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been opened by this store.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.file.lock().is_some()
    }

    fn open(&self) -> Result<(File, bool), LedgerError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        Ok((file, needs_header))
    }
}

impl HistorySink for CsvHistoryStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), LedgerError> {
        let mut slot =
            self.file
                .try_lock_for(self.lock_timeout)
                .ok_or(LedgerError::LockTimeout {
                    waited_ms: u64::try_from(self.lock_timeout.as_millis()).unwrap_or(u64::MAX),
                })?;

        let mut payload = String::new();
        let mut file = match slot.take() {
            Some(file) => file,
            None => {
                let (file, needs_header) = self.open()?;
                if needs_header {
                    payload.push_str(&header_row());
                }
                file
            }
        };
        payload.push_str(&record.to_csv_row());

        // A handle that failed a write is dropped; the next append reopens.
        file.write_all(payload.as_bytes())?;
        file.flush()?;
        *slot = Some(file);
        Ok(())
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemoryHistorySink {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl HistorySink for MemoryHistorySink {
    fn append(&self, record: &HistoryRecord) -> Result<(), LedgerError> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

static GLOBAL_HISTORY: OnceLock<CsvHistoryStore> = OnceLock::new();

/// Process-wide history store, configured from the environment on first use.
#[must_use]
pub fn global_history() -> &'static CsvHistoryStore {
    GLOBAL_HISTORY.get_or_init(|| CsvHistoryStore::from_config(&LedgerConfig::from_env()))
}
