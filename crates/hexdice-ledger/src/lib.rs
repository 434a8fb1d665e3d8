//! Append-only history of completed analyses.
//!
//! - [`HistoryRecord`]: one immutable row per analysis.
//! - [`HistorySink`]: the append seam the request service writes through.
//! - [`CsvHistoryStore`]: file-backed sink, opened lazily, one writer at a time.
//! - [`MemoryHistorySink`]: in-process sink for tests and dry runs.
//! - [`global_history`]: process-wide store configured from the environment.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod record;
pub mod store;

pub use config::{HistoryMode, LedgerConfig};
pub use error::LedgerError;
pub use record::{HEADER, HistoryRecord};
pub use store::{CsvHistoryStore, HistorySink, MemoryHistorySink, global_history};
