//! Ledger configuration.
//!
//! Resolved from the environment:
//! - `HEXDICE_HISTORY`: `on` (default) records every completed analysis,
//!   `off` skips recording entirely.
//! - `HEXDICE_HISTORY_PATH`: CSV file path, default `history.csv`.
//! - `HEXDICE_HISTORY_LOCK_TIMEOUT_MS`: how long an append waits for the
//!   writer lock before failing, default 2000.

use std::path::PathBuf;
use std::time::Duration;

pub const ENV_HISTORY: &str = "HEXDICE_HISTORY";
pub const ENV_HISTORY_PATH: &str = "HEXDICE_HISTORY_PATH";
pub const ENV_LOCK_TIMEOUT_MS: &str = "HEXDICE_HISTORY_LOCK_TIMEOUT_MS";

pub const DEFAULT_HISTORY_PATH: &str = "history.csv";
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 2_000;

/// Whether completed analyses are recorded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryMode {
    #[default]
    Enabled,
    Disabled,
}

impl HistoryMode {
    /// Parse from string (case-insensitive). Unknown values keep recording on.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "disabled" | "false" | "0" => Self::Disabled,
            _ => Self::Enabled,
        }
    }

    #[must_use]
    pub const fn records(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub mode: HistoryMode,
    pub path: PathBuf,
    pub lock_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            mode: HistoryMode::Enabled,
            path: PathBuf::from(DEFAULT_HISTORY_PATH),
            lock_timeout: Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS),
        }
    }
}

impl LedgerConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve through an arbitrary key lookup. Unparseable values fall back
    /// to defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mode = lookup(ENV_HISTORY)
            .map(|v| HistoryMode::from_str_loose(&v))
            .unwrap_or(defaults.mode);
        let path = lookup(ENV_HISTORY_PATH)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.path);
        let lock_timeout = lookup(ENV_LOCK_TIMEOUT_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.lock_timeout);
        Self {
            mode,
            path,
            lock_timeout,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: HistoryMode) -> Self {
        self.mode = mode;
        self
    }
}
