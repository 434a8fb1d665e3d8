use thiserror::Error;

/// History append failures. Never invalidates an already computed analysis.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("history io: {0}")]
    Io(#[from] std::io::Error),
    #[error("history writer busy for {waited_ms} ms")]
    LockTimeout { waited_ms: u64 },
}

impl LedgerError {
    /// Stable tag for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "history_io",
            Self::LockTimeout { .. } => "history_lock_timeout",
        }
    }
}
