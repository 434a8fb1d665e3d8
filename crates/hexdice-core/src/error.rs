//! Error taxonomy for the analysis pipeline.

use thiserror::Error;

use crate::resolve::Outcome;

/// Malformed input. Raised before any analysis work happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {expected} hex characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("non-hex character {ch:?} at position {index}")]
    NonHexCharacter { index: usize, ch: char },
}

/// Faults that cannot happen under the pipeline invariants.
///
/// Surfacing one aborts the request; callers must not record history for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalFault {
    #[error("dice budget exhausted for {outcome:?} after {attempts} draws")]
    DiceBudgetExhausted { outcome: Outcome, attempts: u32 },
    #[error("statistic `{feature}` is not finite")]
    DegenerateStatistic { feature: &'static str },
}

/// Any failure of a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("invalid hash: {0}")]
    Validation(#[from] ValidationError),
    #[error("internal fault: {0}")]
    Internal(#[from] InternalFault),
}

impl AnalysisError {
    /// Stable tag for logs and replies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }
}
