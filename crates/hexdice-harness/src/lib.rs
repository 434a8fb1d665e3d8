//! Request boundary and tooling for hexdice.
//!
//! This crate provides:
//! - Service: validate, analyze, roll, record; the call a transport makes
//! - Reply: discrete result fields for a transport to format
//! - Structured logging: JSONL log entries, emitter, and schema validation
//! - Golden vectors: fixture sets of known hashes and a verification runner

#![forbid(unsafe_code)]

pub mod fixtures;
pub mod reply;
pub mod runner;
pub mod service;
pub mod structured_log;

pub use fixtures::{GoldenSet, GoldenVector};
pub use reply::{AnalysisReply, Rejection};
pub use runner::{GoldenRunner, VerificationResult, VerificationSummary};
pub use service::{AnalysisService, Handled, HistoryStatus};
