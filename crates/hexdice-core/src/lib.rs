//! # hexdice-core
//!
//! Deterministic analysis of a 128-bit hash given as 32 hex characters.
//!
//! The pipeline is leaf-first:
//! - [`decode`]: validate and decode the hex string into a [`ByteBuffer`].
//! - [`features`]: entropy, moments, successive differences, CRC16.
//! - [`score`]: eight threshold checks and the score-to-probability table.
//! - [`resolve`]: outcome label, confidence tier, diagnostic line.
//! - [`dice`]: three dice whose sum agrees with the outcome.
//!
//! Everything except the dice draw is a pure function of the input string.

#![deny(unsafe_code)]

pub mod decode;
pub mod dice;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod resolve;
pub mod score;

pub use decode::{BYTE_LEN, ByteBuffer, HASH_HEX_LEN, decode};
pub use dice::{DiceRoll, DiceSimulator, MAX_ROLL_ATTEMPTS};
pub use error::{AnalysisError, InternalFault, ValidationError};
pub use features::{FeatureSet, crc16, extract};
pub use pipeline::{Analysis, analyze};
pub use resolve::{ConfidenceTier, Outcome, Verdict, diagnostics, resolve};
pub use score::{Score, ThresholdCheck, probability_for_score, score, score_breakdown};
