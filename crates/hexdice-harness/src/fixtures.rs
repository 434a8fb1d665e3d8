//! Golden-vector fixture loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture io: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture json: {0}")]
    Json(#[from] serde_json::Error),
}

/// What analyzing a vector's hash must produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expected {
    Analysis {
        score: u8,
        probability: f64,
        /// `High|Low`.
        outcome: String,
        /// `VeryHigh|High|Medium|Low`.
        confidence: String,
        gradient: u32,
        crc16: u16,
        diagnostics: String,
    },
    Rejected {
        /// `validation|internal`.
        error_kind: String,
    },
}

/// A single golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenVector {
    /// Case identifier.
    pub name: String,
    /// Raw input, passed to the analyzer untrimmed.
    pub hash: String,
    pub expected: Expected,
}

/// A versioned collection of golden vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenSet {
    /// Schema version.
    pub version: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    pub vectors: Vec<GoldenVector>,
}

impl GoldenSet {
    /// Load a set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the set to pretty JSON.
    pub fn to_json(&self) -> Result<String, FixtureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
