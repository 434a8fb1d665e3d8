//! JSONL logging for analysis requests.
//!
//! One [`LogEntry`] per line. [`LogEmitter`] stamps trace ids of the form
//! `component::run_id::seq`; [`validate_log_line`] and [`validate_log_file`]
//! check emitted logs against the event vocabulary. [`ArtifactIndex`] pins
//! verification reports to their SHA-256 digests.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    const NAMES: [&'static str; 6] = ["trace", "debug", "info", "warn", "error", "fatal"];
}

/// Service event names.
pub mod events {
    pub const ANALYSIS_COMPLETED: &str = "analysis_completed";
    pub const ANALYSIS_REJECTED: &str = "analysis_rejected";
    pub const ANALYSIS_FAULT: &str = "analysis_fault";
    pub const HISTORY_APPEND_FAILED: &str = "history_append_failed";
    pub const VERIFY_COMPLETED: &str = "verify_completed";
}

const OUTCOMES: [&str; 2] = ["High", "Low"];
const CONFIDENCES: [&str; 4] = ["VeryHigh", "High", "Medium", "Low"];

/// One log line. `timestamp`, `trace_id`, `level` and `event` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    /// `High|Low`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    /// `VeryHigh|High|Medium|Low`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice_total: Option<u8>,
    /// Stable error tag (`validation`, `internal`, `history_io`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            hash: None,
            score: None,
            probability: None,
            outcome: None,
            confidence: None,
            dice_total: None,
            error_kind: None,
            latency_ns: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Set score, probability, outcome and confidence from a verdict.
    #[must_use]
    pub fn with_verdict(mut self, verdict: &hexdice_core::Verdict) -> Self {
        self.score = Some(verdict.score.value());
        self.probability = Some(verdict.probability);
        self.outcome = Some(verdict.outcome.as_str().to_string());
        self.confidence = Some(format!("{:?}", verdict.confidence));
        self
    }

    #[must_use]
    pub fn with_dice_total(mut self, total: u8) -> Self {
        self.dice_total = Some(total);
        self
    }

    #[must_use]
    pub fn with_error_kind(mut self, kind: impl Into<String>) -> Self {
        self.error_kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_latency_ns(mut self, ns: u64) -> Self {
        self.latency_ns = Some(ns);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// One JSON object, without the newline.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Index of files produced by one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactIndex {
    pub index_version: u32,
    pub run_id: String,
    pub generated_utc: String,
    pub artifacts: Vec<ArtifactEntry>,
}

impl ArtifactIndex {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            index_version: 1,
            run_id: run_id.into(),
            generated_utc: now_utc(),
            artifacts: Vec::new(),
        }
    }

    /// Add an artifact by content; the digest is computed here.
    pub fn add_content(
        &mut self,
        path: impl Into<String>,
        kind: impl Into<String>,
        content: &[u8],
    ) -> &mut Self {
        self.artifacts.push(ArtifactEntry {
            path: path.into(),
            kind: kind.into(),
            sha256: sha256_hex(content),
            size_bytes: Some(content.len() as u64),
        });
        self
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(content: &[u8]) -> String {
    Sha256::digest(content)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Writes structured JSONL log entries.
pub struct LogEmitter {
    writer: Box<dyn Write + Send>,
    seq: u64,
    component: String,
    run_id: String,
}

impl LogEmitter {
    /// Create an emitter that writes to a file (truncating it).
    pub fn to_file(path: &Path, component: &str, run_id: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(
            Box::new(std::io::BufWriter::new(file)),
            component,
            run_id,
        ))
    }

    /// Create an emitter that writes to stderr, keeping stdout for replies.
    #[must_use]
    pub fn to_stderr(component: &str, run_id: &str) -> Self {
        Self::to_writer(Box::new(std::io::stderr()), component, run_id)
    }

    /// Create an emitter that discards output (for testing).
    #[must_use]
    pub fn to_sink(component: &str, run_id: &str) -> Self {
        Self::to_writer(Box::new(std::io::sink()), component, run_id)
    }

    #[must_use]
    pub fn to_writer(writer: Box<dyn Write + Send>, component: &str, run_id: &str) -> Self {
        Self {
            writer,
            seq: 0,
            component: component.to_string(),
            run_id: run_id.to_string(),
        }
    }

    /// Write a bare event.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        self.emit_entry(LogEntry::new(String::new(), level, event))
    }

    /// Write `entry`, assigning the next trace id if it has none.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<LogEntry> {
        if entry.trace_id.is_empty() {
            self.seq += 1;
            entry.trace_id = format!("{}::{}::{:03}", self.component, self.run_id, self.seq);
        }
        let line = entry.to_jsonl().map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(entry)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

/// Validation error for a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {}", self.line_number, self.field, self.message)
    }
}

/// Validate a single JSONL line.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let mut errors = Vec::new();
    let push = |errors: &mut Vec<LogValidationError>, field: &str, message: String| {
        errors.push(LogValidationError {
            line_number,
            field: field.to_string(),
            message,
        });
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            push(&mut errors, "<json>", format!("invalid JSON: {e}"));
            return Err(errors);
        }
    };

    let Some(obj) = value.as_object() else {
        push(&mut errors, "<root>", "expected JSON object".to_string());
        return Err(errors);
    };

    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            push(&mut errors, field, "required field missing".to_string());
        }
    }

    if let Some(level) = obj.get("level").and_then(|v| v.as_str())
        && !LogLevel::NAMES.contains(&level)
    {
        push(&mut errors, "level", format!("invalid level: '{level}'"));
    }

    if let Some(outcome) = obj.get("outcome").and_then(|v| v.as_str())
        && !OUTCOMES.contains(&outcome)
    {
        push(&mut errors, "outcome", format!("invalid outcome: '{outcome}'"));
    }

    if let Some(confidence) = obj.get("confidence").and_then(|v| v.as_str())
        && !CONFIDENCES.contains(&confidence)
    {
        push(
            &mut errors,
            "confidence",
            format!("invalid confidence: '{confidence}'"),
        );
    }

    if let Some(score) = obj.get("score")
        && !score.as_u64().is_some_and(|s| s <= 8)
    {
        push(&mut errors, "score", format!("score out of range: {score}"));
    }

    if let Some(total) = obj.get("dice_total")
        && !total.as_u64().is_some_and(|t| (3..=18).contains(&t))
    {
        push(
            &mut errors,
            "dice_total",
            format!("dice_total out of range: {total}"),
        );
    }

    // Completed analyses must carry the full verdict.
    if obj.get("event").and_then(|v| v.as_str()) == Some(events::ANALYSIS_COMPLETED) {
        for field in ["hash", "score", "probability", "outcome", "confidence"] {
            if !obj.contains_key(field) {
                push(
                    &mut errors,
                    field,
                    "analysis_completed events must include the verdict".to_string(),
                );
            }
        }
    }

    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && !trace_id.contains("::")
    {
        push(
            &mut errors,
            "trace_id",
            format!("trace_id should follow <component>::<run_id>::<seq> format, got: '{trace_id}'"),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<LogEntry>(value).map_err(|e| {
        vec![LogValidationError {
            line_number,
            field: "<deserialization>".to_string(),
            message: format!("failed to deserialize: {e}"),
        }]
    })
}

/// Count the non-blank lines of a log and collect every schema error.
pub fn validate_log_file(path: &Path) -> std::io::Result<(usize, Vec<LogValidationError>)> {
    let content = std::fs::read_to_string(path)?;
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();
    let errors = lines
        .iter()
        .filter_map(|&(number, line)| validate_log_line(line, number).err())
        .flatten()
        .collect();
    Ok((lines.len(), errors))
}

fn now_utc() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
