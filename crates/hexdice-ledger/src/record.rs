//! History rows and their CSV encoding.

use chrono::{DateTime, Utc};
use hexdice_core::Analysis;

/// Column names, written once when the store is created.
pub const HEADER: [&str; 6] = ["Time", "MD5", "Result", "Probability", "Confidence", "Details"];

/// Row terminator.
const CRLF: &str = "\r\n";

/// Timestamp layout for the `Time` column (UTC).
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed analysis. Built once, appended once, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub hash: String,
    pub outcome: String,
    pub probability: String,
    pub confidence: String,
    pub diagnostics: String,
}

impl HistoryRecord {
    /// Record an analysis completed at `at`.
    #[must_use]
    pub fn from_analysis(analysis: &Analysis, at: DateTime<Utc>) -> Self {
        let verdict = &analysis.verdict;
        Self {
            timestamp: at.format(TIME_FORMAT).to_string(),
            hash: analysis.hash.clone(),
            outcome: verdict.outcome.label().to_string(),
            probability: probability_percent(verdict.probability),
            confidence: verdict.confidence.label().to_string(),
            diagnostics: verdict.diagnostics.clone(),
        }
    }

    /// Record an analysis completed now.
    #[must_use]
    pub fn now(analysis: &Analysis) -> Self {
        Self::from_analysis(analysis, Utc::now())
    }

    #[must_use]
    pub fn fields(&self) -> [&str; 6] {
        [
            self.timestamp.as_str(),
            self.hash.as_str(),
            self.outcome.as_str(),
            self.probability.as_str(),
            self.confidence.as_str(),
            self.diagnostics.as_str(),
        ]
    }

    /// The record as one CRLF-terminated CSV line.
    #[must_use]
    pub fn to_csv_row(&self) -> String {
        csv_line(&self.fields())
    }
}

/// `0.65` → `"65.0%"`.
#[must_use]
pub fn probability_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// The header as one CRLF-terminated CSV line.
#[must_use]
pub fn header_row() -> String {
    csv_line(&HEADER)
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str(CRLF);
    line
}

/// Minimal quoting: only fields containing a delimiter, quote, or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
