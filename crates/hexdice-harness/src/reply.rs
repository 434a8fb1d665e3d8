//! Replies handed back to the transport.
//!
//! Every value is a discrete field; markup belongs to the transport.

use std::fmt::Write as _;

use hexdice_core::{
    Analysis, AnalysisError, ConfidenceTier, DiceRoll, FeatureSet, Outcome, ThresholdCheck,
    score_breakdown,
};
use hexdice_ledger::record::probability_percent;
use serde::Serialize;

/// Result of a successful request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReply {
    pub hash: String,
    pub outcome: Outcome,
    /// "Tài" / "Xỉu".
    pub outcome_label: &'static str,
    pub probability: f64,
    /// Percent with one decimal, e.g. `"65.0%"`.
    pub probability_percent: String,
    pub confidence: ConfidenceTier,
    pub confidence_label: &'static str,
    pub score: u8,
    pub dice: DiceRoll,
    pub diagnostics: String,
    pub features: FeatureSet,
    pub checks: Vec<ThresholdCheck>,
}

impl AnalysisReply {
    #[must_use]
    pub fn new(analysis: &Analysis, dice: DiceRoll) -> Self {
        let verdict = &analysis.verdict;
        Self {
            hash: analysis.hash.clone(),
            outcome: verdict.outcome,
            outcome_label: verdict.outcome.label(),
            probability: verdict.probability,
            probability_percent: probability_percent(verdict.probability),
            confidence: verdict.confidence,
            confidence_label: verdict.confidence.label(),
            score: verdict.score.value(),
            dice,
            diagnostics: verdict.diagnostics.clone(),
            features: analysis.features,
            checks: score_breakdown(&analysis.features).to_vec(),
        }
    }

    /// Plain multi-line text with the per-check breakdown.
    #[must_use]
    pub fn render_plain(&self) -> String {
        let [d1, d2, d3] = self.dice.faces;
        let mut out = String::new();
        let _ = writeln!(out, "hash:        {}", self.hash);
        let _ = writeln!(out, "dice:        {d1}, {d2}, {d3} -> total {}", self.dice.total);
        let _ = writeln!(out, "prediction:  {}", self.outcome_label);
        let _ = writeln!(
            out,
            "confidence:  {} ({})",
            self.confidence_label, self.probability_percent
        );
        let _ = writeln!(out, "details:     {}", self.diagnostics);
        for check in &self.checks {
            let _ = writeln!(
                out,
                "  [{}] {:<18} {:>10.3} {} {}",
                if check.passed { "x" } else { " " },
                check.name,
                check.value,
                check.comparator.symbol(),
                check.threshold,
            );
        }
        out
    }
}

/// Why a request produced no analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub input: String,
    /// `validation` or `internal`.
    pub kind: &'static str,
    pub reason: String,
}

impl Rejection {
    #[must_use]
    pub fn new(input: &str, err: &AnalysisError) -> Self {
        Self {
            input: input.to_string(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }

    #[must_use]
    pub fn render_plain(&self) -> String {
        match self.kind {
            "validation" => format!(
                "rejected {:?}: {}. Send a 32-character hex hash (0-9, a-f).\n",
                self.input, self.reason
            ),
            _ => format!("analysis of {:?} failed: {}\n", self.input, self.reason),
        }
    }
}
