//! Golden-vector verification.

use hexdice_core::{Analysis, AnalysisError, analyze};
use serde::{Deserialize, Serialize};

use crate::fixtures::{Expected, GoldenSet, GoldenVector};

/// Result of verifying a single golden vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    pub passed: bool,
    /// Canonical rendering of the expectation.
    pub expected: String,
    /// Canonical rendering of what the analyzer produced.
    pub actual: String,
    /// Mismatching fields, one per line, if the case failed.
    pub diff: Option<String>,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl VerificationSummary {
    #[must_use]
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total,
            passed,
            failed: total - passed,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs golden sets against the analyzer.
pub struct GoldenRunner {
    /// Name of the verification campaign.
    pub campaign: String,
}

impl GoldenRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Verify every vector in order.
    #[must_use]
    pub fn run(&self, set: &GoldenSet) -> Vec<VerificationResult> {
        set.vectors.iter().map(verify_vector).collect()
    }
}

fn verify_vector(vector: &GoldenVector) -> VerificationResult {
    let want = expected_fields(&vector.expected);
    let got = match analyze(&vector.hash) {
        Ok(analysis) => analysis_fields(&analysis),
        Err(err) => rejection_fields(&err),
    };

    let passed = want == got;
    let same_shape = want.iter().map(|(k, _)| k).eq(got.iter().map(|(k, _)| k));
    let diff = match (passed, same_shape) {
        (true, _) => None,
        (false, true) => Some(field_diff(&want, &got)),
        (false, false) => Some(format!("- {}\n+ {}", render(&want), render(&got))),
    };

    VerificationResult {
        case_name: vector.name.clone(),
        passed,
        expected: render(&want),
        actual: render(&got),
        diff,
    }
}

type Fields = Vec<(&'static str, String)>;

fn analysis_fields(a: &Analysis) -> Fields {
    let v = &a.verdict;
    vec![
        ("score", v.score.value().to_string()),
        ("probability", format!("{:.2}", v.probability)),
        ("outcome", v.outcome.as_str().to_string()),
        ("confidence", format!("{:?}", v.confidence)),
        ("gradient", a.features.gradient.to_string()),
        ("crc16", a.features.crc16.to_string()),
        ("diagnostics", v.diagnostics.clone()),
    ]
}

fn expected_fields(expected: &Expected) -> Fields {
    match expected {
        Expected::Analysis {
            score,
            probability,
            outcome,
            confidence,
            gradient,
            crc16,
            diagnostics,
        } => vec![
            ("score", score.to_string()),
            ("probability", format!("{probability:.2}")),
            ("outcome", outcome.clone()),
            ("confidence", confidence.clone()),
            ("gradient", gradient.to_string()),
            ("crc16", crc16.to_string()),
            ("diagnostics", diagnostics.clone()),
        ],
        Expected::Rejected { error_kind } => vec![("rejected", error_kind.clone())],
    }
}

fn rejection_fields(err: &AnalysisError) -> Fields {
    vec![("rejected", err.kind().to_string())]
}

fn render(fields: &[(&'static str, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn field_diff(want: &[(&'static str, String)], got: &[(&'static str, String)]) -> String {
    want.iter()
        .zip(got)
        .filter(|((_, w), (_, g))| w != g)
        .map(|((k, w), (_, g))| format!("{k}: expected {w:?}, got {g:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(vectors: &str) -> GoldenSet {
        GoldenSet::from_json(&format!(
            r#"{{"version":"v1","captured_at":"2026-10-16T00:00:00Z","vectors":[{vectors}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn matching_vectors_pass() {
        let fixture = set(
            r#"{"name":"zeros","hash":"00000000000000000000000000000000","expected":{
                "kind":"analysis","score":1,"probability":0.45,"outcome":"Low","confidence":"Low",
                "gradient":0,"crc16":27146,
                "diagnostics":"Entropy=0.000 | StdDev=0.0 | Bias=0.00 | Gradient=0 | HexDensity=0.00 | Skewness=0.00 | Kurtosis=0.00 | CRC16=27146 | Score=1"}},
               {"name":"short","hash":"abc","expected":{"kind":"rejected","error_kind":"validation"}}"#,
        );
        let results = GoldenRunner::new("smoke").run(&fixture);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:#?}");
        assert!(results.iter().all(|r| r.diff.is_none()));
    }

    #[test]
    fn mismatched_field_is_named_in_diff() {
        let fixture = set(
            r#"{"name":"zeros_wrong_crc","hash":"00000000000000000000000000000000","expected":{
                "kind":"analysis","score":1,"probability":0.45,"outcome":"Low","confidence":"Low",
                "gradient":0,"crc16":1,
                "diagnostics":"Entropy=0.000 | StdDev=0.0 | Bias=0.00 | Gradient=0 | HexDensity=0.00 | Skewness=0.00 | Kurtosis=0.00 | CRC16=27146 | Score=1"}}"#,
        );
        let results = GoldenRunner::new("smoke").run(&fixture);
        assert!(!results[0].passed);
        let diff = results[0].diff.as_deref().unwrap();
        assert_eq!(diff, "crc16: expected \"1\", got \"27146\"");
    }

    #[test]
    fn unexpected_acceptance_fails() {
        let fixture = set(
            r#"{"name":"valid_but_expected_rejection","hash":"00000000000000000000000000000000",
                "expected":{"kind":"rejected","error_kind":"validation"}}"#,
        );
        let summary =
            VerificationSummary::from_results(GoldenRunner::new("smoke").run(&fixture));
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());
        assert!(summary.results[0].diff.as_deref().unwrap().starts_with("- rejected=validation"));
    }
}
