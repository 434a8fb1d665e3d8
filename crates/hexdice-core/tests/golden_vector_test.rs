//! Fixed-input reference values for the full deterministic pipeline.

use hexdice_core::{
    AnalysisError, ConfidenceTier, Outcome, ValidationError, analyze, crc16, decode,
    score_breakdown,
};

const GOLDEN: &str = "0123456789abcdef0123456789abcdef";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn thirty_three_zeros_are_rejected() {
    let err = analyze("000000000000000000000000000000000").unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::WrongLength { actual: 33, .. })
    ));
}

#[test]
fn golden_bytes() {
    let buf = decode(GOLDEN).unwrap();
    assert_eq!(
        buf.as_bytes(),
        &[
            0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab,
            0xcd, 0xef
        ]
    );
}

#[test]
fn golden_features() {
    let a = analyze(GOLDEN).unwrap();
    let f = a.features;
    assert!(close(f.entropy, 3.0));
    assert!(close(f.stddev, 77.903_786_814_249_29));
    assert_eq!(f.gradient, 714);
    assert!(close(f.bias_rolling, 47.6));
    assert!(close(f.hex_density, 0.875));
    assert!(close(f.repetition_penalty, 0.5));
    assert!(close(f.skewness, 0.0));
    assert!(close(f.kurtosis, -1.238_095_238_095_238_1));
    assert_eq!(f.crc16, 36751);
}

#[test]
fn golden_verdict() {
    let a = analyze(GOLDEN).unwrap();
    let passed: Vec<_> = score_breakdown(&a.features)
        .iter()
        .filter(|c| c.passed)
        .map(|c| c.name)
        .collect();
    assert_eq!(passed, ["entropy", "stddev", "gradient", "hex_density"]);
    assert_eq!(a.verdict.score.value(), 4);
    assert_eq!(a.verdict.probability, 0.55);
    assert_eq!(a.verdict.outcome, Outcome::High);
    assert_eq!(a.verdict.confidence, ConfidenceTier::Low);
    assert_eq!(
        a.verdict.diagnostics,
        "Entropy=3.000 | StdDev=77.9 | Bias=47.60 | Gradient=714 | HexDensity=0.88 | \
         Skewness=0.00 | Kurtosis=-1.24 | CRC16=36751 | Score=4"
    );
}

#[test]
fn golden_is_reproducible_and_case_insensitive() {
    let lower = analyze(GOLDEN).unwrap();
    let upper = analyze(&GOLDEN.to_ascii_uppercase()).unwrap();
    assert_eq!(lower.features, upper.features);
    assert_eq!(lower.verdict, upper.verdict);
    assert_eq!(analyze(GOLDEN).unwrap(), lower);
}

#[test]
fn zero_buffer_crc_constant() {
    assert_eq!(crc16(&[0u8; 16]), 27146);
    let a = analyze("00000000000000000000000000000000").unwrap();
    assert_eq!(a.features.crc16, 27146);
    assert_eq!(
        a.verdict.diagnostics,
        "Entropy=0.000 | StdDev=0.0 | Bias=0.00 | Gradient=0 | HexDensity=0.00 | \
         Skewness=0.00 | Kurtosis=0.00 | CRC16=27146 | Score=1"
    );
}

#[test]
fn outlier_hash_scores_on_shape_checks() {
    let a = analyze("0000000000000000000000000000ff00").unwrap();
    assert_eq!(a.verdict.score.value(), 4);
    assert_eq!(a.features.gradient, 510);
    assert_eq!(a.features.crc16, 27125);
    assert_eq!(a.verdict.outcome, Outcome::High);
}
