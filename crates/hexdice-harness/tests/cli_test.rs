// cli_test.rs
// Drives the hexdice binary end to end.

use std::path::Path;
use std::process::{Command, Output};

fn hexdice() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hexdice"));
    cmd.env_remove("HEXDICE_HISTORY")
        .env_remove("HEXDICE_HISTORY_PATH")
        .env_remove("HEXDICE_HISTORY_LOCK_TIMEOUT_MS");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to execute hexdice")
}

#[test]
fn analyze_json_records_history_and_log() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.csv");
    let log = dir.path().join("run.log.jsonl");
    let output = run(hexdice().args([
        "analyze",
        "d41d8cd98f00b204e9800998ecf8427e",
        "00000000000000000000000000000000",
        "--format",
        "json",
        "--seed",
        "9",
        "--history",
        history.to_str().unwrap(),
        "--log",
        log.to_str().unwrap(),
    ]));
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).unwrap();
    let replies: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["outcome"], "High");
    assert_eq!(replies[0]["outcome_label"], "Tài");
    assert_eq!(replies[0]["score"], 5);
    assert_eq!(replies[1]["outcome"], "Low");
    assert_eq!(replies[1]["outcome_label"], "Xỉu");
    assert_eq!(replies[1]["checks"].as_array().unwrap().len(), 8);

    let csv = std::fs::read_to_string(&history).unwrap();
    assert_eq!(csv.split_terminator("\r\n").count(), 3);

    let validate = run(hexdice().args(["validate-log", "--log", log.to_str().unwrap()]));
    assert!(
        validate.status.success(),
        "{}",
        String::from_utf8_lossy(&validate.stderr)
    );
}

#[test]
fn analyze_rejection_exits_non_zero() {
    let output = run(hexdice().args(["analyze", "abc", "--no-history"]));
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rejected \"abc\""), "{stdout}");
}

#[test]
fn disabled_by_env_writes_no_history() {
    let dir = tempfile::tempdir().unwrap();
    let history = dir.path().join("history.csv");
    let output = run(hexdice().env("HEXDICE_HISTORY", "off").args([
        "analyze",
        "5d41402abc4b2a76b9719d911017c592",
        "--history",
        history.to_str().unwrap(),
    ]));
    assert!(output.status.success());
    assert!(!history.exists());
}

#[test]
fn batch_preserves_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hashes.txt");
    let hashes: Vec<String> = (0u128..12).map(|i| format!("{:032x}", i * 0x1111)).collect();
    std::fs::write(&input, hashes.join("\n")).unwrap();

    let output = run(hexdice().args([
        "batch",
        "--input",
        input.to_str().unwrap(),
        "--threads",
        "3",
        "--format",
        "json",
        "--no-history",
    ]));
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let got: Vec<String> = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["hash"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(got, hashes);
}

#[test]
fn verify_writes_report_and_artifact_index() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("verify.json");
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/golden_vectors.v1.json");
    let output = run(hexdice().args([
        "verify",
        "--fixture",
        fixture.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ]));
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report_bytes = std::fs::read(&report).unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&report_bytes).unwrap();
    assert_eq!(summary["failed"], 0);

    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("verify.artifacts.json")).unwrap())
            .unwrap();
    let entry = &index["artifacts"][0];
    assert_eq!(entry["kind"], "verify_report");
    assert_eq!(
        entry["sha256"].as_str().unwrap(),
        hexdice_harness::structured_log::sha256_hex(&report_bytes)
    );
}
