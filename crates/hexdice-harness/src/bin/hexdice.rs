//! CLI entrypoint for hexdice.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use hexdice_harness::reply::Rejection;
use hexdice_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, events, validate_log_file,
};
use hexdice_harness::{AnalysisService, GoldenRunner, GoldenSet, Handled, VerificationSummary};
use hexdice_ledger::{CsvHistoryStore, HistorySink, LedgerConfig, global_history};

/// Hash-byte heuristics for hexdice.
#[derive(Debug, Parser)]
#[command(name = "hexdice")]
#[command(about = "Deterministic outcome prediction from 32-character hex hashes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Plain,
    Json,
}

#[derive(Debug, clap::Args)]
struct ServiceArgs {
    /// History CSV path (overrides HEXDICE_HISTORY_PATH).
    #[arg(long)]
    history: Option<PathBuf>,
    /// Do not record history.
    #[arg(long)]
    no_history: bool,
    /// Structured JSONL log path (default: stderr).
    #[arg(long)]
    log: Option<PathBuf>,
    /// Fixed dice seed for reproducible replies.
    #[arg(long)]
    seed: Option<u64>,
    /// Reply format.
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    format: Format,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one or more hashes.
    Analyze {
        /// 32-character hex hashes.
        #[arg(required = true)]
        hashes: Vec<String>,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Analyze one hash per line of a file across worker threads.
    Batch {
        /// Input file, one hash per line.
        #[arg(long)]
        input: PathBuf,
        /// Worker threads sharing one history store.
        #[arg(long, default_value_t = 4)]
        threads: usize,
        #[command(flatten)]
        service: ServiceArgs,
    },
    /// Verify the analyzer against a golden-vector fixture set.
    Verify {
        /// Fixture JSON path.
        #[arg(long, default_value = "crates/hexdice-harness/fixtures/golden_vectors.v1.json")]
        fixture: PathBuf,
        /// Output report path (JSON). An artifact index is written next to it.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Validate a structured JSONL log.
    ValidateLog {
        #[arg(long)]
        log: PathBuf,
    },
}

type Service = AnalysisService<Box<dyn HistorySink>>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%S").to_string();

    match cli.command {
        Command::Analyze { hashes, service } => {
            let format = service.format;
            let svc = build_service(&service, &run_id)?;
            let outputs: Vec<_> = hashes.iter().map(|h| handle(&svc, h, format)).collect();
            svc.flush_log()?;
            finish(outputs)?;
        }
        Command::Batch {
            input,
            threads,
            service,
        } => {
            let format = service.format;
            let content = std::fs::read_to_string(&input)?;
            let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
            let svc = build_service(&service, &run_id)?;
            let chunk = lines.len().div_ceil(threads.max(1)).max(1);

            let outputs: Vec<Output> = std::thread::scope(|scope| {
                let workers: Vec<_> = lines
                    .chunks(chunk)
                    .map(|part| {
                        let svc = &svc;
                        scope.spawn(move || {
                            part.iter()
                                .map(|h| handle(svc, h, format))
                                .collect::<Vec<_>>()
                        })
                    })
                    .collect();
                workers
                    .into_iter()
                    .flat_map(|w| w.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            });
            svc.flush_log()?;
            eprintln!("Batch complete: {} inputs", outputs.len());
            finish(outputs)?;
        }
        Command::Verify { fixture, report } => {
            eprintln!("Verifying golden vectors in {}", fixture.display());
            let set = GoldenSet::from_file(&fixture)?;
            let results = GoldenRunner::new("golden-verify").run(&set);
            let summary = VerificationSummary::from_results(results);

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                summary.total, summary.passed, summary.failed
            );
            for failed in summary.results.iter().filter(|r| !r.passed) {
                eprintln!(
                    "FAIL {}\n{}",
                    failed.case_name,
                    failed.diff.as_deref().unwrap_or_default()
                );
            }

            if let Some(report_path) = report {
                write_report(&report_path, &summary, &run_id)?;
            }

            let mut log = LogEmitter::to_stderr("hexdice", &run_id);
            log.emit_entry(
                LogEntry::new("", LogLevel::Info, events::VERIFY_COMPLETED).with_details(
                    serde_json::json!({
                        "fixture": fixture.display().to_string(),
                        "total": summary.total,
                        "failed": summary.failed,
                    }),
                ),
            )?;

            if !summary.all_passed() {
                return Err("Golden-vector verification failed".into());
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!(
                "Validated {} lines in {}: {} errors",
                lines,
                log.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Structured log validation failed".into());
            }
        }
    }
    Ok(())
}

fn build_service(args: &ServiceArgs, run_id: &str) -> std::io::Result<Service> {
    let config = LedgerConfig::from_env();
    let sink: Option<Box<dyn HistorySink>> = if args.no_history || !config.mode.records() {
        None
    } else {
        match &args.history {
            Some(path) => Some(Box::new(CsvHistoryStore::new(path, config.lock_timeout))),
            None => Some(Box::new(global_history())),
        }
    };

    let log = match &args.log {
        Some(path) => LogEmitter::to_file(path, "hexdice", run_id)?,
        None => LogEmitter::to_stderr("hexdice", run_id),
    };

    let svc = AnalysisService::new(sink, log);
    Ok(match args.seed {
        Some(seed) => svc.with_dice_seed(seed),
        None => svc,
    })
}

/// Rendered reply text and what went wrong, if anything.
#[derive(Debug)]
struct Output {
    text: String,
    rejected: bool,
    history_failed: bool,
}

fn handle(svc: &Service, input: &str, format: Format) -> Output {
    match svc.handle(input) {
        Ok(Handled { reply, history }) => {
            let text = match format {
                Format::Plain => reply.render_plain(),
                Format::Json => json_line(&reply),
            };
            if let hexdice_harness::HistoryStatus::Failed(err) = &history {
                eprintln!("history append failed for {}: {err}", reply.hash);
            }
            Output {
                text,
                rejected: false,
                history_failed: history.is_failure(),
            }
        }
        Err(err) => {
            let rejection = Rejection::new(input.trim(), &err);
            let text = match format {
                Format::Plain => rejection.render_plain(),
                Format::Json => json_line(&rejection),
            };
            Output {
                text,
                rejected: true,
                history_failed: false,
            }
        }
    }
}

fn json_line<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(mut line) => {
            line.push('\n');
            line
        }
        Err(err) => format!("{{\"error\":\"serialize: {err}\"}}\n"),
    }
}

fn finish(outputs: Vec<Output>) -> Result<(), Box<dyn std::error::Error>> {
    let mut rejected = 0usize;
    let mut history_failed = 0usize;
    for out in &outputs {
        print!("{}", out.text);
        rejected += usize::from(out.rejected);
        history_failed += usize::from(out.history_failed);
    }
    if history_failed > 0 {
        return Err(format!("{history_failed} history appends failed").into());
    }
    if rejected > 0 {
        return Err(format!("{rejected} of {} inputs rejected", outputs.len()).into());
    }
    Ok(())
}

fn write_report(
    report_path: &Path,
    summary: &VerificationSummary,
    run_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = summary.to_json()?;
    std::fs::write(report_path, &json)?;
    let mut index = ArtifactIndex::new(run_id);
    index.add_content(report_path.display().to_string(), "verify_report", json.as_bytes());
    let index_path = report_path.with_extension("artifacts.json");
    std::fs::write(&index_path, index.to_json()?)?;
    eprintln!(
        "Wrote report to {} (index {})",
        report_path.display(),
        index_path.display()
    );
    Ok(())
}
