//! The request boundary: one text message in, one reply out.
//!
//! `trim → analyze → roll → record`, synchronously. Validation and internal
//! faults abort before anything is recorded. A failed history append is
//! reported next to the reply and never discards it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use hexdice_core::{Analysis, AnalysisError, DiceSimulator, analyze};
use hexdice_ledger::{HistoryRecord, HistorySink, LedgerError};
use parking_lot::Mutex;

use crate::reply::AnalysisReply;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, events};

/// What happened to the history row of a completed analysis.
#[derive(Debug)]
pub enum HistoryStatus {
    Recorded,
    /// Recording is turned off for this service.
    Skipped,
    Failed(LedgerError),
}

impl HistoryStatus {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A completed request.
#[derive(Debug)]
pub struct Handled {
    pub reply: AnalysisReply,
    pub history: HistoryStatus,
}

pub struct AnalysisService<S> {
    sink: Option<S>,
    log: Mutex<LogEmitter>,
    dice_seed: Option<u64>,
    requests: AtomicU64,
}

impl<S: HistorySink> AnalysisService<S> {
    /// `sink: None` disables recording.
    #[must_use]
    pub fn new(sink: Option<S>, log: LogEmitter) -> Self {
        Self {
            sink,
            log: Mutex::new(log),
            dice_seed: None,
            requests: AtomicU64::new(0),
        }
    }

    /// Derive each request's dice seed from `seed` instead of OS entropy.
    #[must_use]
    pub fn with_dice_seed(mut self, seed: u64) -> Self {
        self.dice_seed = Some(seed);
        self
    }

    /// Handle one inbound message.
    pub fn handle(&self, text: &str) -> Result<Handled, AnalysisError> {
        let started = Instant::now();
        let request = self.requests.fetch_add(1, Ordering::Relaxed);
        let input = text.trim();

        let analysis = analyze(input).inspect_err(|err| self.log_failure(input, err, started))?;

        let mut dice = match self.dice_seed {
            Some(seed) => DiceSimulator::seeded(seed.wrapping_add(request)),
            None => DiceSimulator::from_entropy(),
        };
        let roll = dice
            .roll(analysis.verdict.outcome)
            .map_err(AnalysisError::from)
            .inspect_err(|err| self.log_failure(input, err, started))?;

        let history = self.record(&analysis);
        let reply = AnalysisReply::new(&analysis, roll);

        self.log(
            LogEntry::new("", LogLevel::Info, events::ANALYSIS_COMPLETED)
                .with_hash(input)
                .with_verdict(&analysis.verdict)
                .with_dice_total(roll.total)
                .with_latency_ns(elapsed_ns(started)),
        );

        Ok(Handled { reply, history })
    }

    /// Flush buffered log lines.
    pub fn flush_log(&self) -> std::io::Result<()> {
        self.log.lock().flush()
    }

    fn record(&self, analysis: &Analysis) -> HistoryStatus {
        let Some(sink) = &self.sink else {
            return HistoryStatus::Skipped;
        };
        match sink.append(&HistoryRecord::now(analysis)) {
            Ok(()) => HistoryStatus::Recorded,
            Err(err) => {
                self.log(
                    LogEntry::new("", LogLevel::Error, events::HISTORY_APPEND_FAILED)
                        .with_hash(&analysis.hash)
                        .with_error_kind(err.kind())
                        .with_details(serde_json::json!({ "error": err.to_string() })),
                );
                HistoryStatus::Failed(err)
            }
        }
    }

    fn log_failure(&self, input: &str, err: &AnalysisError, started: Instant) {
        let (level, event) = match err {
            AnalysisError::Validation(_) => (LogLevel::Warn, events::ANALYSIS_REJECTED),
            AnalysisError::Internal(_) => (LogLevel::Error, events::ANALYSIS_FAULT),
        };
        self.log(
            LogEntry::new("", level, event)
                .with_hash(input)
                .with_error_kind(err.kind())
                .with_latency_ns(elapsed_ns(started))
                .with_details(serde_json::json!({ "reason": err.to_string() })),
        );
    }

    /// Log write failures never fail a request.
    fn log(&self, entry: LogEntry) {
        let _ = self.log.lock().emit_entry(entry);
    }
}

fn elapsed_ns(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexdice_core::Outcome;
    use hexdice_ledger::MemoryHistorySink;

    fn service() -> AnalysisService<MemoryHistorySink> {
        AnalysisService::new(
            Some(MemoryHistorySink::new()),
            LogEmitter::to_sink("hexdice", "test"),
        )
        .with_dice_seed(11)
    }

    #[test]
    fn completed_request_is_recorded_once() {
        let svc = service();
        let handled = svc.handle("  0123456789ABCDEF0123456789abcdef\n").unwrap();
        assert!(matches!(handled.history, HistoryStatus::Recorded));
        assert_eq!(handled.reply.hash, "0123456789ABCDEF0123456789abcdef");
        assert_eq!(handled.reply.outcome, Outcome::High);

        let records = svc.sink.as_ref().unwrap().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hash, "0123456789ABCDEF0123456789abcdef");
        assert_eq!(records[0].probability, "55.0%");
    }

    #[test]
    fn rejected_request_records_nothing() {
        let svc = service();
        let err = svc.handle("not a hash").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(svc.sink.as_ref().unwrap().is_empty());
    }

    #[test]
    fn disabled_history_is_skipped() {
        let svc: AnalysisService<MemoryHistorySink> =
            AnalysisService::new(None, LogEmitter::to_sink("hexdice", "test"));
        let handled = svc.handle("00000000000000000000000000000000").unwrap();
        assert!(matches!(handled.history, HistoryStatus::Skipped));
        assert_eq!(handled.reply.outcome, Outcome::Low);
        assert!(handled.reply.dice.total <= 10);
    }

    #[test]
    fn seeded_service_is_reproducible() {
        let a = service().handle("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        let b = service().handle("d41d8cd98f00b204e9800998ecf8427e").unwrap();
        assert_eq!(a.reply, b.reply);
    }
}
