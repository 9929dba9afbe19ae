//! The retention pipeline — drives the four phases end to end.
//!
//! EXECUTION ORDER (fixed, never overlapped):
//!   1. Parse      — each line becomes a Record or is rejected
//!   2. Accumulate — accepted records go into the ActivityLedger
//!   3. Compute    — CohortEngine freezes the ledger into a RetentionMatrix
//!   4. Format     — MatrixFormatter renders ordered rows
//!
//! RULES:
//!   - Computation starts only after ALL input is ingested; every base
//!     date needs the full date set.
//!   - Malformed lines are counted and logged, never fatal.
//!   - Only an unreadable input stream aborts a run.

use crate::{
    cohort::{CohortEngine, RetentionMatrix},
    config::RetentionConfig,
    error::{RecordError, RetentionResult},
    format::MatrixFormatter,
    ledger::ActivityLedger,
    record::RecordParser,
};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestReport {
    pub lines_read: u64,
    pub accepted:   u64,
    pub rejected:   u64,
}

pub struct RetentionPipeline {
    config: RetentionConfig,
    parser: RecordParser,
    ledger: ActivityLedger,
    report: IngestReport,
}

impl RetentionPipeline {
    pub fn new(config: RetentionConfig) -> Self {
        Self {
            parser: RecordParser::new(&config),
            ledger: ActivityLedger::new(),
            report: IngestReport::default(),
            config,
        }
    }

    /// Phases 1 + 2 for a single line. `line_no` is 1-based, for diagnostics.
    pub fn ingest_line(&mut self, line_no: u64, line: &str) -> Result<(), RecordError> {
        self.report.lines_read += 1;
        match self.parser.parse(line) {
            Ok(record) => {
                self.ledger.record(record);
                self.report.accepted += 1;
                Ok(())
            }
            Err(e) => {
                self.reject(line_no, &e);
                Err(e)
            }
        }
    }

    /// Ingest every line from `reader`.
    ///
    /// Lines that are not valid UTF-8 are rejected like any other malformed
    /// record. A failing stream stops ingestion and returns `Io`, but the
    /// lines read before the failure stay in the ledger, so the caller can
    /// still compute and render a partial matrix.
    pub fn ingest_reader<R: BufRead>(&mut self, mut reader: R) -> RetentionResult<IngestReport> {
        let mut buf = Vec::new();
        let mut line_no = 0u64;
        let outcome = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break Ok(()),
                Ok(_) => {
                    line_no += 1;
                    let bytes = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                    match std::str::from_utf8(bytes) {
                        // Rejections are already counted and logged.
                        Ok(line) => {
                            let _ = self.ingest_line(line_no, line);
                        }
                        Err(_) => {
                            self.report.lines_read += 1;
                            self.reject(line_no, &RecordError::InvalidEncoding);
                        }
                    }
                }
                Err(e) => break Err(e),
            }
        };

        log::info!(
            "ingest: {} lines, {} accepted, {} rejected, {} users, {} dates",
            self.report.lines_read,
            self.report.accepted,
            self.report.rejected,
            self.ledger.user_count(),
            self.ledger.sorted_dates().len(),
        );
        if let Err(e) = &outcome {
            log::error!("ingest stopped after line {line_no}: {e}");
        }
        outcome?;
        Ok(self.report)
    }

    fn reject(&mut self, line_no: u64, reason: &RecordError) {
        self.report.rejected += 1;
        log::warn!("line {line_no}: dropped malformed record: {reason}");
    }

    pub fn report(&self) -> IngestReport {
        self.report
    }

    pub fn ledger(&self) -> &ActivityLedger {
        &self.ledger
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Phase 3.
    pub fn compute(&self) -> RetentionMatrix {
        CohortEngine::new(&self.ledger).compute()
    }

    /// Phases 3 + 4: delimited output lines, header first.
    pub fn render(&self) -> Vec<String> {
        let matrix = self.compute();
        MatrixFormatter::new(&self.config).lines(&matrix)
    }
}

/// Run all four phases over in-memory lines.
pub fn run_lines<'a, I>(config: RetentionConfig, lines: I) -> (IngestReport, Vec<String>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pipeline = RetentionPipeline::new(config);
    for (i, line) in lines.into_iter().enumerate() {
        let _ = pipeline.ingest_line(i as u64 + 1, line);
    }
    (pipeline.report(), pipeline.render())
}
