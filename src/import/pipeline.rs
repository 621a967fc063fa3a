use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::import::{ImportBatch, ImportError, ImportSummary, Normalizer, RecordParser, RejectedLine};
use crate::models::{Field, PurchaseRecord, RowError};
use crate::storage::DatasetStore;

/// Drives parsing and validation over a whole source file and commits the result.
///
/// Row-level problems are collected into the summary and never stop the run.
/// Accepted records are written in one batch after the last line, so a failed
/// run leaves the store untouched.
#[derive(Debug, Clone, Default)]
pub struct ImportPipeline {
    normalizer: Normalizer
}

impl ImportPipeline {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Imports the file at `path` into `store`.
    pub fn run<S: DatasetStore>(&self, path: &Path, store: &mut S) -> Result<ImportSummary, ImportError> {
        let file = File::open(path).map_err(|error| ImportError::source_unavailable(path, error))?;

        info!("Importing purchases from {}", path.display());

        self.run_reader(BufReader::new(file), store)
    }

    /// Imports an already opened byte stream into `store`.
    pub fn run_reader<R: BufRead, S: DatasetStore>(&self, mut reader: R, store: &mut S) -> Result<ImportSummary, ImportError> {
        let mut batch = ImportBatch::new();
        let mut summary = ImportSummary::default();
        let mut buffer = Vec::new();
        let mut line_number = 0;
        let mut header_checked = false;

        loop {
            buffer.clear();

            let read = reader.read_until(b'\n', &mut buffer)
                .map_err(|error| ImportError::source_read(line_number + 1, error))?;

            if read == 0 {
                break;
            }

            line_number += 1;

            let line = match std::str::from_utf8(strip_line_ending(&buffer)) {
                Ok(line) => line,
                Err(_) => {
                    let raw = String::from_utf8_lossy(strip_line_ending(&buffer)).into_owned();
                    header_checked = true;
                    reject(&mut summary, line_number, raw, RowError::invalid_encoding());
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            if !header_checked {
                header_checked = true;

                if RecordParser::is_header(line) {
                    debug!("Skipping header at line {line_number}");
                    continue;
                }
            }

            match self.process_line(line) {
                Ok(record) => {
                    summary.accepted += 1;
                    debug!(
                        "Line {line_number} accepted as order [{}] at {} CNY / {} SGD",
                        record.order_id, record.price.cny(), record.price.sgd()
                    );

                    if let Some(replaced) = batch.push(record) {
                        summary.duplicates += 1;
                        debug!("Line {line_number} supersedes an earlier row for order [{}]", replaced.order_id);
                    }
                }
                Err(reason) => reject(&mut summary, line_number, line.to_string(), reason)
            }
        }

        debug!("Committing {} distinct purchases", batch.len());
        summary.written = store.upsert_batch(batch.records())?;

        info!(
            "Import finished: {} accepted, {} rejected, {} written",
            summary.accepted, summary.rejected, summary.written
        );

        Ok(summary)
    }

    fn process_line(&self, line: &str) -> Result<PurchaseRecord, RowError> {
        let row = RecordParser::parse(line)?;

        self.normalizer.normalize(row).map_err(|rejection| {
            debug!("Rejected order [{}]: {}", rejection.row.get(Field::OrderId), rejection.reason);
            rejection.reason
        })
    }
}

fn reject(summary: &mut ImportSummary, line: usize, raw: String, reason: RowError) {
    warn!("Line {line} rejected [{}]: {reason}", reason.code());

    summary.rejected += 1;
    summary.rejections.push(RejectedLine { line, raw, reason });
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
