//! Host loop that feeds NDJSON traversers through one step.
//!
//! Items are read, mapped, and written one at a time. A rejected item either
//! stops the run or is reported and skipped, per `ErrorPolicy`.

use std::fmt;
use std::io::{BufRead, Write};

use crate::config::ErrorPolicy;
use crate::serialization::{NdjsonReader, NdjsonWriter, SerializationError};
use crate::step::{ScalarMapStep, StepError};

/// Error that ends a run early
#[derive(Debug)]
pub enum RunError {
    Step { line: usize, source: StepError },
    Serialization(SerializationError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Step { line, source } => write!(f, "Item on line {}: {}", line, source),
            RunError::Serialization(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Step { source, .. } => Some(source),
            RunError::Serialization(e) => Some(e),
        }
    }
}

impl From<SerializationError> for RunError {
    fn from(err: SerializationError) -> Self {
        RunError::Serialization(err)
    }
}

/// Counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Map every item from `input` through `step` and write results to `output`.
pub fn run_stream<R, W>(
    step: &dyn ScalarMapStep,
    input: R,
    output: W,
    policy: ErrorPolicy,
) -> Result<RunSummary, RunError>
where
    R: BufRead,
    W: Write,
{
    let mut reader = NdjsonReader::new(input);
    let mut writer = NdjsonWriter::new(output);
    let mut summary = RunSummary::default();

    while let Some(item) = reader.next() {
        let item = item?;
        summary.processed += 1;

        match step.map(&item) {
            Ok(value) => writer.write(&value)?,
            Err(source) => {
                let line = reader.line();
                match policy {
                    ErrorPolicy::Abort => {
                        writer.flush()?;
                        return Err(RunError::Step { line, source });
                    }
                    ErrorPolicy::Report => {
                        tracing::warn!(line, step = step.name(), error = %source, "skipping item");
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    writer.flush()?;
    tracing::info!(
        step = step.name(),
        processed = summary.processed,
        failed = summary.failed,
        "run complete"
    );
    Ok(summary)
}
