use crate::loudness::{CorrectionError, Verdict};
use std::fmt;
use std::path::PathBuf;

/// Details of a failed tool run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitInfo {
    /// `None` when the process never exited on its own (spawn failure, signal, timeout).
    pub code: Option<i32>,
    pub reason: String,
    pub diagnostics: String,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Processed(f64),
    ToleranceFailed(f64),
    MeasurementAbsent,
    ToolFailure(ExitInfo),
    AccessError(String),
    Skipped,
}

impl Outcome {
    pub fn from_result(result: Result<Verdict, CorrectionError>) -> Self {
        match result {
            Ok(Verdict::Committed(reading)) => Outcome::Processed(reading),
            Ok(Verdict::Discarded(reading)) => Outcome::ToleranceFailed(reading),
            Err(err) => err.into(),
        }
    }

    /// Whether the outcome counts towards the error total.
    pub fn is_error(&self) -> bool {
        !matches!(self, Outcome::Processed(_) | Outcome::Skipped)
    }
}

impl From<CorrectionError> for Outcome {
    fn from(err: CorrectionError) -> Self {
        match err {
            CorrectionError::MeasurementAbsent => Outcome::MeasurementAbsent,
            CorrectionError::Tool(invoke) => Outcome::ToolFailure(ExitInfo {
                code: invoke.exit_code(),
                reason: invoke.to_string(),
                diagnostics: invoke.diagnostics().to_string(),
            }),
            // The tool reported success but left nothing behind
            CorrectionError::MissingOutput(_) => Outcome::ToolFailure(ExitInfo {
                code: Some(0),
                reason: err.to_string(),
                diagnostics: String::new(),
            }),
            CorrectionError::Access { .. } | CorrectionError::Commit { .. } => {
                Outcome::AccessError(err.to_string())
            }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Processed(reading) => write!(f, "Processed: {:.2} LUFS", reading),
            Outcome::ToleranceFailed(reading) => {
                write!(f, "Failed loudness check: {:.2} LUFS", reading)
            }
            Outcome::MeasurementAbsent => {
                write!(f, "Failed to check loudness: Unable to determine loudness value")
            }
            Outcome::ToolFailure(info) => write!(f, "Error: {}", info.reason),
            Outcome::AccessError(reason) => write!(f, "Error: {}", reason),
            Outcome::Skipped => write!(f, "Skipped: Unsupported file type"),
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        if outcome.is_error() {
            self.errored += 1;
        } else if *outcome == Outcome::Skipped {
            self.skipped += 1;
        } else {
            self.processed += 1;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {}, Skipped: {}, Errors: {} (Total: {})",
            self.processed, self.skipped, self.errored, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub file_name: String,
    pub outcome: Outcome,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.outcome)
    }
}

/// Everything a run produced, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub summary: RunSummary,
}

impl BatchReport {
    pub fn record(&mut self, path: PathBuf, file_name: String, outcome: Outcome) {
        self.summary.record(&outcome);
        self.files.push(FileReport {
            path,
            file_name,
            outcome,
        });
    }

    /// Per-file lines followed by the summary block.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(&file.to_string());
            out.push('\n');
        }
        out.push_str("\nSummary:\n");
        out.push_str(&self.summary.to_string());
        out.push('\n');
        out
    }
}
