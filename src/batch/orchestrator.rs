use super::candidate::CandidateFile;
use super::report::{BatchReport, Outcome};
use crate::loudness::{LoudnessCorrector, MeasurementParser};
use crate::tool::ToolInvoker;
use std::path::PathBuf;
use tracing::{debug, info};

/// Runs the corrector over a list of files, one at a time.
pub struct BatchOrchestrator<I, P> {
    corrector: LoudnessCorrector<I, P>,
}

impl<I: ToolInvoker, P: MeasurementParser> BatchOrchestrator<I, P> {
    pub fn new(corrector: LoudnessCorrector<I, P>) -> Self {
        Self { corrector }
    }

    /// Processes `paths` in order. Per-file failures end up in the report and
    /// never stop the batch.
    pub async fn run(&self, paths: &[PathBuf]) -> BatchReport {
        info!("Processing {} file(s)", paths.len());

        let mut report = BatchReport::default();
        for path in paths {
            let candidate = CandidateFile::new(path.clone());
            let outcome = self.process(&candidate).await;
            debug!(file = %candidate.file_name(), outcome = %outcome, "File done");
            report.record(path.clone(), candidate.file_name(), outcome);
        }
        report
    }

    async fn process(&self, candidate: &CandidateFile) -> Outcome {
        match candidate.kind() {
            None => {
                debug!("Skipping unsupported file: {}", candidate.path().display());
                Outcome::Skipped
            }
            Some(kind) => {
                debug!(
                    kind = kind.extension(),
                    "Correcting {}",
                    candidate.path().display()
                );
                Outcome::from_result(self.corrector.correct(candidate.path()).await)
            }
        }
    }
}
