use super::parser::{parse_loudnorm_summary, parse_true_peak, MeasurementParser};
use super::target::LoudnessTarget;
use crate::tool::{InvokeError, ToolInvoker, ToolOperation};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-file failures of a correction attempt.
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("cannot access {}: {reason}", .path.display())]
    Access { path: PathBuf, reason: String },

    #[error(transparent)]
    Tool(#[from] InvokeError),

    #[error("correction produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Unable to determine loudness value")]
    MeasurementAbsent,

    #[error("failed to replace {}: {source}", .path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How a completed attempt was decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Reading inside the window; the corrected file replaced the source.
    Committed(f64),
    /// Reading outside the window; the source was left untouched.
    Discarded(f64),
}

/// One correction attempt for a single source file.
#[derive(Debug, Clone)]
pub struct CorrectionJob {
    source: PathBuf,
    temp_output: PathBuf,
    target: LoudnessTarget,
}

impl CorrectionJob {
    /// The temp output keeps the source's file name (so ffmpeg picks the same
    /// container) behind a per-job UUID.
    pub fn new(source: &Path, temp_dir: &Path, target: LoudnessTarget) -> Self {
        let base_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let temp_output = temp_dir.join(format!(
            "normalized_{}_{}",
            Uuid::new_v4().simple(),
            base_name
        ));
        Self {
            source: source.to_path_buf(),
            temp_output,
            target,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn temp_output(&self) -> &Path {
        &self.temp_output
    }

    pub fn target(&self) -> &LoudnessTarget {
        &self.target
    }

    /// Removes the temp output if it is still on disk.
    pub async fn cleanup(&self) {
        match fs::remove_file(&self.temp_output).await {
            Ok(()) => debug!("Removed temp file: {}", self.temp_output.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove temp file {}: {}",
                self.temp_output.display(),
                e
            ),
        }
    }
}

/// Drives the correct-then-verify workflow for single files.
pub struct LoudnessCorrector<I, P> {
    invoker: I,
    parser: P,
    temp_dir: PathBuf,
    target: LoudnessTarget,
}

impl<I: ToolInvoker, P: MeasurementParser> LoudnessCorrector<I, P> {
    pub fn new(
        invoker: I,
        parser: P,
        temp_dir: impl Into<PathBuf>,
        target: LoudnessTarget,
    ) -> Self {
        Self {
            invoker,
            parser,
            temp_dir: temp_dir.into(),
            target,
        }
    }

    /// Corrects `source` in place if the verification pass accepts the result.
    ///
    /// The job's temp file never outlives this call, whatever the result.
    pub async fn correct(&self, source: &Path) -> Result<Verdict, CorrectionError> {
        let job = CorrectionJob::new(source, &self.temp_dir, self.target);
        debug!(
            source = %job.source().display(),
            temp = %job.temp_output().display(),
            "Processing file"
        );

        let result = self.run_job(&job).await;
        job.cleanup().await;
        result
    }

    async fn run_job(&self, job: &CorrectionJob) -> Result<Verdict, CorrectionError> {
        validate_source(job.source()).await?;

        let diagnostics = self
            .invoker
            .run(&ToolOperation::Correct {
                input: job.source().to_path_buf(),
                output: job.temp_output().to_path_buf(),
                target: *job.target(),
            })
            .await?;
        let summary = parse_loudnorm_summary(&diagnostics);
        debug!(
            input_integrated = ?summary.input_integrated,
            output_integrated = ?summary.output_integrated,
            "Correction completed"
        );
        ensure_output(job.temp_output()).await?;

        let diagnostics = self
            .invoker
            .run(&ToolOperation::Measure {
                input: job.temp_output().to_path_buf(),
            })
            .await?;
        let reading = match self.parser.integrated_loudness(&diagnostics) {
            Some(reading) => reading,
            None => {
                debug!("Loudness data not found in measurement output");
                return Err(CorrectionError::MeasurementAbsent);
            }
        };
        debug!(
            reading,
            true_peak = ?parse_true_peak(&diagnostics),
            "Parsed loudness value"
        );

        if job.target().accepts(reading) {
            commit(job.temp_output(), job.source()).await?;
            info!(
                "Replaced {} ({:.2} LUFS)",
                job.source().display(),
                reading
            );
            Ok(Verdict::Committed(reading))
        } else {
            warn!(
                "Failed loudness check for {}: {:.2} LUFS",
                job.source().display(),
                reading
            );
            Ok(Verdict::Discarded(reading))
        }
    }
}

async fn validate_source(path: &Path) -> Result<(), CorrectionError> {
    let access_error = |reason: String| CorrectionError::Access {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| access_error(e.to_string()))?;
    if !metadata.is_file() {
        return Err(access_error("not a regular file".to_string()));
    }
    fs::File::open(path)
        .await
        .map_err(|e| access_error(e.to_string()))?;

    debug!("File exists and is readable: {}", path.display());
    Ok(())
}

async fn ensure_output(path: &Path) -> Result<(), CorrectionError> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() && metadata.len() > 0 => Ok(()),
        _ => Err(CorrectionError::MissingOutput(path.to_path_buf())),
    }
}

/// Moves the corrected file over the source.
///
/// A plain rename fails when the temp area is on another filesystem; the
/// fallback copies into a staging file beside the source and renames that, so
/// the source is still replaced in a single step.
async fn commit(temp: &Path, source: &Path) -> Result<(), CorrectionError> {
    let err = match fs::rename(temp, source).await {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    debug!(error = %err, "Rename failed, staging next to source");

    let staging = staging_path(source);
    let staged = match fs::copy(temp, &staging).await {
        Ok(_) => fs::rename(&staging, source).await,
        Err(e) => Err(e),
    };
    if let Err(source_err) = staged {
        let _ = fs::remove_file(&staging).await;
        return Err(CorrectionError::Commit {
            path: source.to_path_buf(),
            source: source_err,
        });
    }
    Ok(())
}

fn staging_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!(".{}.{}.partial", name, Uuid::new_v4().simple()))
}
