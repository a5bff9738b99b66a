//! Running ffmpeg operations as child processes.

use crate::loudness::LoudnessTarget;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors produced while running an external tool operation.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} exited with {}", describe_code(.code))]
    Exited {
        operation: &'static str,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("{operation} timed out after {}s", .timeout.as_secs())]
    TimedOut {
        operation: &'static str,
        timeout: Duration,
    },
}

impl InvokeError {
    /// Exit code of the process, when it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvokeError::Exited { code, .. } => *code,
            _ => None,
        }
    }

    /// Diagnostic text captured before the failure.
    pub fn diagnostics(&self) -> &str {
        match self {
            InvokeError::Exited { diagnostics, .. } => diagnostics,
            _ => "",
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// An operation the external tool can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOperation {
    /// Loudness correction; writes a new media file at `output`.
    Correct {
        input: PathBuf,
        output: PathBuf,
        target: LoudnessTarget,
    },
    /// Loudness measurement; produces diagnostic text only.
    Measure { input: PathBuf },
}

impl ToolOperation {
    pub fn name(&self) -> &'static str {
        match self {
            ToolOperation::Correct { .. } => "correction",
            ToolOperation::Measure { .. } => "measurement",
        }
    }

    /// Command-line arguments for ffmpeg.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-nostdin".into()];
        match self {
            ToolOperation::Correct {
                input,
                output,
                target,
            } => {
                args.push("-y".into());
                args.push("-i".into());
                args.push(input.clone().into_os_string());
                args.push("-vn".into());
                args.push("-af".into());
                args.push(target.loudnorm_filter().into());
                args.push("-ar".into());
                args.push(target.sample_rate.to_string().into());
                args.push(output.clone().into_os_string());
            }
            ToolOperation::Measure { input } => {
                args.push("-i".into());
                args.push(input.clone().into_os_string());
                args.extend(
                    ["-vn", "-filter:a", "ebur128=peak=true", "-f", "null", "-"]
                        .into_iter()
                        .map(OsString::from),
                );
            }
        }
        args
    }
}

/// Runs tool operations to completion.
///
/// Implementations return the accumulated diagnostic text on a zero exit status
/// and never interpret it.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn run(&self, operation: &ToolOperation) -> Result<String, InvokeError>;
}

#[async_trait]
impl<T: ToolInvoker + ?Sized> ToolInvoker for Arc<T> {
    async fn run(&self, operation: &ToolOperation) -> Result<String, InvokeError> {
        (**self).run(operation).await
    }
}

/// Invokes a resolved ffmpeg executable.
#[derive(Debug, Clone)]
pub struct FfmpegInvoker {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl FfmpegInvoker {
    pub fn new(program: impl Into<PathBuf>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ToolInvoker for FfmpegInvoker {
    async fn run(&self, operation: &ToolOperation) -> Result<String, InvokeError> {
        let args = operation.ffmpeg_args();
        debug!(
            program = %self.program.display(),
            args = ?args,
            "Executing {}",
            operation.name()
        );

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InvokeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Dropping the pending future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| InvokeError::TimedOut {
                    operation: operation.name(),
                    timeout,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| InvokeError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            debug!(
                code = ?output.status.code(),
                diagnostics = %diagnostics,
                "{} failed",
                operation.name()
            );
            return Err(InvokeError::Exited {
                operation: operation.name(),
                code: output.status.code(),
                diagnostics,
            });
        }

        Ok(diagnostics)
    }
}
