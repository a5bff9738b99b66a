//! Locating the ffmpeg executable before any work starts.

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_PROGRAM: &str = "ffmpeg";

#[derive(Debug, Error)]
pub enum ToolUnavailable {
    #[error("{0} was not found on PATH. Please install ffmpeg or pass --ffmpeg-path.")]
    NotOnPath(String),

    #[error("ffmpeg not found at {0:?}. Please ensure it exists or pass another --ffmpeg-path.")]
    Missing(PathBuf),

    #[error("ffmpeg at {path:?} is not working: {reason}")]
    ProbeFailed { path: PathBuf, reason: String },
}

/// Resolves the executable path.
///
/// A value containing a path separator is taken as a file path; a bare name
/// is searched for in the directories of `PATH`.
pub fn resolve_program(program: &str) -> Result<PathBuf, ToolUnavailable> {
    resolve_program_in(program, env::var_os("PATH").as_deref())
}

fn resolve_program_in(
    program: &str,
    path_var: Option<&OsStr>,
) -> Result<PathBuf, ToolUnavailable> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        if candidate.is_file() {
            return Ok(candidate.to_path_buf());
        }
        return Err(ToolUnavailable::Missing(candidate.to_path_buf()));
    }

    path_var
        .into_iter()
        .flat_map(|paths| env::split_paths(paths))
        .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
        .find(|path| path.is_file())
        .ok_or_else(|| ToolUnavailable::NotOnPath(program.to_string()))
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    [program.to_string(), format!("{}.exe", program)].into_iter()
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> {
    std::iter::once(program.to_string())
}

/// Checks that the program runs, using `-version`.
pub async fn probe_program(path: &Path) -> Result<(), ToolUnavailable> {
    let output = Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| ToolUnavailable::ProbeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ToolUnavailable::ProbeFailed {
            path: path.to_path_buf(),
            reason: format!("-version exited with {}", output.status),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout);
    debug!(
        version = version.lines().next().unwrap_or(""),
        "Probed {}",
        path.display()
    );
    Ok(())
}

/// Resolves and probes the program in one step.
pub async fn locate(program: &str) -> Result<PathBuf, ToolUnavailable> {
    let path = resolve_program(program)?;
    probe_program(&path).await?;
    info!("Using ffmpeg at {}", path.display());
    Ok(path)
}
