//! Input paths: cleanup, resolution and type tagging.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Empty path")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to list {}: {reason}", .path.display())]
    Walk { path: PathBuf, reason: String },
}

/// Supported audio file extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "flac"];

/// Audio container types the normalizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// Lossy compressed.
    Mp3,
    /// Uncompressed PCM.
    Wav,
    /// Lossless compressed.
    Flac,
}

impl AudioKind {
    /// Tags a path by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())?;

        match ext.as_str() {
            "mp3" => Some(AudioKind::Mp3),
            "wav" => Some(AudioKind::Wav),
            "flac" => Some(AudioKind::Flac),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioKind::Mp3 => "mp3",
            AudioKind::Wav => "wav",
            AudioKind::Flac => "flac",
        }
    }
}

/// A path considered for processing, with its derived type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    path: PathBuf,
    kind: Option<AudioKind>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = AudioKind::from_path(&path);
        Self { path, kind }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the type is unsupported.
    pub fn kind(&self) -> Option<AudioKind> {
        self.kind
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Removes one pair of surrounding quotes, as left behind by drag-and-drop
/// into a terminal. Opening and closing quote may differ.
pub fn strip_quotes(input: &str) -> &str {
    let trimmed = input.trim();
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &trimmed[1..trimmed.len() - 1]
        }
        _ => trimmed,
    }
}

/// Turns raw user input into an absolute path of something that exists.
pub fn resolve_input(raw: &str) -> Result<PathBuf, InputError> {
    let cleaned = strip_quotes(raw);
    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }

    let path = PathBuf::from(cleaned);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };

    if !absolute.exists() {
        return Err(InputError::NotFound(absolute));
    }
    Ok(absolute)
}

/// Replaces directories with the files they contain, sorted by name.
///
/// Only the directory's own entries are listed unless `recursive` is set.
/// Symlinks to files are listed like regular files.
pub fn expand_inputs(paths: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, InputError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path).min_depth(1).sort_by_file_name();
        let walker = if recursive {
            walker
        } else {
            walker.max_depth(1)
        };
        for entry in walker {
            let entry = entry.map_err(|e| InputError::Walk {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            // Symlinked files count; symlinked directories are not descended
            if entry.path().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
