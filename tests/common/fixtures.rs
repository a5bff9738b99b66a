//! Temp-dir fixtures for source audio files and the run's temp area.

use loudness_normalizer::loudness::{Ebur128Parser, LoudnessCorrector, LoudnessTarget};
use loudness_normalizer::tool::ToolInvoker;
use loudness_normalizer::BatchOrchestrator;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ORIGINAL_BYTES: &[u8] = b"ID3 original audio bytes";
pub const CORRECTED_BYTES: &[u8] = b"ID3 corrected audio bytes";

/// ebur128 diagnostic text reporting `reading` as the integrated loudness.
pub fn measurement_output(reading: f64) -> String {
    format!(
        "[Parsed_ebur128_0 @ 0x7f8] Summary:\n\
         \n  Integrated loudness:\n    I:         {:.2} LUFS\n    Threshold: -23.5 LUFS\n\
         \n  True peak:\n    Peak:       -1.0 dBFS\n",
        reading
    )
}

/// A media directory for source files plus an empty temp area.
pub struct AudioFixture {
    _dir: TempDir,
    pub media_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl AudioFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let media_dir = dir.path().join("media");
        let temp_dir = dir.path().join("tmp");
        fs::create_dir_all(&media_dir).unwrap();
        fs::create_dir_all(&temp_dir).unwrap();
        Self {
            _dir: dir,
            media_dir,
            temp_dir,
        }
    }

    /// Writes a source file with [`ORIGINAL_BYTES`] and returns its path.
    pub fn write(&self, file_name: &str) -> PathBuf {
        let path = self.media_dir.join(file_name);
        fs::write(&path, ORIGINAL_BYTES).unwrap();
        path
    }

    pub fn contents(&self, path: &Path) -> Vec<u8> {
        fs::read(path).unwrap()
    }

    /// Number of entries left in the temp area.
    pub fn temp_entries(&self) -> usize {
        fs::read_dir(&self.temp_dir).unwrap().count()
    }

    pub fn corrector<I: ToolInvoker>(&self, invoker: I) -> LoudnessCorrector<I, Ebur128Parser> {
        LoudnessCorrector::new(
            invoker,
            Ebur128Parser,
            &self.temp_dir,
            LoudnessTarget::default(),
        )
    }

    pub fn orchestrator<I: ToolInvoker>(&self, invoker: I) -> BatchOrchestrator<I, Ebur128Parser> {
        BatchOrchestrator::new(self.corrector(invoker))
    }
}
