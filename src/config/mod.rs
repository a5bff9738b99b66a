mod file_config;

pub use file_config::{FileConfig, TargetConfig};

use crate::loudness::LoudnessTarget;
use crate::tool::DEFAULT_PROGRAM;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default upper bound for a single ffmpeg run.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 1800;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub ffmpeg_path: Option<String>,
    pub temp_dir: Option<PathBuf>,
    pub tool_timeout_secs: u64,
    pub recursive: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Executable name or path, resolved by the tool locator.
    pub ffmpeg_path: String,
    /// Directory the per-run temp area is created in.
    pub temp_root: PathBuf,
    /// `None` disables the timeout.
    pub tool_timeout: Option<Duration>,
    pub recursive: bool,
    pub target: LoudnessTarget,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let ffmpeg_path = file
            .ffmpeg_path
            .or_else(|| cli.ffmpeg_path.clone())
            .unwrap_or_else(|| DEFAULT_PROGRAM.to_string());

        let temp_root = file
            .temp_dir
            .map(PathBuf::from)
            .or_else(|| cli.temp_dir.clone())
            .unwrap_or_else(std::env::temp_dir);
        if !temp_root.exists() {
            bail!("Temp directory does not exist: {:?}", temp_root);
        }
        if !temp_root.is_dir() {
            bail!("temp_dir is not a directory: {:?}", temp_root);
        }

        let timeout_secs = file.tool_timeout_secs.unwrap_or(cli.tool_timeout_secs);
        let tool_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let recursive = file.recursive.unwrap_or(cli.recursive);

        let target = resolve_target(file.target.unwrap_or_default())?;

        Ok(Self {
            ffmpeg_path,
            temp_root,
            tool_timeout,
            recursive,
            target,
        })
    }
}

fn resolve_target(file: TargetConfig) -> Result<LoudnessTarget> {
    let defaults = LoudnessTarget::default();
    let target = LoudnessTarget {
        integrated_lufs: file.integrated_lufs.unwrap_or(defaults.integrated_lufs),
        loudness_range: file.loudness_range.unwrap_or(defaults.loudness_range),
        true_peak: file.true_peak.unwrap_or(defaults.true_peak),
        sample_rate: file.sample_rate.unwrap_or(defaults.sample_rate),
        tolerance: file.tolerance.unwrap_or(defaults.tolerance),
    };

    for (name, value) in [
        ("integrated_lufs", target.integrated_lufs),
        ("loudness_range", target.loudness_range),
        ("true_peak", target.true_peak),
        ("tolerance", target.tolerance),
    ] {
        if !value.is_finite() {
            bail!("target.{} must be a finite number, got {}", name, value);
        }
    }
    if target.tolerance < 0.0 {
        bail!("target.tolerance must not be negative, got {}", target.tolerance);
    }
    if target.sample_rate == 0 {
        bail!("target.sample_rate must be greater than zero");
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_temp_root() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&CliConfig::default(), None).unwrap();

        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.temp_root, std::env::temp_dir());
        assert_eq!(config.tool_timeout, None);
        assert!(!config.recursive);
        assert_eq!(config.target, LoudnessTarget::default());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_root = make_temp_root();
        let cli = CliConfig {
            ffmpeg_path: Some("/usr/local/bin/ffmpeg".to_string()),
            temp_dir: Some(temp_root.path().to_path_buf()),
            tool_timeout_secs: 60,
            recursive: true,
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(config.temp_root, temp_root.path());
        assert_eq!(config.tool_timeout, Some(Duration::from_secs(60)));
        assert!(config.recursive);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_root = make_temp_root();
        let cli = CliConfig {
            ffmpeg_path: Some("/cli/ffmpeg".to_string()),
            temp_dir: Some(PathBuf::from("/should/be/overridden")),
            tool_timeout_secs: 60,
            recursive: false,
        };

        let file_config = FileConfig {
            ffmpeg_path: Some("/toml/ffmpeg".to_string()),
            temp_dir: Some(temp_root.path().to_string_lossy().to_string()),
            target: Some(TargetConfig {
                integrated_lufs: Some(-16.0),
                tolerance: Some(0.5),
                ..Default::default()
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.ffmpeg_path, "/toml/ffmpeg");
        assert_eq!(config.temp_root, temp_root.path());
        assert_eq!(config.target.integrated_lufs, -16.0);
        assert_eq!(config.target.tolerance, 0.5);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.tool_timeout, Some(Duration::from_secs(60)));
        assert!(!config.recursive);
        // Defaults for the rest of the target
        assert_eq!(config.target.loudness_range, 7.0);
        assert_eq!(config.target.sample_rate, 44100);
    }

    #[test]
    fn test_resolve_zero_timeout_disables() {
        let file_config = FileConfig {
            tool_timeout_secs: Some(0),
            ..Default::default()
        };
        let cli = CliConfig {
            tool_timeout_secs: 300,
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();
        assert_eq!(config.tool_timeout, None);
    }

    #[test]
    fn test_resolve_nonexistent_temp_dir_error() {
        let cli = CliConfig {
            temp_dir: Some(PathBuf::from("/nonexistent/path/that/should/not/exist")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_temp_dir_not_directory_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            temp_dir: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_resolve_rejects_invalid_target() {
        for target in [
            TargetConfig {
                tolerance: Some(-1.0),
                ..Default::default()
            },
            TargetConfig {
                sample_rate: Some(0),
                ..Default::default()
            },
            TargetConfig {
                integrated_lufs: Some(f64::NAN),
                ..Default::default()
            },
        ] {
            let file_config = FileConfig {
                target: Some(target),
                ..Default::default()
            };
            let result = AppConfig::resolve(&CliConfig::default(), Some(file_config));
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("target."));
        }
    }
}
