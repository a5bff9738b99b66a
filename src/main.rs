use anyhow::{Context, Result};
use clap::Parser;
use loudness_normalizer::batch::{expand_inputs, resolve_input, BatchOrchestrator};
use loudness_normalizer::config::{AppConfig, CliConfig, FileConfig, DEFAULT_TOOL_TIMEOUT_SECS};
use loudness_normalizer::loudness::{Ebur128Parser, LoudnessCorrector};
use loudness_normalizer::tool::{self, FfmpegInvoker};
use rustyline::DefaultEditor;
use std::io::IsTerminal;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{debug, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;
use cli_style::get_styles;

const PROMPT: &str = "Enter the path to the audio file: ";

/// Normalizes audio files to a target integrated loudness with ffmpeg,
/// replacing each file only after the result has been measured.
#[derive(Parser, Debug)]
#[command(styles=get_styles(), version)]
struct CliArgs {
    /// Audio files or directories to process. When omitted, a single path is
    /// read from an interactive prompt.
    pub paths: Vec<String>,

    /// Path to a TOML config file. Its values take precedence over flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// ffmpeg executable: a path, or a name to look up on PATH (default: ffmpeg).
    #[clap(long)]
    pub ffmpeg_path: Option<String>,

    /// Directory in which the per-run temp area is created (default: system temp).
    #[clap(long)]
    pub temp_dir: Option<PathBuf>,

    /// Seconds after which a single ffmpeg run is killed. 0 disables the limit.
    #[clap(long, default_value_t = DEFAULT_TOOL_TIMEOUT_SECS)]
    pub tool_timeout_secs: u64,

    /// Descend into subdirectories of directory arguments.
    #[clap(short, long)]
    pub recursive: bool,

    /// Print the report without colors.
    #[clap(long)]
    pub plain: bool,

    /// Log at debug level unless LOG_LEVEL says otherwise.
    #[clap(short, long)]
    pub verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")
}

fn prompt_for_path() -> Result<String> {
    let mut editor = DefaultEditor::new().context("Failed to open interactive prompt")?;
    editor.readline(PROMPT).context("No file path entered")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_logging(cli_args.verbose)?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        ffmpeg_path: cli_args.ffmpeg_path.clone(),
        temp_dir: cli_args.temp_dir.clone(),
        tool_timeout_secs: cli_args.tool_timeout_secs,
        recursive: cli_args.recursive,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;
    debug!(?config, "Resolved configuration");

    // Nothing is read or written before the tool is known to work
    let ffmpeg = tool::locate(&config.ffmpeg_path).await?;

    let raw_paths = if cli_args.paths.is_empty() {
        vec![prompt_for_path()?]
    } else {
        cli_args.paths.clone()
    };
    debug!(?raw_paths, "Received file paths");

    let resolved = raw_paths
        .iter()
        .map(|raw| resolve_input(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let files = expand_inputs(&resolved, config.recursive)?;

    let temp_area = tempfile::Builder::new()
        .prefix("loudness-normalizer-")
        .tempdir_in(&config.temp_root)
        .with_context(|| format!("Failed to create temp area in {:?}", config.temp_root))?;
    debug!("Temp area: {}", temp_area.path().display());

    let corrector = LoudnessCorrector::new(
        FfmpegInvoker::new(ffmpeg, config.tool_timeout),
        Ebur128Parser,
        temp_area.path(),
        config.target,
    );
    let report = BatchOrchestrator::new(corrector).run(&files).await;

    if cli_args.plain || !std::io::stdout().is_terminal() {
        print!("{}", report.render());
    } else {
        cli_style::print_report(&report);
    }

    close_temp_area(temp_area);
    Ok(())
}

/// Removes the run's temp area. The report is already out, so a failure here
/// is only logged.
fn close_temp_area(temp_area: TempDir) -> bool {
    let temp_path = temp_area.path().to_path_buf();
    match temp_area.close() {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to remove temp area {}: {}", temp_path.display(), e);
            false
        }
    }
}
