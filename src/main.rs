// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use subtrack::app_config::{Config, LogLevel};
use subtrack::language_utils;
use subtrack::pipeline::SubtitlePipeline;
use subtrack::providers::http::HttpFetcher;
use subtrack::subtitles::RawPayload;
use subtrack::tracks::{ServiceResponse, SubtitleFormat, TrackCandidateBuilder, TrackDescriptor, TrackRanker, TrackSource};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Normalize and align a local subtitle payload, printing the document as JSON
    Normalize {
        /// Payload file (JSON, VTT or SRT)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Track source the payload came from
        #[arg(short, long, default_value = "native")]
        source: TrackSource,

        /// Payload format; guessed from the file extension when omitted
        #[arg(short, long)]
        format: Option<SubtitleFormat>,

        /// The track was generated by speech recognition
        #[arg(short, long)]
        auto_generated: bool,
    },

    /// Flatten a saved service response and rank the candidates
    Rank {
        /// Service response JSON file
        #[arg(value_name = "SERVICE_JSON")]
        service_json: PathBuf,

        /// JSON file with an array of platform-native track descriptors
        #[arg(short, long)]
        native: Option<PathBuf>,

        /// Spoken language of the video
        #[arg(short, long)]
        request_language: Option<String>,

        /// Preferred UI language
        #[arg(short, long)]
        ui_language: Option<String>,
    },

    /// Fetch a track over HTTP and print the aligned document as JSON
    Load {
        /// Track URL
        #[arg(long)]
        url: String,

        /// Track source
        #[arg(short, long, default_value = "native")]
        source: TrackSource,

        /// Track language
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Payload format
        #[arg(short, long, default_value = "json")]
        format: SubtitleFormat,

        /// The track was generated by speech recognition
        #[arg(short, long)]
        auto_generated: bool,
    },

    /// Generate shell completions for subtrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtrack - subtitle normalization and track selection
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(version = "0.1.0")]
#[command(about = "Normalize subtitle payloads and rank subtitle tracks")]
#[command(long_about = "subtrack converts YouTube, service, VK, VTT and SRT subtitles into one timed token model and ranks candidate tracks.

EXAMPLES:
    subtrack normalize timedtext.json -s youtube -a    # Normalize an auto-generated YouTube payload
    subtrack normalize movie.en.vtt                    # Normalize a WebVTT file
    subtrack rank service.json -n native.json -r ru    # Rank candidates for a Russian video
    subtrack load --url https://host/track.json -s vk  # Fetch and normalize a remote track
    subtrack completions bash > subtrack.bash          # Generate bash completions

CONFIGURATION:
    Configuration is read from <config dir>/subtrack/config.json unless --config
    is given. A missing file means built-in defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SUBTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything is let through here; the real level is applied once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subtrack", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref(), cli.log_level)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Normalize {
            file,
            source,
            format,
            auto_generated,
        } => run_normalize(&config, &file, source, format, auto_generated),
        Commands::Rank {
            service_json,
            native,
            request_language,
            ui_language,
        } => {
            let request_language = request_language.unwrap_or_else(|| config.request_language.clone());
            let ui_language = ui_language.unwrap_or_else(|| config.ui_language.clone());
            run_rank(&service_json, native.as_deref(), &request_language, &ui_language)
        }
        Commands::Load {
            url,
            source,
            language,
            format,
            auto_generated,
        } => {
            let track = TrackDescriptor::new(source, language, url)
                .auto_generated(auto_generated)
                .with_format(format);
            run_load(&config, &track).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(path: Option<&Path>, cli_level: Option<CliLogLevel>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_path().ok_or_else(|| anyhow!("Could not determine the config directory"))?,
    };
    debug!("Loading config from {}", path.display());

    let mut config = Config::load(&path)?;
    if let Some(level) = cli_level {
        config.log_level = level.into();
    }
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn guess_format(file: &Path) -> SubtitleFormat {
    match file.extension().and_then(|ext| ext.to_str()).map(|ext| ext.to_lowercase()) {
        Some(ext) if ext == "vtt" => SubtitleFormat::Vtt,
        Some(ext) if ext == "srt" => SubtitleFormat::Srt,
        _ => SubtitleFormat::Json,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON file: {}", path.display()))
}

fn run_normalize(
    config: &Config,
    file: &Path,
    source: TrackSource,
    format: Option<SubtitleFormat>,
    auto_generated: bool,
) -> Result<()> {
    let format = format.unwrap_or_else(|| guess_format(file));
    let content = std::fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file.display()))?;

    let payload = if format.is_text_track() {
        RawPayload::Text(content)
    } else {
        RawPayload::Json(
            serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON file: {}", file.display()))?,
        )
    };

    let track = TrackDescriptor::new(source, config.request_language.as_str(), file.display().to_string())
        .auto_generated(auto_generated)
        .with_format(format);
    let pipeline = SubtitlePipeline::new(Arc::new(HttpFetcher::new(config.network.fetch_timeout_ms)));
    let document = pipeline.process(payload, &track);

    if document.is_empty() {
        warn!("No subtitle lines found in {}", file.display());
    } else {
        info!("Normalized {} lines from {}", document.lines.len(), file.display());
    }
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn run_rank(service_json: &Path, native: Option<&Path>, request_language: &str, ui_language: &str) -> Result<()> {
    let response: ServiceResponse = read_json(service_json)?;
    if response.waiting {
        warn!("The service is still preparing subtitles for this video");
    }
    let native_tracks: Vec<TrackDescriptor> = match native {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let candidates = TrackCandidateBuilder::new().build(&response, native_tracks);
    if candidates.is_empty() {
        return Err(anyhow!("No subtitle candidates available"));
    }

    let ranked = TrackRanker::new(request_language, ui_language).rank(candidates);
    for (position, track) in ranked.iter().enumerate() {
        info!("{:>2}. {} ({})", position + 1, track, language_utils::display_name(&track.language));
    }
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}

async fn run_load(config: &Config, track: &TrackDescriptor) -> Result<()> {
    let pipeline = SubtitlePipeline::from_config(config)?;
    debug!("Loading track {}", track);

    let document = pipeline.load(track).await;
    if document.is_empty() {
        warn!("Track {} produced no subtitle lines", track);
    }
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
