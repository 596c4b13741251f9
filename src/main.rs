// LogcatLens - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Dispatch to load / live / save
//
// Records go to stdout (plain threadtime lines or JSON); diagnostics go to
// stderr through tracing.

use clap::{Args, Parser, Subcommand};
use logcatlens::app::feed::{self, LiveFeed};
use logcatlens::app::session::{LineOutcome, LogSession};
use logcatlens::core::converter::LogFormat;
use logcatlens::core::filter::FilterInputs;
use logcatlens::core::model::LogRecord;
use logcatlens::core::serializer;
use logcatlens::platform::config::{self, AppConfig, PlatformPaths};
use logcatlens::util;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// LogcatLens - Android logcat viewer for the terminal.
///
/// Load a saved capture or pipe `adb logcat` into it, filter by message,
/// tag, package, PID, TID, level and time window, pin records and save
/// the result in canonical threadtime layout.
#[derive(Parser, Debug)]
#[command(name = "LogcatLens", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Use this config.toml instead of the platform default.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a log file, detect its format, and print the filtered records.
    Load {
        /// Log file to read.
        file: PathBuf,

        /// Skip detection and parse with this format.
        #[arg(long)]
        format: Option<LogFormat>,

        /// Pin these rows of the filtered view and list the marks.
        #[arg(short = 'm', long = "mark")]
        mark: Vec<usize>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read a live logcat stream from stdin, printing records as they pass.
    Live {
        /// Converter for incoming lines.
        #[arg(long, default_value_t = LogFormat::Threadtime)]
        format: LogFormat,

        /// Save everything received (filtered or not) here on end of stream.
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Re-save a log file in canonical threadtime layout.
    Save {
        /// Log file to read.
        input: PathBuf,

        /// Destination (replaced atomically).
        output: PathBuf,

        /// Skip detection and parse with this format.
        #[arg(long)]
        format: Option<LogFormat>,
    },
}

/// Filter flags shared by `load` and `live`. Each overrides the matching
/// `[filters]` value from config.toml.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Message keywords (`a||b`, `a|b`, `a&&b`).
    #[arg(long)]
    message: Option<String>,

    /// Tag keywords.
    #[arg(long)]
    tag: Option<String>,

    /// Package keywords.
    #[arg(long)]
    package: Option<String>,

    /// Exact PID values.
    #[arg(long)]
    pid: Option<String>,

    /// Exact TID values.
    #[arg(long)]
    tid: Option<String>,

    /// Minimum level (V, D, I, W, E, A or the level name).
    #[arg(short = 'l', long)]
    level: Option<String>,

    /// Inclusive start time, e.g. 12:34:00.000.
    #[arg(long)]
    start: Option<String>,

    /// Inclusive end time.
    #[arg(long)]
    end: Option<String>,
}

impl FilterArgs {
    /// Overlay the flags that were given onto `defaults`.
    fn apply(&self, defaults: &FilterInputs) -> FilterInputs {
        let mut inputs = defaults.clone();
        let overrides = [
            (&self.message, &mut inputs.message),
            (&self.tag, &mut inputs.tag),
            (&self.package, &mut inputs.package),
            (&self.pid, &mut inputs.pid),
            (&self.tid, &mut inputs.tid),
            (&self.level, &mut inputs.min_level),
            (&self.start, &mut inputs.start_time),
            (&self.end, &mut inputs.end_time),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = value.clone();
            }
        }
        inputs
    }
}

#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Emit JSON instead of threadtime lines.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogcatLens starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(cli.command, &app_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, app_config: &AppConfig) -> Result<(), CliError> {
    match command {
        Command::Load {
            file,
            format,
            mark,
            filters,
            output,
        } => {
            let mut session = new_session(app_config);
            let summary = session.load_file(&file, format)?;
            let inputs = filters.apply(&app_config.default_filters);
            session.set_inputs(inputs);

            for row in mark {
                if !session.mark(row) {
                    tracing::warn!(row, "Cannot mark row: not in the filtered view");
                }
            }

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            if output.json {
                let report = serde_json::json!({
                    "file": file,
                    "format": summary.format,
                    "stats": summary.stats,
                    "showing": session.visible_count(),
                    "total": session.total_count(),
                    "records": session.visible_records().collect::<Vec<_>>(),
                    "marks": mark_report(&session),
                });
                serde_json::to_writer_pretty(&mut out, &report)?;
                writeln!(out)?;
            } else {
                for record in session.visible_records() {
                    writeln!(out, "{}", serializer::format_record(record))?;
                }
                if !session.marks().is_empty() {
                    writeln!(out, "# Marks")?;
                    for (i, m) in session.marks().iter().enumerate() {
                        writeln!(
                            out,
                            "# [{i}] row {}: {}",
                            m.original_index,
                            serializer::format_record(&m.record)
                        )?;
                    }
                }
            }
            out.flush()?;
            eprintln!(
                "{} ({}, {}/{} lines parsed)",
                session.status_line(),
                summary.format,
                summary.stats.parsed_count,
                summary.stats.line_count
            );
            Ok(())
        }

        Command::Live {
            format,
            save,
            filters,
            output,
        } => {
            let mut session = new_session(app_config);
            session.set_converter(format);
            let inputs = filters.apply(&app_config.default_filters);
            session.set_inputs(inputs);

            let (mut rx, reader) = feed::spawn_reader(io::BufReader::new(io::stdin()));
            let live = LiveFeed::new();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let mut write_error: Option<io::Error> = None;

            let stats = live.pump(&mut session, &mut rx, |session, outcome| {
                let LineOutcome::Visible { row } = outcome else {
                    return;
                };
                if write_error.is_some() {
                    return;
                }
                if let Some(record) = session.record_at(row) {
                    if let Err(e) = print_live(&mut out, record, output.json) {
                        write_error = Some(e);
                    }
                }
            })?;
            drop(rx);
            if reader.join().is_err() {
                tracing::warn!("Stdin reader thread panicked");
            }
            if let Some(e) = write_error {
                return Err(e.into());
            }

            if let Some(path) = save {
                let count = session.save_file(&path)?;
                eprintln!("Saved {count} records to {}", path.display());
            }
            eprintln!(
                "{} ({} rejected, {} dropped)",
                session.status_line(),
                stats.rejected,
                stats.dropped
            );
            Ok(())
        }

        Command::Save {
            input,
            output,
            format,
        } => {
            let mut session = new_session(app_config);
            let summary = session.load_file(&input, format)?;
            let count = session.save_file(&output)?;
            eprintln!(
                "Saved {count} records to {} (read as {})",
                output.display(),
                summary.format
            );
            Ok(())
        }
    }
}

fn new_session(app_config: &AppConfig) -> LogSession {
    LogSession::with_candidates(app_config.candidates.clone())
        .with_history_capacity(app_config.history_size)
}

fn mark_report(session: &LogSession) -> Vec<serde_json::Value> {
    session
        .marks()
        .iter()
        .map(|m| serde_json::json!({ "row": m.original_index, "record": m.record }))
        .collect()
}

fn print_live<W: Write>(out: &mut W, record: &LogRecord, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", serializer::format_record(record))?;
    }
    out.flush()
}

// =============================================================================
// CLI errors
// =============================================================================

/// Everything a subcommand can fail with.
#[derive(Debug)]
enum CliError {
    Engine(util::error::LogcatLensError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "Output failed: {e}"),
            CliError::Json(e) => write!(f, "JSON output failed: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Engine(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Json(e) => Some(e),
        }
    }
}

impl From<util::error::LogcatLensError> for CliError {
    fn from(e: util::error::LogcatLensError) -> Self {
        CliError::Engine(e)
    }
}

impl From<util::error::FileError> for CliError {
    fn from(e: util::error::FileError) -> Self {
        CliError::Engine(e.into())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
