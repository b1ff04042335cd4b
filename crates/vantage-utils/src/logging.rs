//! # Logging Utilities
//!
//! `tracing` setup for hosts embedding the context engine.
//!
//! The engine itself only emits events through the `tracing` macros. Which of
//! them end up where is decided here:
//! - Console output in a pretty or JSON format
//! - An optional daily-rolling log file next to the console output
//! - File-only logging, for hosts whose standard output carries the context
//!   view itself
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: level filter (e.g. `RUST_LOG=debug`, `RUST_LOG=vantage_core=trace`)
//! - `VANTAGE_LOG_FORMAT`: `json` or `pretty` (default: `pretty`)
//! - `VANTAGE_LOG_FILE`: additional log file for [`init_logging`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use vantage_utils::{LogFormat, LogLevel, init_logging_with_level};
//!
//! init_logging_with_level(LogLevel::Debug, LogFormat::Pretty).expect("Failed to initialize logging");
//! tracing::debug!("context engine ready");
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "VANTAGE_LOG_FORMAT";
/// Environment variable naming an extra log file.
pub const FILE_ENV: &str = "VANTAGE_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Human-readable lines (default)
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "text" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize console logging from the environment.
///
/// Reads `RUST_LOG`, `VANTAGE_LOG_FORMAT` and `VANTAGE_LOG_FILE`. Defaults to
/// `warn`, so a host that never sets `RUST_LOG` only sees recovered errors
/// (rejected settings, unwritable destinations).
///
/// ## Errors
///
/// - `InitializationFailed`: a global subscriber is already installed
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var(FORMAT_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LogFormat::Pretty);
    init_console(format, Level::WARN)
}

/// Initialize console logging with an explicit default level.
///
/// `RUST_LOG` still takes precedence when set.
///
/// ## Errors
///
/// - `InitializationFailed`: a global subscriber is already installed
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging.
///
/// Use this when standard output carries the context view, so log lines do
/// not end up between the sections. `directory` receives a
/// `YYYY-MM-DD-vantage.log` file; it is created if missing. The returned guard
/// flushes pending lines when dropped and must be kept alive.
///
/// ## Errors
///
/// - `FileError`: the directory could not be created
/// - `InitializationFailed`: a global subscriber is already installed
pub fn init_logging_for_file(
    directory: &Path,
    level: Option<LogLevel>,
    format: LogFormat,
) -> Result<(PathBuf, WorkerGuard), LoggingError>
{
    std::fs::create_dir_all(directory)?;
    let file_name = log_file_name(&Utc::now().format("%Y-%m-%d").to_string());
    let log_file = directory.join(&file_name);

    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => env_filter(Level::INFO),
    };

    let appender = tracing_appender::rolling::never(directory, &file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_filter(filter)
            .boxed(),
    };

    Registry::default()
        .with(layer)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;
    Ok((log_file, guard))
}

fn log_file_name(day: &str) -> String
{
    format!("{day}-vantage.log")
}

fn env_filter(default_level: Level) -> EnvFilter
{
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()))
}

fn init_console(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let filter = env_filter(default_level);
    let log_file = env::var(FILE_ENV).ok().map(PathBuf::from);

    // Context output goes to stdout, logs go to stderr.
    let console = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr)
            .with_filter(filter.clone())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter.clone())
            .boxed(),
    };

    let file = log_file.map(|path| {
        let directory = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        let appender = tracing_appender::rolling::daily(directory, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // The subscriber lives for the rest of the process.
        std::mem::forget(guard);
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false)
            .with_filter(filter)
            .boxed()
    });

    Registry::default()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Unknown log format name
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Unknown log level name
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// A global subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// Log file or directory could not be created
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
