//! Run-Scoped Logging
//!
//! Every execution (the CLI, or a front end re-running its setup) gets its
//! own log directory and log file:
//!
//! ```text
//! logs/<YYYYMMDD>/<app>_<YYYYMMDD_HHMMSS>/<app>_<YYYYMMDD_HHMMSS>.log
//! ```
//!
//! The subscriber is installed process-wide the first time a [`RunLogger`] is
//! created, so events from any thread are captured. A logger attaches at most
//! one console sink and one file sink; calling
//! [`RunLogger::configure_run_logger`] again detaches and flushes the previous
//! sinks before attaching new ones, so repeated setup never duplicates output.
//!
//! # Best Practices
//!
//! 1. **Use `tracing` macros, never `println!` or `eprintln!`**
//! 2. **Pick the level by audience**:
//!    - `debug!`: per-entry decisions (skipped files, resolved settings)
//!    - `info!`: progress of a run
//!    - `warn!`: nothing to do, but not a failure
//!    - `error!`: a failed precondition or read
//!
//! # Example
//!
//! ```no_run
//! use docagent_common::logging::{LogConfig, LogLevel, RunLogger};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder()
//!         .level(LogLevel::Debug)
//!         .log_dir("./logs")
//!         .build();
//!
//!     let mut logger = RunLogger::new(config)?;
//!     let log_file = logger.configure_run_logger("streamlit_ui")?;
//!     info!("Run log stored at {}", log_file.display());
//!     Ok(())
//! }
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tracing::{info, Event, Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format, FmtContext, FormatEvent, FormatFields},
    layer::{Layered, SubscriberExt},
    registry::LookupSpan,
    reload, EnvFilter, Layer, Registry,
};

/// `strftime` pattern of the per-day directory
pub const DATE_SEGMENT_FORMAT: &str = "%Y%m%d";

/// `strftime` pattern of the per-run directory and file suffix
pub const RUN_SEGMENT_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extension of run log files
pub const LOG_FILE_EXTENSION: &str = "log";

const LINE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Log level for filtering messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow::anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Line format shared by the console and file sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `timestamp | LEVEL | target | message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum log level to record
    pub level: LogLevel,

    /// Line format for both sinks
    pub format: LogFormat,

    /// Root under which per-day and per-run directories are created
    pub log_dir: PathBuf,

    /// Additional filter directives (e.g., "docagent_ingest=debug")
    pub filter_directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            log_dir: PathBuf::from("./logs"),
            filter_directives: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// - `LOG_LEVEL`: trace, debug, info, warn, error
    /// - `LOG_FORMAT`: text, json
    /// - `LOG_DIR`: root directory for run logs
    /// - `LOG_FILTER`: additional filter directives
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.level = level.parse()?;
        }

        if let Ok(format) = std::env::var("LOG_FORMAT") {
            config.format = format.parse()?;
        }

        if let Ok(dir) = std::env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        if let Ok(filter) = std::env::var("LOG_FILTER") {
            config.filter_directives = Some(filter);
        }

        Ok(config)
    }

    pub fn builder() -> LogConfigBuilder {
        LogConfigBuilder::default()
    }
}

/// Builder for LogConfig
#[derive(Default)]
pub struct LogConfigBuilder {
    config: LogConfig,
}

impl LogConfigBuilder {
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = dir.into();
        self
    }

    pub fn filter_directives(mut self, filter: impl Into<String>) -> Self {
        self.config.filter_directives = Some(filter.into());
        self
    }

    pub fn build(self) -> LogConfig {
        self.config
    }
}

/// Directory and file locations of one run's log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogPaths {
    /// `<log_dir>/<date>/<app>_<timestamp>`
    pub run_dir: PathBuf,

    /// `<app>_<timestamp>`, the log file name without extension
    pub file_stem: String,

    /// `<run_dir>/<app>_<timestamp>.log`
    pub log_file: PathBuf,
}

impl RunLogPaths {
    pub fn new(log_dir: &Path, app_name: &str, now: DateTime<Local>) -> Self {
        let date_segment = now.format(DATE_SEGMENT_FORMAT).to_string();
        let run_segment = now.format(RUN_SEGMENT_FORMAT).to_string();

        let file_stem = format!("{}_{}", app_name, run_segment);
        let run_dir = log_dir.join(date_segment).join(&file_stem);
        let log_file = run_dir.join(format!("{}.{}", file_stem, LOG_FILE_EXTENSION));

        Self {
            run_dir,
            file_stem,
            log_file,
        }
    }
}

/// An output attached to the run logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Console,
    File(PathBuf),
}

type FilterLayer = reload::Layer<EnvFilter, Registry>;
type BaseSubscriber = Layered<FilterLayer, Registry>;
type SinkLayer = Box<dyn Layer<BaseSubscriber> + Send + Sync + 'static>;

/// Reload handles of the process-wide subscriber
struct LogHandles {
    filter: reload::Handle<EnvFilter, Registry>,
    sinks: reload::Handle<Vec<SinkLayer>, BaseSubscriber>,
    /// Id of the logger whose sinks are attached
    owner: Mutex<Option<u64>>,
}

static LOG_HANDLES: OnceLock<std::result::Result<LogHandles, String>> = OnceLock::new();
static NEXT_LOGGER_ID: AtomicU64 = AtomicU64::new(1);

/// Install the global subscriber on first use and return its handles.
///
/// The subscriber starts with a pass-everything filter and no sinks; each
/// [`RunLogger`] reloads both.
fn global_handles() -> Result<&'static LogHandles> {
    LOG_HANDLES
        .get_or_init(|| {
            let (filter_layer, filter) = reload::Layer::new(EnvFilter::new("trace"));
            let (sinks_layer, sinks) = reload::Layer::new(Vec::new());

            let subscriber = tracing_subscriber::registry()
                .with(filter_layer)
                .with(sinks_layer);
            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| e.to_string())?;

            Ok(LogHandles {
                filter,
                sinks,
                owner: Mutex::new(None),
            })
        })
        .as_ref()
        .map_err(|e| anyhow!("Failed to install global subscriber: {}", e))
}

/// Owns the logging pipeline of one entry point.
///
/// The subscriber itself is process-wide, so events from every thread reach
/// the attached sinks. The logger that configured last owns the sinks;
/// dropping it detaches them and flushes the active log file.
pub struct RunLogger {
    id: u64,
    config: LogConfig,
    handles: &'static LogHandles,
    sinks: Vec<LogSink>,
    file_guard: Option<WorkerGuard>,
}

impl RunLogger {
    /// Apply the config's level filter to the global subscriber. No sinks
    /// are attached yet.
    pub fn new(config: LogConfig) -> Result<Self> {
        let filter = build_filter(&config)?;
        let handles = global_handles()?;
        handles
            .filter
            .reload(filter)
            .context("Failed to apply log filter")?;

        Ok(Self {
            id: NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed),
            config,
            handles,
            sinks: Vec::new(),
            file_guard: None,
        })
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Sinks currently receiving events
    pub fn sinks(&self) -> &[LogSink] {
        &self.sinks
    }

    /// Start a new run log for `app_name` using the current local time.
    ///
    /// Returns the path of the new log file.
    pub fn configure_run_logger(&mut self, app_name: &str) -> Result<PathBuf> {
        self.configure_run_logger_at(app_name, Local::now())
    }

    /// Same as [`RunLogger::configure_run_logger`] with an explicit timestamp
    pub fn configure_run_logger_at(
        &mut self,
        app_name: &str,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let paths = RunLogPaths::new(&self.config.log_dir, app_name, now);
        std::fs::create_dir_all(&paths.run_dir).with_context(|| {
            format!("Failed to create log directory {}", paths.run_dir.display())
        })?;

        self.detach_sinks()?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(paths.file_stem.clone())
            .filename_suffix(LOG_FILE_EXTENSION)
            .build(&paths.run_dir)
            .with_context(|| format!("Failed to open log file {}", paths.log_file.display()))?;
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

        {
            let mut owner = self.lock_owner()?;
            self.handles
                .sinks
                .reload(sink_layers(self.config.format, file_writer))
                .context("Failed to attach log sinks")?;
            *owner = Some(self.id);
        }
        self.file_guard = Some(file_guard);
        self.sinks = vec![LogSink::Console, LogSink::File(paths.log_file.clone())];

        info!("Logging initialised; writing file logs to {}", paths.log_file.display());
        Ok(paths.log_file)
    }

    /// Remove all sinks, flushing and closing the current log file.
    ///
    /// Sinks attached by another logger since this one was configured are
    /// left in place.
    pub fn detach_sinks(&mut self) -> Result<()> {
        {
            let mut owner = self.lock_owner()?;
            if *owner == Some(self.id) {
                self.handles
                    .sinks
                    .reload(Vec::new())
                    .context("Failed to detach log sinks")?;
                *owner = None;
            }
        }
        // Dropping the guard blocks until the writer thread has flushed.
        drop(self.file_guard.take());
        self.sinks.clear();
        Ok(())
    }

    fn lock_owner(&self) -> Result<MutexGuard<'static, Option<u64>>> {
        self.handles
            .owner
            .lock()
            .map_err(|_| anyhow!("Log sink owner lock poisoned"))
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        let _ = self.detach_sinks();
    }
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(config.level.to_tracing_level().into());

    if let Some(ref directives) = config.filter_directives {
        for directive in directives.split(',').filter(|d| !d.trim().is_empty()) {
            filter = filter.add_directive(
                directive
                    .trim()
                    .parse()
                    .context("Failed to parse filter directive")?,
            );
        }
    }

    Ok(filter)
}

fn sink_layers(format: LogFormat, file_writer: NonBlocking) -> Vec<SinkLayer> {
    match format {
        LogFormat::Text => vec![
            fmt::layer()
                .event_format(PipeFormat)
                .with_writer(std::io::stderr)
                .boxed(),
            fmt::layer()
                .event_format(PipeFormat)
                .with_writer(file_writer)
                .with_ansi(false)
                .boxed(),
        ],
        LogFormat::Json => vec![
            fmt::layer().json().with_writer(std::io::stderr).boxed(),
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_ansi(false)
                .boxed(),
        ],
    }
}

/// Level label of a log line; warnings read `WARNING`
fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// `<timestamp> | <LEVEL> | <target> | <message>`
struct PipeFormat;

impl<S, N> FormatEvent<S, N> for PipeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "{} | {} | {} | ",
            Local::now().format(LINE_TIMESTAMP_FORMAT),
            level_name(metadata.level()),
            metadata.target()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
