//! Main logger implementation

use super::config::LoggerConfig;
use super::context::{ContextGuard, ContextStore};
use super::detail::Detail;
use super::error::{LoggerError, Result};
use super::error_trace;
use super::formatter;
use super::log_level::LogLevel;
use super::path_resolver;
use super::record::{LogRecord, SourceLocation};
use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::panic::Location;
use std::path::Path;

/// Per-call optional parameters.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    details: Option<Detail>,
    print_exception: bool,
    colorful: Option<bool>,
    trace: Option<String>,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a structured payload to this record.
    #[must_use = "builder methods return a new value"]
    pub fn details(mut self, details: impl Into<Detail>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach the currently active error trace, when one exists. An empty
    /// slot is not an error; the trace field is simply absent.
    #[must_use = "builder methods return a new value"]
    pub fn print_exception(mut self) -> Self {
        self.print_exception = true;
        self
    }

    /// Override the logger's color setting for this call only.
    #[must_use = "builder methods return a new value"]
    pub fn colorful(mut self, colorful: bool) -> Self {
        self.colorful = Some(colorful);
        self
    }

    /// Attach a specific error (and its source chain) as the trace.
    #[must_use = "builder methods return a new value"]
    pub fn error(mut self, err: &(dyn std::error::Error + '_)) -> Self {
        self.trace = Some(error_trace::format_error_chain(err));
        self
    }

    pub(crate) fn with_trace_text(mut self, trace: String) -> Self {
        self.trace = Some(trace);
        self
    }
}

struct SinkSet {
    console: ConsoleSink,
    file: Option<RotatingFileSink>,
}

/// Thread-safe logger with colorized console output and an optional
/// rotating file sink.
///
/// One instance per named component; share it across threads by reference
/// or `Arc`. A single lock per instance guards the whole render-then-write
/// sequence, so records from concurrent callers never interleave.
pub struct Logger {
    config: LoggerConfig,
    min_level: RwLock<LogLevel>,
    context: ContextStore,
    sinks: Mutex<SinkSet>,
}

impl Logger {
    /// Create a builder for a logger with the given name.
    ///
    /// # Example
    /// ```
    /// use prettylog::prelude::*;
    ///
    /// let logger = Logger::builder("api")
    ///     .minimum_log_level(LogLevel::Debug)
    ///     .colorful(false)
    ///     .build()
    ///     .unwrap();
    /// logger.info("ready");
    /// ```
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Add a context field merged into every record (when context is
    /// enabled), overwriting any existing value for the key.
    pub fn add_context(&self, key: impl Into<String>, value: impl Into<Detail>) {
        self.context.add(key, value);
    }

    /// Remove a context field. Silent no-op when absent.
    pub fn remove_context(&self, key: &str) {
        self.context.remove(key);
    }

    /// Remove all context fields.
    pub fn clear_context(&self) {
        self.context.clear();
    }

    /// Add a context field scoped to the returned guard's lifetime.
    pub fn scoped_context(
        &self,
        key: impl Into<String>,
        value: impl Into<Detail>,
    ) -> ContextGuard {
        self.context.guard(key, value)
    }

    /// A point-in-time copy of the context fields, in insertion order.
    pub fn context_snapshot(&self) -> Vec<(String, Detail)> {
        self.context.snapshot()
    }

    pub(crate) fn context(&self) -> &ContextStore {
        &self.context
    }

    /// Log at an explicit level.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>, options: LogOptions) {
        self.log_at(level, message.into(), options, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log_at(
            LogLevel::Debug,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl Into<String>, options: LogOptions) {
        self.log_at(LogLevel::Debug, message.into(), options, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log_at(
            LogLevel::Info,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn info_with(&self, message: impl Into<String>, options: LogOptions) {
        self.log_at(LogLevel::Info, message.into(), options, Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log_at(
            LogLevel::Warning,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn warning_with(&self, message: impl Into<String>, options: LogOptions) {
        self.log_at(
            LogLevel::Warning,
            message.into(),
            options,
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log_at(
            LogLevel::Error,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn error_with(&self, message: impl Into<String>, options: LogOptions) {
        self.log_at(LogLevel::Error, message.into(), options, Location::caller());
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log_at(
            LogLevel::Critical,
            message.into(),
            LogOptions::default(),
            Location::caller(),
        );
    }

    #[track_caller]
    pub fn critical_with(&self, message: impl Into<String>, options: LogOptions) {
        self.log_at(
            LogLevel::Critical,
            message.into(),
            options,
            Location::caller(),
        );
    }

    /// The full emission path. A suppressed level returns before any record
    /// is constructed; the cost is one rank comparison.
    pub(crate) fn log_at(
        &self,
        level: LogLevel,
        message: String,
        options: LogOptions,
        caller: &Location<'_>,
    ) {
        if !level.is_enabled(*self.min_level.read()) {
            return;
        }

        let location = SourceLocation {
            file: path_resolver::resolve(Path::new(caller.file())),
            line: caller.line(),
        };

        let trace = options.trace.or_else(|| {
            if options.print_exception {
                error_trace::current_trace()
            } else {
                None
            }
        });

        let timestamp = Utc::now().with_timezone(&self.config.timezone);
        let mut record = LogRecord::new(timestamp, level, message, location);
        if let Some(details) = options.details {
            record = record.with_details(details);
        }
        if let Some(trace) = trace {
            record = record.with_trace(trace);
        }
        if self.config.global_context {
            record = record.with_context_snapshot(self.context.snapshot());
        }

        let mut sinks = self.sinks.lock();
        let colorize =
            sinks.console.color_capable() && options.colorful.unwrap_or(self.config.colorful);

        let console_text = formatter::render(&record, &self.config, colorize);
        if let Err(e) = sinks.console.write(&console_text) {
            // A failing console leaves only stderr as a last resort.
            eprintln!("[prettylog] console sink failed: {}", e);
        }

        if let Some(ref mut file) = sinks.file {
            let file_text = formatter::render(&record, &self.config, false);
            if let Err(e) = file.write(&file_text) {
                // Swallowed after a best-effort note to the console sink;
                // a log call never fails its caller.
                let note = format!("[prettylog] file sink failed: {}", e);
                if sinks.console.write(&note).is_err() {
                    eprintln!("{}", note);
                }
            }
        }
    }

    /// Flush both sinks.
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.lock();
        sinks.console.flush()?;
        if let Some(ref mut file) = sinks.file {
            file.flush()?;
        }
        Ok(())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let mut sinks = self.sinks.lock();
        let _ = sinks.console.flush();
        if let Some(ref mut file) = sinks.file {
            let _ = file.flush();
        }
    }
}

/// Builder for constructing a [`Logger`] with a fluent API.
///
/// # Example
/// ```no_run
/// use prettylog::prelude::*;
///
/// let logger = Logger::builder("worker")
///     .timezone("America/New_York")
///     .minimum_log_level(LogLevel::Debug)
///     .log_to_file(true)
///     .log_directory("logs")
///     .global_context(true)
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    timezone_name: Option<String>,
    min_level_override: Option<LogLevel>,
    console_color_capable: bool,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: LoggerConfig::with_defaults(name.into()),
            timezone_name: None,
            min_level_override: None,
            console_color_capable: true,
        }
    }

    /// IANA timezone identifier for record timestamps (default UTC).
    /// An unknown identifier fails at `build()`, never silently.
    #[must_use = "builder methods return a new value"]
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone_name = Some(timezone.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_padding(mut self, width: usize) -> Self {
        self.config.timestamp_padding = width;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_level_padding(mut self, width: usize) -> Self {
        self.config.log_level_padding = width;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_path_padding(mut self, width: usize) -> Self {
        self.config.file_path_padding = width;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: super::config::ColorScheme) -> Self {
        self.config.colors = colors;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colorful(mut self, colorful: bool) -> Self {
        self.config.colorful = colorful;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn minimum_log_level(mut self, level: LogLevel) -> Self {
        self.min_level_override = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn details_indent(mut self, indent: usize) -> Self {
        self.config.details_indent = indent;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_to_file(mut self, enabled: bool) -> Self {
        self.config.log_to_file = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_directory(mut self, directory: impl Into<std::path::PathBuf>) -> Self {
        self.config.log_directory = directory.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file_size_limit(mut self, bytes: u64) -> Self {
        self.config.log_file_size_limit = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_backup_files(mut self, count: usize) -> Self {
        self.config.max_backup_files = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_context(mut self, enabled: bool) -> Self {
        self.config.global_context = enabled;
        self
    }

    /// Mark the console target as unable to display colors (forces plain
    /// console output regardless of the colorful flags).
    #[must_use = "builder methods return a new value"]
    pub fn console_color_capable(mut self, capable: bool) -> Self {
        self.console_color_capable = capable;
        self
    }

    /// Build the logger, validating the configuration.
    ///
    /// # Errors
    ///
    /// Fails fast on an unknown timezone identifier, a zero file-size
    /// limit, or a zero backup count when file logging is enabled.
    pub fn build(mut self) -> Result<Logger> {
        if let Some(ref name) = self.timezone_name {
            self.config.timezone = name.parse().map_err(|_| {
                LoggerError::config("LoggerBuilder", format!("Unknown timezone: '{}'", name))
            })?;
        }

        if self.config.log_to_file {
            if self.config.log_file_size_limit == 0 {
                return Err(LoggerError::config(
                    "LoggerBuilder",
                    "log_file_size_limit must be non-zero",
                ));
            }
            if self.config.max_backup_files == 0 {
                return Err(LoggerError::config(
                    "LoggerBuilder",
                    "max_backup_files must be at least 1",
                ));
            }
        }

        let file = if self.config.log_to_file {
            let path = self
                .config
                .log_directory
                .join(format!("{}.log", self.config.name));
            Some(RotatingFileSink::new(
                path,
                self.config.log_file_size_limit,
                self.config.max_backup_files,
            )?)
        } else {
            None
        };

        let min_level = self.min_level_override.unwrap_or_default();

        Ok(Logger {
            config: self.config,
            min_level: RwLock::new(min_level),
            context: ContextStore::new(),
            sinks: Mutex::new(SinkSet {
                console: ConsoleSink::with_color_capability(self.console_color_capable),
                file,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder("app").build().unwrap();
        assert_eq!(logger.min_level(), LogLevel::Info);
        assert_eq!(logger.config().name, "app");
        assert!(!logger.config().log_to_file);
    }

    #[test]
    fn test_invalid_timezone_fails_fast() {
        let result = Logger::builder("app").timezone("Mars/Olympus").build();
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_valid_timezone_accepted() {
        let logger = Logger::builder("app")
            .timezone("Asia/Kolkata")
            .build()
            .unwrap();
        assert_eq!(logger.config().timezone, chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn test_zero_size_limit_rejected() {
        let dir = tempdir().unwrap();
        let result = Logger::builder("app")
            .log_to_file(true)
            .log_directory(dir.path())
            .log_file_size_limit(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_backups_rejected() {
        let dir = tempdir().unwrap();
        let result = Logger::builder("app")
            .log_to_file(true)
            .log_directory(dir.path())
            .max_backup_files(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_set_min_level() {
        let logger = Logger::builder("app").build().unwrap();
        logger.set_min_level(LogLevel::Error);
        assert_eq!(logger.min_level(), LogLevel::Error);
    }

    #[test]
    fn test_context_operations() {
        let logger = Logger::builder("app").global_context(true).build().unwrap();
        logger.add_context("service", "api");
        assert_eq!(logger.context().len(), 1);
        {
            let _guard = logger.scoped_context("request_id", "r-9");
            assert_eq!(logger.context().len(), 2);
        }
        assert_eq!(logger.context().len(), 1);
        logger.remove_context("service");
        assert!(logger.context().is_empty());
    }

    #[test]
    fn test_file_logging_writes_records() {
        let dir = tempdir().unwrap();
        let logger = Logger::builder("filetest")
            .log_to_file(true)
            .log_directory(dir.path())
            .colorful(false)
            .build()
            .unwrap();

        logger.info("hello file");
        logger.flush().unwrap();

        let content = std::fs::read_to_string(dir.path().join("filetest.log")).unwrap();
        assert!(content.contains("hello file"));
        assert!(content.contains("INFO"));
    }
}
