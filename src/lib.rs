//! # prettylog
//!
//! A structured, colorized, thread-safe logging engine with human-readable
//! console output, rotating log files, per-logger context, and execution
//! tracing.
//!
//! ## Features
//!
//! - **Columnar output**: padded timestamp, level, and call-site fields
//! - **Structured details**: arbitrary serializable payloads rendered as
//!   indented JSON-like blocks, with a no-fail fallback
//! - **Rotating files**: size-bounded log files with capped backups
//! - **Thread safe**: one lock per logger; records never interleave
//! - **Execution tracing**: paired start/end records around a unit of work

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ColorScheme, ContextGuard, ContextStore, Detail, ExecutionOptions, LogLevel, LogOptions,
        LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result, SourceLocation,
    };
    pub use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
}

pub use crate::core::{
    clear_active_error, current_trace, record_active_error, ColorScheme, ContextGuard,
    ContextStore, Detail, ExecutionOptions, LogLevel, LogOptions, LogRecord, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, Result, SourceLocation,
};
pub use crate::sinks::{ConsoleSink, RotatingFileSink, Sink};
