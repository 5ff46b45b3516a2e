//! Core logging pipeline types

pub mod config;
pub mod context;
pub mod detail;
pub mod error;
pub mod error_trace;
pub mod execution;
pub mod formatter;
pub mod log_level;
pub mod logger;
pub mod path_resolver;
pub mod record;

pub use config::{ColorScheme, LoggerConfig};
pub use context::{ContextGuard, ContextStore};
pub use detail::Detail;
pub use error::{LoggerError, Result};
pub use error_trace::{clear_active_error, current_trace, record_active_error};
pub use execution::ExecutionOptions;
pub use log_level::LogLevel;
pub use logger::{LogOptions, Logger, LoggerBuilder};
pub use record::{LogRecord, SourceLocation};
