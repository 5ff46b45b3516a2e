//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use prettylog::prelude::*;
//! use prettylog::info;
//!
//! let logger = Logger::builder("server").build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use prettylog::prelude::*;
/// # let logger = Logger::builder("app").build().unwrap();
/// use prettylog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::LogOptions::default())
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use prettylog::prelude::*;
/// # let logger = Logger::builder("app").build().unwrap();
/// use prettylog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Build a [`Detail`](crate::Detail) mapping literal, preserving key order.
///
/// # Examples
///
/// ```
/// use prettylog::detail;
///
/// let payload = detail! {
///     "user_id" => 42,
///     "action" => "login",
/// };
/// assert!(payload.render(2).contains("\"user_id\": 42"));
/// ```
#[macro_export]
macro_rules! detail {
    () => {
        $crate::Detail::Mapping(Vec::new())
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        $crate::Detail::Mapping(vec![
            $(($key.to_string(), $crate::Detail::from($value))),+
        ])
    };
}
