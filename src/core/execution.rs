//! Execution tracking
//!
//! Higher-order wrappers that emit paired start/end records around a unit
//! of work. The end record is emitted regardless of outcome: a panic or an
//! `Err` is observed, logged at ERROR with a trace, and then propagated
//! unchanged to the original caller.

use super::detail::Detail;
use super::error_trace;
use super::log_level::LogLevel;
use super::logger::{LogOptions, Logger};
use serde::Serialize;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};

/// Options for [`Logger::wrap`] and [`Logger::wrap_fallible`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    start_message: Option<String>,
    end_message: Option<String>,
    print_args_at_start: bool,
    print_result_at_end: bool,
    start_level: LogLevel,
    end_level: LogLevel,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn start_message(mut self, message: impl Into<String>) -> Self {
        self.start_message = Some(message.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn end_message(mut self, message: impl Into<String>) -> Self {
        self.end_message = Some(message.into());
        self
    }

    /// Attach the invocation arguments to the start record.
    #[must_use = "builder methods return a new value"]
    pub fn print_args_at_start(mut self, enabled: bool) -> Self {
        self.print_args_at_start = enabled;
        self
    }

    /// Attach the return value to the end record.
    #[must_use = "builder methods return a new value"]
    pub fn print_result_at_end(mut self, enabled: bool) -> Self {
        self.print_result_at_end = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn start_level(mut self, level: LogLevel) -> Self {
        self.start_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn end_level(mut self, level: LogLevel) -> Self {
        self.end_level = level;
        self
    }

    fn start_message_for(&self, name: &str) -> String {
        self.start_message
            .clone()
            .unwrap_or_else(|| format!("Entering {}", name))
    }

    fn end_message_for(&self, name: &str) -> String {
        self.end_message
            .clone()
            .unwrap_or_else(|| format!("Exiting {}", name))
    }
}

impl Logger {
    /// Wrap a function so each invocation emits a start record, runs the
    /// function, and emits an end record.
    ///
    /// A panic inside the function is observed, logged at ERROR with the
    /// panic payload as trace, and re-raised unchanged.
    ///
    /// # Example
    /// ```
    /// use prettylog::prelude::*;
    ///
    /// let logger = Logger::builder("math").build().unwrap();
    /// let double = logger.wrap(
    ///     "double",
    ///     ExecutionOptions::new()
    ///         .print_args_at_start(true)
    ///         .print_result_at_end(true),
    ///     |x: i64| x * 2,
    /// );
    /// assert_eq!(double(21), 42);
    /// ```
    #[track_caller]
    pub fn wrap<'a, A, R, F>(
        &'a self,
        name: &str,
        options: ExecutionOptions,
        f: F,
    ) -> impl Fn(A) -> R + 'a
    where
        F: Fn(A) -> R + 'a,
        A: Serialize + fmt::Debug,
        R: Serialize + fmt::Debug,
    {
        let name = name.to_string();
        let site = Location::caller();
        move |args: A| {
            self.emit_start(&name, &options, &args, site);

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(args)));
            match outcome {
                Ok(result) => {
                    self.emit_end(&name, &options, &result, site);
                    result
                }
                Err(payload) => {
                    let trace = format!("Panic in {}: {}", name, panic_text(&payload));
                    error_trace::set_active_trace(trace.clone());
                    self.log_at(
                        LogLevel::Error,
                        format!("{} panicked", name),
                        LogOptions::new().with_trace_text(trace),
                        site,
                    );
                    panic::resume_unwind(payload);
                }
            }
        }
    }

    /// Wrap a fallible function. Behaves like [`Logger::wrap`], except an
    /// `Err` return is logged at ERROR with the error chain as trace and
    /// then returned unchanged; the end record is only emitted on `Ok`.
    #[track_caller]
    pub fn wrap_fallible<'a, A, T, E, F>(
        &'a self,
        name: &str,
        options: ExecutionOptions,
        f: F,
    ) -> impl Fn(A) -> Result<T, E> + 'a
    where
        F: Fn(A) -> Result<T, E> + 'a,
        A: Serialize + fmt::Debug,
        T: Serialize + fmt::Debug,
        E: std::error::Error,
    {
        let name = name.to_string();
        let site = Location::caller();
        move |args: A| {
            self.emit_start(&name, &options, &args, site);

            match f(args) {
                Ok(result) => {
                    self.emit_end(&name, &options, &result, site);
                    Ok(result)
                }
                Err(err) => {
                    error_trace::record_active_error(&err);
                    self.log_at(
                        LogLevel::Error,
                        format!("{} failed", name),
                        LogOptions::new().print_exception(),
                        site,
                    );
                    Err(err)
                }
            }
        }
    }

    fn emit_start<A: Serialize + fmt::Debug>(
        &self,
        name: &str,
        options: &ExecutionOptions,
        args: &A,
        site: &'static Location<'static>,
    ) {
        let mut opts = LogOptions::new();
        if options.print_args_at_start {
            opts = opts.details(Detail::mapping([
                ("function".to_string(), Detail::from(name)),
                ("args".to_string(), Detail::from_serialize(args)),
            ]));
        }
        self.log_at(
            options.start_level,
            options.start_message_for(name),
            opts,
            site,
        );
    }

    fn emit_end<R: Serialize + fmt::Debug>(
        &self,
        name: &str,
        options: &ExecutionOptions,
        result: &R,
        site: &'static Location<'static>,
    ) {
        let mut opts = LogOptions::new();
        if options.print_result_at_end {
            opts = opts.details(Detail::mapping([
                ("function".to_string(), Detail::from(name)),
                ("result".to_string(), Detail::from_serialize(result)),
            ]));
        }
        self.log_at(options.end_level, options.end_message_for(name), opts, site);
    }
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
