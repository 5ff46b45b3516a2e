//! Log record structure

use super::detail::Detail;
use super::log_level::LogLevel;
use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt;

/// Resolved call-site location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log record, created per call and owned by the emitting call stack.
/// Once constructed it is never mutated; formatting is a pure function of
/// its fields plus the logger configuration.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Tz>,
    pub level: LogLevel,
    pub message: String,
    pub location: SourceLocation,
    pub details: Option<Detail>,
    pub trace: Option<String>,
    pub context_snapshot: Vec<(String, Detail)>,
}

impl LogRecord {
    pub fn new(
        timestamp: DateTime<Tz>,
        level: LogLevel,
        message: String,
        location: SourceLocation,
    ) -> Self {
        Self {
            timestamp,
            level,
            message: sanitize_message(&message),
            location,
            details: None,
            trace: None,
            context_snapshot: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Detail) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_trace(mut self, trace: String) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn with_context_snapshot(mut self, snapshot: Vec<(String, Detail)>) -> Self {
        self.context_snapshot = snapshot;
        self
    }
}

/// Escape control characters in the message so a caller-supplied string
/// cannot forge additional log lines.
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record(message: &str) -> LogRecord {
        let timestamp = chrono_tz::UTC
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid datetime");
        LogRecord::new(
            timestamp,
            LogLevel::Info,
            message.to_string(),
            SourceLocation {
                file: "./src/main.rs".to_string(),
                line: 42,
            },
        )
    }

    #[test]
    fn test_message_sanitized() {
        let record = sample_record("line1\nline2\tend");
        assert_eq!(record.message, "line1\\nline2\\tend");
    }

    #[test]
    fn test_location_display() {
        let record = sample_record("msg");
        assert_eq!(record.location.to_string(), "./src/main.rs:42");
    }

    #[test]
    fn test_builder_fields() {
        let record = sample_record("msg")
            .with_details(Detail::from(5))
            .with_trace("trace text".to_string());
        assert_eq!(record.details, Some(Detail::from(5)));
        assert_eq!(record.trace.as_deref(), Some("trace text"));
    }
}
