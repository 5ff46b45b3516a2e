//! Record formatting
//!
//! Assembles one rendered text block per record: a padded header line,
//! then optional context, details, and trace blocks. Two independent
//! renderings exist per record when both sinks are active; the file
//! variant is always plain text.

use super::config::LoggerConfig;
use super::detail::Detail;
use super::record::LogRecord;
use colored::{Color, Colorize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Render a record into its final text block. Pure: same record, config
/// and `colorize` flag always produce the same text.
pub fn render(record: &LogRecord, config: &LoggerConfig, colorize: bool) -> String {
    let timestamp = record.timestamp.format(TIMESTAMP_FORMAT).to_string();
    let level_color = config.colors.level_color(record.level);

    // Pad before coloring; escape sequences must not count toward width.
    let header = [
        paint(
            pad(&timestamp, config.timestamp_padding),
            config.colors.timestamp,
            colorize,
        ),
        paint(
            pad(record.level.to_str(), config.log_level_padding),
            level_color,
            colorize,
        ),
        paint(
            pad(&record.location.to_string(), config.file_path_padding),
            config.colors.file_path,
            colorize,
        ),
        paint(format!(": {}", record.message), level_color, colorize),
    ]
    .join(" ");

    let mut output = header;

    if !record.context_snapshot.is_empty() {
        let block = Detail::Mapping(record.context_snapshot.clone()).render(config.details_indent);
        output.push('\n');
        output.push_str(&paint(block, config.colors.details, colorize));
    }

    if let Some(ref details) = record.details {
        let block = details.render(config.details_indent);
        output.push('\n');
        output.push_str(&paint(block, config.colors.details, colorize));
    }

    // Trace text stays plain even on the colorized rendering so it can be
    // copy-pasted intact.
    if let Some(ref trace) = record.trace {
        output.push('\n');
        output.push_str(trace);
    }

    output
}

/// Left-pad to a minimum width. Longer fields are never truncated.
fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text)
}

fn paint(text: String, color: Color, colorize: bool) -> String {
    if colorize {
        text.color(color).to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::record::SourceLocation;
    use chrono::TimeZone;

    fn sample_record() -> LogRecord {
        let timestamp = chrono_tz::UTC
            .with_ymd_and_hms(2025, 6, 1, 12, 30, 45)
            .single()
            .expect("valid datetime");
        LogRecord::new(
            timestamp,
            LogLevel::Warning,
            "disk space low".to_string(),
            SourceLocation {
                file: "./src/storage.rs".to_string(),
                line: 17,
            },
        )
    }

    fn config() -> LoggerConfig {
        LoggerConfig::with_defaults("test".to_string())
    }

    #[test]
    fn test_plain_header_layout() {
        let text = render(&sample_record(), &config(), false);
        assert!(text.starts_with("2025-06-01 12:30:45.000"));
        assert!(text.contains("WARNING"));
        assert!(text.contains("./src/storage.rs:17"));
        assert!(text.contains(": disk space low"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_padding_is_minimum_not_maximum() {
        let mut cfg = config();
        cfg.file_path_padding = 4;
        let text = render(&sample_record(), &cfg, false);
        // Longer than the width: emitted whole, never truncated.
        assert!(text.contains("./src/storage.rs:17"));

        cfg.log_level_padding = 12;
        let text = render(&sample_record(), &cfg, false);
        assert!(text.contains("WARNING     "));
    }

    #[test]
    fn test_details_block_appended() {
        let record = sample_record().with_details(Detail::mapping([(
            "free_mb".to_string(),
            Detail::from(512),
        )]));
        let text = render(&record, &config(), false);
        assert!(text.contains("\n{\n  \"free_mb\": 512\n}"));
    }

    #[test]
    fn test_null_detail_distinct_from_omission() {
        let with_null = render(
            &sample_record().with_details(Detail::Null),
            &config(),
            false,
        );
        let without = render(&sample_record(), &config(), false);
        assert!(with_null.ends_with("\nnull"));
        assert!(!without.contains("null"));
    }

    #[test]
    fn test_context_block_before_details() {
        let record = sample_record()
            .with_context_snapshot(vec![("request_id".to_string(), Detail::from("r-1"))])
            .with_details(Detail::from("payload"));
        let text = render(&record, &config(), false);
        let ctx = text.find("request_id").unwrap();
        let details = text.find("payload").unwrap();
        assert!(ctx < details);
    }

    #[test]
    fn test_trace_block_is_raw() {
        let record = sample_record().with_trace("Error: boom\nCaused by: io".to_string());
        let text = render(&record, &config(), true);
        assert!(text.ends_with("Error: boom\nCaused by: io"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let record = sample_record().with_details(Detail::from(vec![1, 2, 3]));
        let cfg = config();
        assert_eq!(render(&record, &cfg, false), render(&record, &cfg, false));
    }
}
