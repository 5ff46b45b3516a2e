//! Logger configuration

use super::log_level::LogLevel;
use colored::Color;
use std::path::PathBuf;

/// Colors assigned per level and per structural field.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub debug: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    pub critical: Color,
    pub timestamp: Color,
    pub file_path: Color,
    pub details: Color,
    /// Fallback used when a field has no specific color.
    pub default: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            debug: Color::Cyan,
            info: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            critical: Color::Magenta,
            timestamp: Color::White,
            file_path: Color::White,
            details: Color::BrightWhite,
            default: Color::White,
        }
    }
}

impl ColorScheme {
    pub fn level_color(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
            LogLevel::Critical => self.critical,
        }
    }
}

/// Immutable configuration owned by one logger instance.
///
/// The minimum emitted level and the context map are the only mutable
/// state and live on the logger itself, not here.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub name: String,
    pub timezone: chrono_tz::Tz,
    /// Minimum column width of the timestamp field.
    pub timestamp_padding: usize,
    /// Minimum column width of the level field.
    pub log_level_padding: usize,
    /// Minimum column width of the file path field.
    pub file_path_padding: usize,
    pub colors: ColorScheme,
    /// Global color-enable flag; a per-call override wins over it.
    pub colorful: bool,
    /// Spaces per nesting level when rendering detail payloads.
    pub details_indent: usize,
    pub log_to_file: bool,
    pub log_directory: PathBuf,
    /// Per-file byte-size limit before rotation.
    pub log_file_size_limit: u64,
    /// Backups retained as `<name>.log.1` (newest) .. `.N` (oldest).
    pub max_backup_files: usize,
    /// Whether the context store is merged into every record.
    pub global_context: bool,
}

pub(crate) const DEFAULT_TIMESTAMP_PADDING: usize = 30;
pub(crate) const DEFAULT_LOG_LEVEL_PADDING: usize = 10;
pub(crate) const DEFAULT_FILE_PATH_PADDING: usize = 30;
pub(crate) const DEFAULT_DETAILS_INDENT: usize = 2;
pub(crate) const DEFAULT_FILE_SIZE_LIMIT: u64 = 32 * 1024 * 1024;
pub(crate) const DEFAULT_MAX_BACKUP_FILES: usize = 10;

impl LoggerConfig {
    pub(crate) fn with_defaults(name: String) -> Self {
        Self {
            name,
            timezone: chrono_tz::UTC,
            timestamp_padding: DEFAULT_TIMESTAMP_PADDING,
            log_level_padding: DEFAULT_LOG_LEVEL_PADDING,
            file_path_padding: DEFAULT_FILE_PATH_PADDING,
            colors: ColorScheme::default(),
            colorful: true,
            details_indent: DEFAULT_DETAILS_INDENT,
            log_to_file: false,
            log_directory: PathBuf::from("logs"),
            log_file_size_limit: DEFAULT_FILE_SIZE_LIMIT,
            max_backup_files: DEFAULT_MAX_BACKUP_FILES,
            global_context: false,
        }
    }
}
