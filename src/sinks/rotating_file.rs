//! Rotating file sink
//!
//! Appends rendered records to `<log_directory>/<logger_name>.log`,
//! rotating when a pending write would push the current file past its
//! byte-size limit. Backups are shifted to numeric suffixes (`.1` newest,
//! `.N` oldest) and the oldest is discarded at capacity. No record is ever
//! split across two files.

use super::Sink;
use crate::core::error::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct RotatingFileSink {
    base_path: PathBuf,
    size_limit: u64,
    max_backup_files: usize,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

impl RotatingFileSink {
    /// Open (creating the directory and file as needed) a rotating sink.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn new<P: AsRef<Path>>(path: P, size_limit: u64, max_backup_files: usize) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = open_append(&base_path)?;
        let current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    base_path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(Self {
            base_path,
            size_limit,
            max_backup_files,
            writer: Some(BufWriter::new(file)),
            current_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Close the current file, shift backups up one index (discarding the
    /// oldest at capacity), move the closed file to `.1` and open a fresh
    /// current file.
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
            // Writer dropped here, releasing the file handle.
        }

        let oldest = self.backup_path(self.max_backup_files);
        if oldest.exists() {
            fs::remove_file(&oldest).map_err(|e| {
                LoggerError::file_rotation(
                    oldest.display().to_string(),
                    format!("Failed to remove oldest backup: {}", e),
                )
            })?;
        }

        for i in (1..self.max_backup_files).rev() {
            let old_path = self.backup_path(i);
            if !old_path.exists() {
                continue;
            }
            let new_path = self.backup_path(i + 1);
            // rename atomically replaces the destination where the platform
            // allows it; fall back to remove-then-rename otherwise.
            if fs::rename(&old_path, &new_path).is_err() {
                if new_path.exists() {
                    let _ = fs::remove_file(&new_path);
                }
                fs::rename(&old_path, &new_path).map_err(|e| {
                    LoggerError::file_rotation(
                        old_path.display().to_string(),
                        format!("Failed to shift backup files: {}", e),
                    )
                })?;
            }
        }

        if self.base_path.exists() {
            fs::rename(&self.base_path, self.backup_path(1)).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        self.writer = Some(BufWriter::new(open_append(&self.base_path)?));
        self.current_size = 0;

        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_sink(
                path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })
}

impl Sink for RotatingFileSink {
    fn write(&mut self, text: &str) -> Result<()> {
        // Trailing record separator counts toward the size check.
        let pending = text.len() as u64 + 1;

        // Rotate before the write would exceed the limit. An oversized
        // record landing in an empty file is written whole anyway; records
        // are never split across files.
        if self.current_size > 0 && self.current_size + pending > self.size_limit {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::file_sink(
                self.base_path.display().to_string(),
                "Writer not initialized".to_string(),
            ))?;

        writer.write_all(text.as_bytes()).and_then(|()| writer.write_all(b"\n")).map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to write log record: {}", e),
            )
        })?;
        writer.flush().map_err(|e| {
            LoggerError::file_sink(
                self.base_path.display().to_string(),
                format!("Failed to flush: {}", e),
            )
        })?;
        self.current_size += pending;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_sink(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("app.log");
        let sink = RotatingFileSink::new(&path, 1024, 3).unwrap();
        assert_eq!(sink.path(), path);
        assert_eq!(sink.current_size(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_rotation_on_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = RotatingFileSink::new(&path, 100, 3).unwrap();

        for i in 0..20 {
            sink.write(&format!("record number {}", i)).unwrap();
        }
        sink.flush().unwrap();

        assert!(dir.path().join("app.log.1").exists());
    }

    #[test]
    fn test_no_record_split_across_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = RotatingFileSink::new(&path, 64, 5).unwrap();

        let records: Vec<String> = (0..30).map(|i| format!("complete-record-{:04}", i)).collect();
        for record in &records {
            sink.write(record).unwrap();
        }
        drop(sink);

        // Every file holds only whole records.
        let mut seen = 0;
        for entry in fs::read_dir(dir.path()).unwrap() {
            let entry = entry.unwrap();
            let content = fs::read_to_string(entry.path()).unwrap();
            for line in content.lines() {
                assert!(records.iter().any(|r| r == line), "split record: {:?}", line);
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_backup_count_capped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let max_backups = 2;
        let mut sink = RotatingFileSink::new(&path, 50, max_backups).unwrap();

        for i in 0..100 {
            sink.write(&format!("entry {}", i)).unwrap();
        }
        drop(sink);

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|n| n.starts_with("app.log"))
                    .unwrap_or(false)
            })
            .count();

        // Current file plus at most max_backups backups.
        assert!(log_files <= max_backups + 1);
    }

    #[test]
    fn test_oversized_record_written_whole() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = RotatingFileSink::new(&path, 16, 2).unwrap();

        let big = "x".repeat(64);
        sink.write(&big).unwrap();
        drop(sink);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", big));
    }

    #[test]
    fn test_resumes_size_from_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        {
            let mut sink = RotatingFileSink::new(&path, 1024, 2).unwrap();
            sink.write("persisted").unwrap();
        }
        let sink = RotatingFileSink::new(&path, 1024, 2).unwrap();
        assert_eq!(sink.current_size(), "persisted\n".len() as u64);
    }
}
