//! JSONL activity log: one self-contained JSON object per inventory change.
//!
//! Lines are assembled in memory and written with a single `write_all` so a
//! reader tailing the file never sees a partial line.
//!
//! Degradation chain:
//! 1. Primary file path
//! 2. stderr with `[FRZ-JSONL]` prefix
//! 3. Silent discard (logging failures never abort an inventory change)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{FrzError, Result};

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Activity event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StateLoad,
    SlotToggle,
    FreezerClear,
    InventoryReset,
    ReportShare,
    SaveFailure,
}

/// A single JSONL log entry; everything but `ts`, `event`, `severity` is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Freezer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freezer: Option<String>,
    /// Zero-based slot index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<usize>,
    /// Slot state after a toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    #[must_use]
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            freezer: None,
            slot: None,
            full: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn freezer(mut self, name: impl Into<String>) -> Self {
        self.freezer = Some(name.into());
        self
    }

    #[must_use]
    pub const fn slot(mut self, slot: usize, full: bool) -> Self {
        self.slot = Some(slot);
        self.full = Some(full);
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn error(mut self, err: &FrzError) -> Self {
        self.error_code = Some(err.code().to_string());
        self.details = Some(err.to_string());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

/// Configuration for the JSONL writer.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Maximum file size before rotation (bytes). Default: 1 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
}

impl JsonlConfig {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            max_size_bytes: 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

/// Append-only JSONL writer with size-based rotation.
pub struct JsonlWriter {
    config: JsonlConfig,
    file: Option<File>,
    state: WriterState,
    bytes_written: u64,
    stderr_fallback: bool,
}

impl JsonlWriter {
    /// Open the log file, dropping to stderr when it cannot be opened.
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            file: None,
            state: WriterState::Discard,
            bytes_written: 0,
            stderr_fallback: true,
        };
        match open_append(&w.config.path) {
            Ok((file, size)) => {
                w.file = Some(file);
                w.state = WriterState::Normal;
                w.bytes_written = size;
            }
            Err(e) => {
                let _ = writeln!(io::stderr(), "[FRZ-JSONL] {e}; logging to stderr");
                w.state = WriterState::Stderr;
            }
        }
        w
    }

    /// Write a single log entry as one JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[FRZ-JSONL] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Allow or suppress the stderr fallback. While suppressed, lines that
    /// would go to stderr are dropped; the file path is unaffected.
    pub fn set_stderr_fallback(&mut self, enabled: bool) {
        self.stderr_fallback = enabled;
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr if self.stderr_fallback => "stderr",
            WriterState::Stderr | WriterState::Discard => "discard",
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::Normal
            && self.bytes_written + line.len() as u64 > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                let written = self
                    .file
                    .as_mut()
                    .is_some_and(|f| f.write_all(line.as_bytes()).is_ok());
                if written {
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr if !self.stderr_fallback => {}
            WriterState::Stderr => {
                if write!(io::stderr(), "[FRZ-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.file = None;
        self.state = match self.state {
            WriterState::Normal => {
                if self.stderr_fallback {
                    let _ = writeln!(io::stderr(), "[FRZ-JSONL] write failed, using stderr");
                }
                WriterState::Stderr
            }
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }

    fn rotate(&mut self) {
        self.file = None;
        let base = self.config.path.clone();

        // .N is dropped, .N-1 -> .N, ..., current -> .1
        let _ = fs::remove_file(rotated_name(&base, self.config.max_rotated_files));
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        if self.config.max_rotated_files > 0 {
            let _ = rename(&base, rotated_name(&base, 1));
        } else {
            let _ = fs::remove_file(&base);
        }

        match open_append(&base) {
            Ok((file, _)) => {
                self.file = Some(file);
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| FrzError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| FrzError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_entries(path: &Path) -> Vec<LogEntry> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn write_entry_produces_valid_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::new(path.clone()));
        assert_eq!(writer.state(), "normal");

        writer.write_entry(
            &LogEntry::new(EventType::SlotToggle, Severity::Info)
                .freezer("HK/Festa")
                .slot(12, true),
        );
        writer.write_entry(&LogEntry::new(EventType::InventoryReset, Severity::Warning));

        let entries = read_entries(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event, EventType::SlotToggle);
        assert_eq!(entries[0].freezer.as_deref(), Some("HK/Festa"));
        assert_eq!(entries[0].slot, Some(12));
        assert_eq!(entries[0].full, Some(true));
        assert_eq!(entries[1].severity, Severity::Warning);
    }

    #[test]
    fn optional_fields_are_omitted() {
        let entry = LogEntry::new(EventType::StateLoad, Severity::Info);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"event\":\"state_load\""));
        assert!(!json.contains("slot"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn error_entries_carry_code() {
        let err = FrzError::Runtime {
            details: "disk full".to_string(),
        };
        let entry = LogEntry::new(EventType::SaveFailure, Severity::Error).error(&err);
        assert_eq!(entry.error_code.as_deref(), Some("FRZ-3900"));
        assert!(entry.details.unwrap().contains("disk full"));
    }

    #[test]
    fn rotation_shifts_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rot.jsonl");
        let config = JsonlConfig {
            path: path.clone(),
            max_size_bytes: 100,
            max_rotated_files: 2,
        };
        let mut writer = JsonlWriter::open(config);
        for _ in 0..4 {
            writer.write_entry(
                &LogEntry::new(EventType::FreezerClear, Severity::Info).freezer("Freezer 2"),
            );
        }
        assert!(path.exists());
        assert!(rotated_name(&path, 1).exists());
        assert!(rotated_name(&path, 2).exists());
        assert!(!rotated_name(&path, 3).exists());
    }

    #[test]
    fn unwritable_path_degrades_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let writer = JsonlWriter::open(JsonlConfig::new(blocker.join("activity.jsonl")));
        assert_eq!(writer.state(), "stderr");
    }

    #[test]
    fn suppressed_stderr_fallback_discards_until_restored() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();
        let mut writer = JsonlWriter::open(JsonlConfig::new(blocker.join("activity.jsonl")));

        writer.set_stderr_fallback(false);
        assert_eq!(writer.state(), "discard");
        writer.write_entry(&LogEntry::new(EventType::SlotToggle, Severity::Info));

        writer.set_stderr_fallback(true);
        assert_eq!(writer.state(), "stderr");
    }

    #[test]
    fn suppressing_stderr_keeps_file_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let mut writer = JsonlWriter::open(JsonlConfig::new(path.clone()));
        writer.set_stderr_fallback(false);
        writer.write_entry(&LogEntry::new(EventType::InventoryReset, Severity::Warning));
        assert_eq!(writer.state(), "normal");
        assert_eq!(read_entries(&path).len(), 1);
    }
}
