//! Progress log for pipeline runs.
//!
//! Every successful stage reports a one-line message. Entries are printed
//! to stdout and kept in a process-wide sink so a caller can inspect what a
//! run reported. Internal diagnostics go through `tracing` instead.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Log level for progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

/// Global progress log
pub static PROGRESS_LOG: Lazy<ProgressLog> = Lazy::new(ProgressLog::new);

/// Collects progress entries and echoes them to stdout
pub struct ProgressLog {
    entries: Mutex<Vec<LogEntry>>,
    quiet: AtomicBool,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            quiet: AtomicBool::new(false),
        }
    }

    /// Record an entry and print it unless silenced
    pub fn log(&self, entry: LogEntry) {
        if !self.quiet.load(Ordering::Relaxed) {
            let prefix = match entry.level {
                LogLevel::Info => "   ",
                LogLevel::Success => "   ✓",
                LogLevel::Warning => "   ⚠️",
                LogLevel::Error => "   ❌",
            };
            let indent = "   ".repeat(entry.indent as usize);
            println!("{}{} {}", indent, prefix, entry.message);
        }

        // A poisoned sink only loses history, printing already happened
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    /// Stop echoing entries to stdout (entries are still recorded)
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }

    /// Take all recorded entries, leaving the sink empty
    pub fn drain(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|mut entries| std::mem::take(&mut *entries))
            .unwrap_or_default()
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    PROGRESS_LOG.log(LogEntry::info(msg).with_indent(indent));
}
