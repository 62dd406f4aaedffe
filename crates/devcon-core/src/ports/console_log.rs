//! Console log port.
//!
//! The engine reports everything (command echoes, resolution failures,
//! handler faults) through this port. It only picks a level; colours,
//! wrapping and persistence belong to the implementation.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// Severity/kind of a console log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Plain output.
    #[default]
    Default,
    /// Failure reported by the engine or a handler.
    Error,
    /// Positive confirmation.
    Success,
    /// Echo of a dispatched command line.
    Command,
}

impl LogLevel {
    /// Stable lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Error => "error",
            Self::Success => "success",
            Self::Command => "command",
        }
    }
}

/// Port for appending entries to the console log.
///
/// Implementations should be thread-safe and non-blocking where possible.
#[cfg_attr(test, mockall::automock)]
pub trait ConsoleLog: Send + Sync {
    /// Append one entry.
    fn append(&self, message: &str, level: LogLevel);
}

/// A log that discards every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl NoopLog {
    /// Create a new no-op log.
    pub const fn new() -> Self {
        Self
    }
}

impl ConsoleLog for NoopLog {
    fn append(&self, _message: &str, _level: LogLevel) {
        // Intentionally do nothing
    }
}

/// One recorded log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub level: LogLevel,
}

/// Default capacity of [`MemoryLog`].
pub const DEFAULT_MAX_LOG_ENTRIES: usize = 1000;

/// Bounded in-memory log.
///
/// Keeps the most recent `max_entries` entries; the oldest are dropped
/// first. Useful for embedding hosts that render the log themselves and for
/// tests that assert on what the engine reported.
#[derive(Debug)]
pub struct MemoryLog {
    entries: Mutex<VecDeque<LogEntry>>,
    max_entries: usize,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog {
    /// Create a log with [`DEFAULT_MAX_LOG_ENTRIES`] capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_LOG_ENTRIES)
    }

    /// Create a log holding at most `max_entries` entries (minimum 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Snapshot of all retained entries, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Retained entries with the given level.
    pub fn entries_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LogEntry>> {
        // A panic mid-append cannot leave the deque inconsistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConsoleLog for MemoryLog {
    fn append(&self, message: &str, level: LogLevel) {
        let mut entries = self.lock();
        while entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(LogEntry {
            message: message.to_string(),
            level,
        });
    }
}

/// Forwards console entries to `tracing`.
///
/// Handy for headless hosts where the console output should end up in the
/// application's regular logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl ConsoleLog for TracingLog {
    fn append(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Error => tracing::error!(target: "devcon::console", "{message}"),
            LogLevel::Command => tracing::info!(target: "devcon::console", command = %message),
            LogLevel::Success | LogLevel::Default => {
                tracing::info!(target: "devcon::console", level = level.as_str(), "{message}");
            }
        }
    }
}
