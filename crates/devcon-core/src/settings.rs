//! Console settings and validation.
//!
//! Plain data with no infrastructure dependencies. Front-ends load these
//! from wherever they like (the CLI reads JSON) and hand them to
//! [`Console::new`](crate::Console::new).

use serde::{Deserialize, Serialize};

use crate::ports::DEFAULT_MAX_LOG_ENTRIES;
use crate::registry::DuplicatePolicy;

/// Upper bound accepted for `max_log_entries`.
pub const MAX_LOG_ENTRIES_LIMIT: usize = 100_000;

/// Console behaviour flags.
///
/// Missing fields deserialize to their defaults, so a settings file only
/// needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Ignore every dispatched line.
    pub disabled: bool,

    /// Allow handlers marked hidden to run.
    pub execute_hidden_commands: bool,

    /// List handlers marked hidden.
    pub display_hidden_commands: bool,

    /// Log the full error chain after a handler fault.
    pub stack_trace: bool,

    /// How duplicate top-level names are handled.
    pub duplicate_policy: DuplicatePolicy,

    /// Capacity (1-100000) of the log built by
    /// [`Console::with_memory_log`](crate::Console::with_memory_log).
    pub max_log_entries: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConsoleSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            disabled: false,
            execute_hidden_commands: true,
            display_hidden_commands: false,
            stack_trace: false,
            duplicate_policy: DuplicatePolicy::Reject,
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
        }
    }

    /// Apply every field that is `Some` in `update`.
    pub const fn merge(&mut self, update: &SettingsUpdate) {
        if let Some(disabled) = update.disabled {
            self.disabled = disabled;
        }
        if let Some(execute) = update.execute_hidden_commands {
            self.execute_hidden_commands = execute;
        }
        if let Some(display) = update.display_hidden_commands {
            self.display_hidden_commands = display;
        }
        if let Some(stack_trace) = update.stack_trace {
            self.stack_trace = stack_trace;
        }
        if let Some(policy) = update.duplicate_policy {
            self.duplicate_policy = policy;
        }
        if let Some(max) = update.max_log_entries {
            self.max_log_entries = max;
        }
    }
}

/// Partial settings update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SettingsUpdate {
    pub disabled: Option<bool>,
    pub execute_hidden_commands: Option<bool>,
    pub display_hidden_commands: Option<bool>,
    pub stack_trace: Option<bool>,
    pub duplicate_policy: Option<DuplicatePolicy>,
    pub max_log_entries: Option<usize>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Max log entries must be between 1 and 100,000, got {0}")]
    InvalidLogCapacity(usize),
}

/// Validate settings values.
pub fn validate_settings(settings: &ConsoleSettings) -> Result<(), SettingsError> {
    if !(1..=MAX_LOG_ENTRIES_LIMIT).contains(&settings.max_log_entries) {
        return Err(SettingsError::InvalidLogCapacity(settings.max_log_entries));
    }

    Ok(())
}
