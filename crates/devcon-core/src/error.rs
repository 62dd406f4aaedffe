//! Error types for dispatch and for the core as a whole.
//!
//! `CommandError` covers everything that can go wrong between a typed line
//! and a handler call. None of these are fatal: the console reports them
//! through the log port and returns control to the caller.

use thiserror::Error;

use crate::registry::RegistryError;
use crate::settings::SettingsError;

/// Label used when a handler fails without a usable message.
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Failure of a single dispatched command line.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No command is registered under the (possibly dotted) name.
    #[error("Command does not exist.")]
    NotFound {
        /// The name as typed.
        name: String,
    },

    /// The command exists but its capabilities refuse execution.
    #[error("Command '{name}' is not executable.")]
    NotExecutable {
        /// Canonical command name.
        name: String,
    },

    /// A reflective command has no executable handler left for its name.
    #[error("No such method found.")]
    NoSuchMethod {
        /// Canonical command name.
        name: String,
    },

    /// No overload accepted the argument count, or every candidate failed
    /// to coerce its tokens.
    #[error("Bad parameters. Check your code.")]
    BadParameters {
        /// Canonical command name.
        name: String,
    },

    /// The handler ran and returned an error.
    #[error("{}", fault_message(.0))]
    Invocation(anyhow::Error),
}

impl CommandError {
    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Full error chain for stack-trace mode.
    ///
    /// Only invocation faults carry a trace; every other variant is fully
    /// described by its message.
    pub fn trace(&self) -> Option<String> {
        match self {
            Self::Invocation(fault) => Some(format!("{fault:?}")),
            _ => None,
        }
    }
}

/// Message for a handler fault, falling back to [`UNKNOWN_ERROR`].
fn fault_message(fault: &anyhow::Error) -> String {
    let msg = fault.to_string();
    if msg.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        msg
    }
}

/// Core error type for setup-time problems.
///
/// Adapters should map this to their own error types (CLI exit codes,
/// UI notifications).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Settings failed validation.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
