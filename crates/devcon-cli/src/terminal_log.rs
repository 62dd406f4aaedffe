//! Terminal adapter for the console log port.
//!
//! Entries are printed as they arrive. Echoed command lines get a `> `
//! prefix, errors go to stderr, everything else to stdout.

use console::{Term, style};
use devcon_core::{ConsoleLog, LogLevel};

/// Prints log entries to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalLog {
    out: Term,
    err: Term,
}

impl Default for TerminalLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLog {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    /// Render one entry the way it appears on screen.
    pub fn render(message: &str, level: LogLevel) -> String {
        match level {
            LogLevel::Default => message.to_string(),
            LogLevel::Command => style(format!("> {message}")).dim().to_string(),
            LogLevel::Success => style(message).green().to_string(),
            LogLevel::Error => style(message).red().to_string(),
        }
    }
}

impl ConsoleLog for TerminalLog {
    fn append(&self, message: &str, level: LogLevel) {
        let term = if level == LogLevel::Error {
            &self.err
        } else {
            &self.out
        };
        if let Err(err) = term.write_line(&Self::render(message, level)) {
            tracing::warn!(error = %err, "failed to write console output");
        }
    }
}
