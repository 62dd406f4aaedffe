//! Port definitions (trait abstractions) for the console's collaborators.
//!
//! Ports define the interfaces the engine expects from its host. They carry
//! no rendering or storage details and use only domain types.
//!
//! # Design Rules
//!
//! - The engine chooses a log level, never a colour or a layout
//! - Capability checks are per handler, display and execute asked separately
//! - Every port has a ready-made implementation for tests and headless hosts

pub mod capability_checker;
pub mod console_log;

pub use capability_checker::{AllowAll, CapabilityChecker, HandlerDescriptor, HiddenCommandPolicy};
pub use console_log::{
    ConsoleLog, DEFAULT_MAX_LOG_ENTRIES, LogEntry, LogLevel, MemoryLog, NoopLog, TracingLog,
};

#[cfg(test)]
pub use capability_checker::MockCapabilityChecker;
#[cfg(test)]
pub use console_log::MockConsoleLog;
