//! Interactive shell for the devcon command console.
//!
//! The binary wires a [`devcon_core::Console`] to the terminal: log entries
//! are printed through [`TerminalLog`], input comes from a `rustyline`
//! editor whose tab completion is driven by the console's autocomplete
//! engine, and a small demo command set is registered so there is something
//! to talk to.
#![deny(unused_crate_dependencies)]

// Only the binary initialises the subscriber.
use tracing_subscriber as _;

pub mod bootstrap;
pub mod demo;
pub mod error;
pub mod parser;
pub mod repl;
pub mod terminal_log;

pub use bootstrap::{CliConfig, bootstrap, load_settings};
pub use error::CliError;
pub use parser::Cli;
pub use repl::{MetaCommand, ReplControl, run_repl};
pub use terminal_log::TerminalLog;
