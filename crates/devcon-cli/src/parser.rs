//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use devcon_core::SettingsUpdate;

/// Command-line interface for the devcon shell.
///
/// Without `-c`, starts an interactive session. Flags override values read
/// from `--config`.
#[derive(Debug, Parser)]
#[command(name = "devcon")]
#[command(about = "Interactive command console with dotted namespaces and tab completion")]
#[command(version)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, env = "DEVCON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log the full error chain when a command fails
    #[arg(long = "trace")]
    pub stack_trace: bool,

    /// List commands registered as hidden
    #[arg(long = "show-hidden")]
    pub show_hidden: bool,

    /// Refuse to run commands registered as hidden
    #[arg(long = "no-hidden-exec")]
    pub no_hidden_exec: bool,

    /// History file for the interactive session
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Run a command line and exit (repeatable, run in order)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,
}

impl Cli {
    /// Settings overrides requested on the command line.
    ///
    /// Flags can only switch behaviour on, so an absent flag leaves the
    /// file value alone.
    pub fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            stack_trace: self.stack_trace.then_some(true),
            display_hidden_commands: self.show_hidden.then_some(true),
            execute_hidden_commands: self.no_hidden_exec.then_some(false),
            ..Default::default()
        }
    }

    /// Default tracing filter for the chosen verbosity.
    pub const fn default_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}
