//! CLI bootstrap - the composition root.
//!
//! This is the only place where the console, its log adapter and the demo
//! command set are wired together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use devcon_core::{Console, ConsoleLog, ConsoleSettings, validate_settings};
use tracing::debug;

use crate::demo::{DemoShell, register_demo};
use crate::error::CliError;
use crate::parser::Cli;
use crate::terminal_log::TerminalLog;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Effective console settings (file values with flag overrides applied).
    pub settings: ConsoleSettings,
    /// Where the interactive session keeps its history.
    pub history: Option<PathBuf>,
}

impl CliConfig {
    /// Build the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = load_settings(cli.config.as_deref())?;
        settings.merge(&cli.settings_update());
        validate_settings(&settings)?;

        Ok(Self {
            settings,
            history: cli.history.clone(),
        })
    }
}

/// Read settings from a JSON file, or use defaults when no file is given.
///
/// Keys missing from the file keep their default values.
pub fn load_settings(path: Option<&Path>) -> Result<ConsoleSettings, CliError> {
    let Some(path) = path else {
        return Ok(ConsoleSettings::with_defaults());
    };

    let text = std::fs::read_to_string(path)
        .map_err(|err| CliError::Io(format!("{}: {err}", path.display())))?;
    let settings = serde_json::from_str(&text)?;
    debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

/// Compose a console that prints to the terminal.
pub fn bootstrap(config: &CliConfig) -> Result<Console, CliError> {
    bootstrap_with_log(config, Arc::new(TerminalLog::new()))
}

/// Compose a console around any log adapter.
pub fn bootstrap_with_log(
    config: &CliConfig,
    log: Arc<dyn ConsoleLog>,
) -> Result<Console, CliError> {
    let mut console = Console::new(config.settings.clone(), Arc::clone(&log))?;
    let shell = Arc::new(DemoShell::new(log));
    register_demo(&mut console, &shell)?;
    debug!(commands = console.registry().len(), "console ready");
    Ok(console)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use devcon_core::{DuplicatePolicy, LogLevel, MemoryLog};
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, ConsoleSettings::with_defaults());
    }

    #[test]
    fn test_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"display_hidden_commands": true, "duplicate_policy": "last_wins"}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::parse_from(["devcon", "--config", path, "--trace"]);
        let config = CliConfig::from_cli(&cli).unwrap();

        assert!(config.settings.display_hidden_commands);
        assert!(config.settings.stack_trace);
        assert_eq!(config.settings.duplicate_policy, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_settings(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_log_entries": 0}}"#).unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::parse_from(["devcon", "--config", path]);
        let err = CliConfig::from_cli(&cli).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bootstrap_registers_demo() {
        let log = Arc::new(MemoryLog::new());
        let console = bootstrap_with_log(&CliConfig::default(), log.clone()).unwrap();

        console.dispatch("net.ping");
        assert_eq!(log.entries_at(LogLevel::Success)[0].message, "pong");
        assert!(console.list_commands().contains("greet <String>"));
    }
}
