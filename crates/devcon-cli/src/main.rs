//! CLI entry point - the composition root.
//!
//! Parses arguments, composes the console via bootstrap, then either runs
//! the `-c` lines in order or starts the interactive shell.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use devcon_cli::{Cli, CliConfig, CliError, bootstrap, run_repl};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    if let Err(err) = run(&cli) {
        eprintln!("{} {err}", console::style("error:").red().bold());
        std::process::exit(err.exit_code());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = CliConfig::from_cli(cli)?;
    let console = bootstrap(&config)?;

    if cli.commands.is_empty() {
        return run_repl(console, config.history.as_deref());
    }

    for line in &cli.commands {
        console
            .try_dispatch(line)
            .map_err(|err| CliError::Command(format!("{line}: {err}")))?;
    }
    Ok(())
}
