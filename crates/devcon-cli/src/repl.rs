//! Interactive read-eval-print loop.
//!
//! Lines starting with `:` are shell meta-commands; everything else is
//! dispatched to the console. Tab cycles through the console's completions
//! for the first word.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use devcon_core::{Console, LogLevel};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::debug;

use crate::error::CliError;

const PROMPT: &str = "devcon> ";

const META_HELP: &str = "\
:help [name]          list commands, or describe one
:commands             list commands
:set <flag> on|off    flags: trace, show-hidden, hidden-exec, disabled
:quit                 leave the shell";

const META_NAMES: [&str; 4] = [":help", ":commands", ":set", ":quit"];

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplControl {
    Continue,
    Exit,
}

/// Shell commands handled outside the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    Help(Option<String>),
    Commands,
    Set { flag: String, enabled: bool },
    Quit,
}

impl MetaCommand {
    /// Parse a `:`-prefixed line. `None` if the line is not a meta-command.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let rest = line.trim().strip_prefix(':')?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();

        let parsed = match name {
            "help" | "h" => Ok(Self::Help(words.next().map(str::to_string))),
            "commands" | "ls" => Ok(Self::Commands),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            "set" => match (words.next(), words.next()) {
                (Some(flag), Some("on")) => Ok(Self::Set {
                    flag: flag.to_string(),
                    enabled: true,
                }),
                (Some(flag), Some("off")) => Ok(Self::Set {
                    flag: flag.to_string(),
                    enabled: false,
                }),
                _ => Err("usage: :set <flag> on|off".to_string()),
            },
            other => Err(format!("unknown meta-command ':{other}'\n{META_HELP}")),
        };
        Some(parsed)
    }
}

/// Handle one line of input.
pub fn handle_line(console: &mut Console, line: &str) -> ReplControl {
    match MetaCommand::parse(line) {
        None => {
            console.dispatch(line);
            ReplControl::Continue
        }
        Some(Ok(meta)) => run_meta(console, meta),
        Some(Err(message)) => {
            console.log().append(&message, LogLevel::Error);
            ReplControl::Continue
        }
    }
}

fn run_meta(console: &mut Console, meta: MetaCommand) -> ReplControl {
    match meta {
        MetaCommand::Quit => return ReplControl::Exit,
        MetaCommand::Commands | MetaCommand::Help(None) => {
            let listing = console.list_commands();
            console.log().append(&listing, LogLevel::Default);
            console.log().append(META_HELP, LogLevel::Default);
        }
        MetaCommand::Help(Some(name)) => {
            if let Some(help) = console.help(&name) {
                console.log().append(&help, LogLevel::Default);
            }
        }
        MetaCommand::Set { flag, enabled } => match flag.as_str() {
            "trace" => console.set_stack_trace(enabled),
            "show-hidden" => console.set_display_hidden_commands(enabled),
            "hidden-exec" => console.set_execute_hidden_commands(enabled),
            "disabled" => console.set_disabled(enabled),
            other => {
                let message = format!("unknown flag '{other}'");
                console.log().append(&message, LogLevel::Error);
            }
        },
    }
    ReplControl::Continue
}

/// Line-editor helper that completes the first word from the console.
struct ConsoleHelper {
    console: Arc<RwLock<Console>>,
}

impl ConsoleHelper {
    fn candidates(&self, word: &str) -> Vec<Pair> {
        if word.starts_with(':') {
            return META_NAMES
                .iter()
                .filter(|name| name.starts_with(word))
                .map(|name| Pair {
                    display: (*name).to_string(),
                    replacement: (*name).to_string(),
                })
                .collect();
        }

        let console = self.console.read().unwrap_or_else(PoisonError::into_inner);
        console
            .completions(word)
            .suggestions()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect()
    }
}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        // Only the command name is completed.
        if before.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = before.len() - before.trim_start().len();
        Ok((start, self.candidates(&before[start..])))
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for ConsoleHelper {}

impl Validator for ConsoleHelper {}

impl Helper for ConsoleHelper {}

/// Run the interactive loop until `:quit` or end of input.
pub fn run_repl(console: Console, history: Option<&Path>) -> Result<(), CliError> {
    let console = Arc::new(RwLock::new(console));

    let config = Config::builder()
        .completion_type(CompletionType::Circular)
        .auto_add_history(false)
        .build();
    let mut editor: Editor<ConsoleHelper, DefaultHistory> = Editor::with_config(config)?;
    editor.set_helper(Some(ConsoleHelper {
        console: Arc::clone(&console),
    }));

    if let Some(path) = history {
        if let Err(err) = editor.load_history(path) {
            debug!(path = %path.display(), error = %err, "no history loaded");
        }
    }

    println!("devcon {} - type :help for help", env!("CARGO_PKG_VERSION"));

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        let mut guard = console.write().unwrap_or_else(PoisonError::into_inner);
        if handle_line(&mut guard, line) == ReplControl::Exit {
            break;
        }
    }

    if let Some(path) = history {
        editor.save_history(path)?;
    }
    Ok(())
}
