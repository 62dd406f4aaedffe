//! The console front door.
//!
//! [`Console`] owns the registry and talks to the outside world through the
//! [`ConsoleLog`] and [`CapabilityChecker`] ports. Everything a user can do
//! from an input line goes through [`Console::dispatch`]; everything a
//! front-end needs for tab completion goes through the autocomplete methods.
//!
//! # Threading
//!
//! Dispatch takes `&self` and the console holds no locks. Bound reflective
//! targets are shared through `Arc` and guard their own state. Callers that
//! dispatch from several threads at once must synchronise externally if
//! their handlers need ordering.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::autocomplete::{AutocompleteSession, Completions};
use crate::domain::{Category, Command, LeafCommand, names_match};
use crate::error::CommandError;
use crate::invocation::Invocation;
use crate::ports::{CapabilityChecker, ConsoleLog, HiddenCommandPolicy, LogLevel, MemoryLog};
use crate::reflective::Binding;
use crate::registry::{Registry, RegistryError, TOP_LEVEL_SCOPE, check_sibling};
use crate::settings::{ConsoleSettings, SettingsError, validate_settings};

/// Command console: registry, dispatch, help and autocomplete.
pub struct Console {
    registry: Registry,
    settings: ConsoleSettings,
    log: Arc<dyn ConsoleLog>,
    policy: Arc<HiddenCommandPolicy>,
    checker: Arc<dyn CapabilityChecker>,
    session: Option<AutocompleteSession>,
    last_suggestion: Option<String>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Create an empty console.
    ///
    /// Reflective handlers are checked against a [`HiddenCommandPolicy`]
    /// seeded from `settings` unless another checker is installed with
    /// [`Console::with_capability_checker`].
    pub fn new(
        settings: ConsoleSettings,
        log: Arc<dyn ConsoleLog>,
    ) -> Result<Self, SettingsError> {
        validate_settings(&settings)?;

        let policy = Arc::new(HiddenCommandPolicy::new(
            settings.display_hidden_commands,
            settings.execute_hidden_commands,
        ));
        Ok(Self {
            registry: Registry::with_policy(settings.duplicate_policy),
            settings,
            log,
            checker: policy.clone(),
            policy,
            session: None,
            last_suggestion: None,
        })
    }

    /// Create a console logging to a [`MemoryLog`] sized by
    /// `settings.max_log_entries`. The log is returned alongside so the
    /// host can read it back.
    pub fn with_memory_log(
        settings: ConsoleSettings,
    ) -> Result<(Self, Arc<MemoryLog>), SettingsError> {
        let log = Arc::new(MemoryLog::with_capacity(settings.max_log_entries));
        let console = Self::new(settings, log.clone())?;
        Ok((console, log))
    }

    /// Use a custom capability checker for reflective handlers registered
    /// from now on.
    #[must_use]
    pub fn with_capability_checker(mut self, checker: Arc<dyn CapabilityChecker>) -> Self {
        self.checker = checker;
        self
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register any command at the top level.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        self.reset_autocomplete();
        self.registry.add(command)
    }

    /// Register a closure-backed leaf command.
    pub fn register_leaf(&mut self, command: LeafCommand) -> Result<(), RegistryError> {
        self.register(Box::new(command))
    }

    /// Register a category and everything beneath it.
    pub fn register_category(&mut self, category: Category) -> Result<(), RegistryError> {
        self.register(Box::new(category))
    }

    /// Register one command per distinct method name of `binding`.
    ///
    /// All-or-nothing: if any name collides, nothing is registered.
    /// Returns the number of commands added.
    pub fn register_reflective<T>(&mut self, binding: Binding<T>) -> Result<usize, RegistryError>
    where
        T: Send + Sync + 'static,
    {
        let commands = binding.into_commands(Arc::clone(&self.checker));
        for command in &commands {
            check_sibling(
                self.registry.list(),
                command.name(),
                TOP_LEVEL_SCOPE,
                self.registry.policy(),
            )?;
        }

        let count = commands.len();
        for command in commands {
            self.register(Box::new(command))?;
        }
        debug!(count, "registered reflective commands");
        Ok(count)
    }

    /// Remove a top-level command.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Command>> {
        self.reset_autocomplete();
        self.registry.remove(name)
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run one input line. Failures are reported to the log.
    pub fn dispatch(&self, line: &str) {
        // Already reported; nothing left to do with the error here.
        let _ = self.try_dispatch(line);
    }

    /// Run one input line, reporting failures to the log and returning them.
    ///
    /// A disabled console and a blank line are both no-ops. Otherwise the
    /// line is echoed verbatim at [`LogLevel::Command`] before the name is
    /// resolved.
    pub fn try_dispatch(&self, line: &str) -> Result<(), CommandError> {
        if self.settings.disabled {
            return Ok(());
        }
        let Some(invocation) = Invocation::parse(line) else {
            return Ok(());
        };

        self.log.append(line, LogLevel::Command);

        let result = self.run(&invocation);
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    fn run(&self, invocation: &Invocation<'_>) -> Result<(), CommandError> {
        let command = self
            .registry
            .resolve(invocation.name())
            .ok_or_else(|| CommandError::not_found(invocation.name()))?;

        if !command.is_executable() {
            return Err(CommandError::NotExecutable {
                name: command.name().to_string(),
            });
        }

        debug!(command = command.name(), args = invocation.args().len(), "dispatching");
        command.execute(invocation, self.log.as_ref())
    }

    fn report(&self, err: &CommandError) {
        debug!(error = ?err, "command failed");
        self.log.append(&err.to_string(), LogLevel::Error);
        if self.settings.stack_trace {
            if let Some(trace) = err.trace() {
                self.log.append(&trace, LogLevel::Error);
            }
        }
    }

    // =========================================================================
    // Help
    // =========================================================================

    /// One line per visible top-level command: name, parameter names and a
    /// marker for commands that cannot run.
    pub fn list_commands(&self) -> String {
        self.registry
            .list()
            .iter()
            .filter(|c| !c.is_hidden())
            .map(|c| usage(c.as_ref(), c.name()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Detailed help for one (possibly dotted) name.
    ///
    /// Logs "Command does not exist." and returns `None` for unknown names.
    pub fn help(&self, name: &str) -> Option<String> {
        let Some(command) = self.registry.resolve(name) else {
            self.report(&CommandError::not_found(name));
            return None;
        };

        let mut out = usage(command, name);
        if !command.description().is_empty() {
            let _ = write!(out, "\n  {}", command.description());
        }
        for parameter in command.parameters() {
            match &parameter.description {
                Some(text) => {
                    let _ = write!(out, "\n  <{}>  {text}", parameter.name);
                }
                None => {
                    let _ = write!(out, "\n  <{}>", parameter.name);
                }
            }
        }
        if let Some(children) = command.sub_commands() {
            for child in children.iter().filter(|c| !c.is_hidden()) {
                let full_name = format!("{name}.{}", child.name());
                let _ = write!(out, "\n  {}", usage(child.as_ref(), &full_name));
            }
        }
        Some(out)
    }

    // =========================================================================
    // Autocomplete
    // =========================================================================

    /// Completion snapshot for `text`, without touching session state.
    pub fn completions(&self, text: &str) -> Completions {
        Completions::build(&self.registry, text)
    }

    /// Start a new completion session for `partial`.
    pub fn begin_autocomplete(&mut self, partial: &str) {
        self.session = Some(AutocompleteSession::begin(&self.registry, partial));
        self.last_suggestion = None;
    }

    /// Drop the current session. The next tab starts over.
    pub fn reset_autocomplete(&mut self) {
        self.session = None;
        self.last_suggestion = None;
    }

    /// Next suggestion of the current session, if one was begun.
    pub fn cycle_autocomplete(&mut self) -> Option<String> {
        let suggestion = self.session.as_mut()?.next()?;
        self.last_suggestion = Some(suggestion.clone());
        Some(suggestion)
    }

    /// Tab-key helper: continue the session if `display` still belongs to
    /// it, otherwise begin a new one from `display`.
    pub fn autocomplete(&mut self, display: &str) -> String {
        let reusable = self.session.as_ref().is_some_and(|session| {
            session.is_reusable_for(display)
                || self
                    .last_suggestion
                    .as_deref()
                    .is_some_and(|last| names_match(last, display))
        });
        if !reusable {
            self.begin_autocomplete(display);
        }
        self.cycle_autocomplete().unwrap_or_else(|| display.to_string())
    }

    // =========================================================================
    // Runtime flags
    // =========================================================================

    pub const fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub const fn set_disabled(&mut self, disabled: bool) {
        self.settings.disabled = disabled;
    }

    pub const fn set_stack_trace(&mut self, enabled: bool) {
        self.settings.stack_trace = enabled;
    }

    /// Toggle listing of hidden reflective handlers.
    pub fn set_display_hidden_commands(&mut self, enabled: bool) {
        self.settings.display_hidden_commands = enabled;
        self.policy.set_display_hidden(enabled);
        self.reset_autocomplete();
    }

    /// Toggle execution of hidden reflective handlers.
    pub fn set_execute_hidden_commands(&mut self, enabled: bool) {
        self.settings.execute_hidden_commands = enabled;
        self.policy.set_execute_hidden(enabled);
    }

    /// The built-in hidden-handler policy driven by the flags above.
    pub const fn hidden_policy(&self) -> &Arc<HiddenCommandPolicy> {
        &self.policy
    }

    pub fn log(&self) -> &dyn ConsoleLog {
        self.log.as_ref()
    }
}

/// `name <param> <param>`, with a marker when the command cannot run.
fn usage(command: &dyn Command, name: &str) -> String {
    let mut line = name.to_string();
    for parameter in command.parameters() {
        let _ = write!(line, " <{}>", parameter.name);
    }
    if !command.is_executable() {
        line.push_str(" (not executable)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capabilities, Parameter};
    use crate::ports::MockConsoleLog;
    use crate::reflective::Method;
    use crate::registry::DuplicatePolicy;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn console_with(log: Arc<dyn ConsoleLog>) -> Console {
        Console::new(ConsoleSettings::default(), log).unwrap()
    }

    fn counter_leaf(name: &str, hits: &Arc<AtomicUsize>) -> LeafCommand {
        let hits = Arc::clone(hits);
        LeafCommand::new(name, move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_unknown_command_logs_one_error() {
        let mut log = MockConsoleLog::new();
        let mut seq = Sequence::new();
        log.expect_append()
            .with(eq("bogus 1 2"), eq(LogLevel::Command))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        log.expect_append()
            .with(eq("Command does not exist."), eq(LogLevel::Error))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let hits = Arc::new(AtomicUsize::new(0));
        let mut console = console_with(Arc::new(log));
        console.register_leaf(counter_leaf("ping", &hits)).unwrap();

        let err = console.try_dispatch("bogus 1 2").unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disabled_and_blank_are_silent() {
        let mut log = MockConsoleLog::new();
        log.expect_append().never();

        let hits = Arc::new(AtomicUsize::new(0));
        let mut console = console_with(Arc::new(log));
        console.register_leaf(counter_leaf("ping", &hits)).unwrap();

        console.dispatch("   ");
        console.set_disabled(true);
        console.dispatch("ping");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_any_case_and_dotted() {
        let log = Arc::new(MemoryLog::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let mut console = console_with(log.clone());
        console.register_leaf(counter_leaf("Ping", &hits)).unwrap();
        let net = Category::new("net").with(Box::new(counter_leaf("ping", &hits))).unwrap();
        console.register_category(net).unwrap();

        console.dispatch("PING");
        console.dispatch("Net.Ping");
        console.dispatch("net");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(log.entries_at(LogLevel::Error).is_empty());
        assert_eq!(log.entries_at(LogLevel::Command).len(), 3);
    }

    #[test]
    fn test_not_executable_is_refused() {
        let log = Arc::new(MemoryLog::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let mut console = console_with(log.clone());
        console
            .register_leaf(counter_leaf("kick", &hits).with_capabilities(Capabilities::DISPLAY))
            .unwrap();

        assert!(console.list_commands().contains("kick (not executable)"));
        let err = console.try_dispatch("kick bob").unwrap_err();
        assert!(matches!(err, CommandError::NotExecutable { .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(
            log.entries_at(LogLevel::Error)[0].message,
            "Command 'kick' is not executable."
        );
    }

    #[test]
    fn test_stack_trace_mode_logs_chain() {
        let log = Arc::new(MemoryLog::new());
        let mut console = console_with(log.clone());
        console
            .register_leaf(LeafCommand::new("boom", |_, _| {
                Err(anyhow::anyhow!("root cause").context("boom failed"))
            }))
            .unwrap();

        console.dispatch("boom");
        assert_eq!(log.entries_at(LogLevel::Error).len(), 1);

        log.clear();
        console.set_stack_trace(true);
        console.dispatch("boom");
        let errors = log.entries_at(LogLevel::Error);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "boom failed");
        assert!(errors[1].message.contains("root cause"));
    }

    #[test]
    fn test_list_and_help() {
        let mut console = console_with(Arc::new(MemoryLog::new()));
        console
            .register_leaf(
                LeafCommand::new("say", |_, _| Ok(()))
                    .with_description("Print text")
                    .with_parameter(Parameter::new("text").with_description("What to print")),
            )
            .unwrap();
        console
            .register_leaf(LeafCommand::new("secret", |_, _| Ok(())).hidden())
            .unwrap();
        let net = Category::new("net")
            .with_description("Networking")
            .with(Box::new(LeafCommand::new("ping", |_, _| Ok(()))))
            .unwrap();
        console.register_category(net).unwrap();

        assert_eq!(console.list_commands(), "say <text>\nnet");

        let help = console.help("SAY").unwrap();
        assert_eq!(help, "SAY <text>\n  Print text\n  <text>  What to print");

        let help = console.help("net").unwrap();
        assert_eq!(help, "net\n  Networking\n  net.ping");
    }

    #[test]
    fn test_help_unknown_logs_error() {
        let log = Arc::new(MemoryLog::new());
        let console = console_with(log.clone());

        assert!(console.help("nothing").is_none());
        assert_eq!(
            log.entries_at(LogLevel::Error)[0].message,
            "Command does not exist."
        );
    }

    #[test]
    fn test_duplicate_policies() {
        let mut console = console_with(Arc::new(MemoryLog::new()));
        console.register_leaf(LeafCommand::new("x", |_, _| Ok(()))).unwrap();
        assert!(matches!(
            console.register_leaf(LeafCommand::new("X", |_, _| Ok(()))),
            Err(RegistryError::Duplicate { .. })
        ));

        let settings = ConsoleSettings {
            duplicate_policy: DuplicatePolicy::LastWins,
            ..Default::default()
        };
        let log = Arc::new(MemoryLog::new());
        let mut console = Console::new(settings, log.clone()).unwrap();
        console
            .register_leaf(LeafCommand::new("x", |_, log| {
                log.append("first", LogLevel::Success);
                Ok(())
            }))
            .unwrap();
        console
            .register_leaf(LeafCommand::new("x", |_, log| {
                log.append("second", LogLevel::Success);
                Ok(())
            }))
            .unwrap();

        console.dispatch("x");
        assert_eq!(log.entries_at(LogLevel::Success)[0].message, "second");
    }

    #[test]
    fn test_reflective_registration_is_atomic() {
        struct Target;

        let mut console = console_with(Arc::new(MemoryLog::new()));
        console.register_leaf(LeafCommand::new("taken", |_, _| Ok(()))).unwrap();

        let binding = Binding::new(Arc::new(Target))
            .method("fresh", |_: &Target| {})
            .method("taken", |_: &Target| {});
        assert!(console.register_reflective(binding).is_err());
        assert!(console.registry().resolve("fresh").is_none());
    }

    #[test]
    fn test_hidden_toggles_apply_at_runtime() {
        #[derive(Default)]
        struct Cheats {
            used: Mutex<u32>,
        }

        let target = Arc::new(Cheats::default());
        let log = Arc::new(MemoryLog::new());
        let mut console = console_with(log.clone());
        let binding = Binding::new(Arc::clone(&target))
            .with(Method::new("god", |c: &Cheats| *c.used.lock().unwrap() += 1).hidden());
        assert_eq!(console.register_reflective(binding).unwrap(), 1);

        assert_eq!(console.list_commands(), "");
        console.dispatch("god");
        assert_eq!(*target.used.lock().unwrap(), 1);

        console.set_display_hidden_commands(true);
        assert_eq!(console.list_commands(), "god");

        console.set_execute_hidden_commands(false);
        console.dispatch("god");
        assert_eq!(*target.used.lock().unwrap(), 1);
        assert_eq!(
            log.entries_at(LogLevel::Error)[0].message,
            "Command 'god' is not executable."
        );
    }

    #[test]
    fn test_tab_cycling() {
        let mut console = console_with(Arc::new(MemoryLog::new()));
        for name in ["help", "health", "hello"] {
            console.register_leaf(LeafCommand::new(name, |_, _| Ok(()))).unwrap();
        }

        let first = console.autocomplete("he");
        assert_eq!(first, "help");
        let second = console.autocomplete(&first);
        assert_eq!(second, "health");
        let third = console.autocomplete(&second);
        assert_eq!(third, "hello");
        let back = console.autocomplete(&third);
        assert_eq!(back, "he");
        assert_eq!(console.autocomplete(&back), "help");

        // Editing the text starts over.
        assert_eq!(console.autocomplete("hea"), "health");
    }

    #[test]
    fn test_cycle_without_session() {
        let mut console = console_with(Arc::new(MemoryLog::new()));
        assert!(console.cycle_autocomplete().is_none());

        console.begin_autocomplete("x");
        assert_eq!(console.cycle_autocomplete().as_deref(), Some("x"));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = ConsoleSettings {
            max_log_entries: 0,
            ..Default::default()
        };
        assert!(Console::new(settings, Arc::new(MemoryLog::new())).is_err());
    }
}
