//! Closure-backed leaf commands.

use super::capabilities::Capabilities;
use super::command::{Command, Parameter};
use crate::error::CommandError;
use crate::invocation::Invocation;
use crate::ports::ConsoleLog;

type Action = Box<dyn Fn(&Invocation<'_>, &dyn ConsoleLog) -> anyhow::Result<()> + Send + Sync>;

/// A leaf command that runs a closure.
///
/// The closure receives the whole [`Invocation`] so it can read the
/// parameter tokens or either joined form, and the console log for output.
/// An `Err` from the closure is reported like any other handler fault.
pub struct LeafCommand {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    capabilities: Capabilities,
    action: Action,
}

impl std::fmt::Debug for LeafCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl LeafCommand {
    /// Create a visible, executable leaf with no description.
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Invocation<'_>, &dyn ConsoleLog) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            capabilities: Capabilities::all(),
            action: Box::new(action),
        }
    }

    /// Set help text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append parameter metadata.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Override the capability set.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Shorthand for a command that is callable but never listed.
    #[must_use]
    pub const fn hidden(self) -> Self {
        self.with_capabilities(Capabilities::EXECUTE)
    }
}

impl Command for LeafCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn execute(
        &self,
        invocation: &Invocation<'_>,
        log: &dyn ConsoleLog,
    ) -> Result<(), CommandError> {
        (self.action)(invocation, log).map_err(CommandError::Invocation)
    }
}
