//! Namespace nodes.
//!
//! A category exists to be walked through by dotted names (`net.ping`).
//! Executing it directly does nothing.

use super::capabilities::Capabilities;
use super::command::Command;
use crate::error::CommandError;
use crate::invocation::Invocation;
use crate::ports::ConsoleLog;
use crate::registry::{DuplicatePolicy, RegistryError, check_sibling};

/// A command whose only job is to hold children.
pub struct Category {
    name: String,
    description: Option<String>,
    children: Vec<Box<dyn Command>>,
    capabilities: Capabilities,
    policy: DuplicatePolicy,
}

impl std::fmt::Debug for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field(
                "children",
                &self.children.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl Category {
    /// Create an empty, visible category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            children: Vec::new(),
            capabilities: Capabilities::all(),
            policy: DuplicatePolicy::Reject,
        }
    }

    /// Set help text. Defaults to the category name.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the capability set (e.g. hide a whole namespace).
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Choose how duplicate children are handled. Defaults to
    /// [`DuplicatePolicy::Reject`] whatever the console's own setting,
    /// which governs the top level only.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add a child command.
    pub fn add(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        check_sibling(&self.children, command.name(), &self.name, self.policy)?;
        self.children.push(command);
        Ok(())
    }

    /// Builder-style [`Category::add`].
    pub fn with(mut self, command: Box<dyn Command>) -> Result<Self, RegistryError> {
        self.add(command)?;
        Ok(self)
    }
}

impl Command for Category {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }

    fn sub_commands(&self) -> Option<&[Box<dyn Command>]> {
        Some(&self.children)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn execute(
        &self,
        _invocation: &Invocation<'_>,
        _log: &dyn ConsoleLog,
    ) -> Result<(), CommandError> {
        Ok(())
    }
}
