//! The `Command` trait and parameter metadata.

use serde::{Deserialize, Serialize};

use super::capabilities::Capabilities;
use crate::error::CommandError;
use crate::invocation::Invocation;
use crate::ports::ConsoleLog;

/// Parameter metadata shown by help and listings.
///
/// Carries no validation logic; coercion is the command's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// Create an undocumented parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A node of the command forest.
///
/// Leaves do the work, categories only group children and are walked
/// through by dotted names, reflective commands forward to bound handlers.
///
/// # Invariants
///
/// - Names are unique among siblings, compared case-insensitively
/// - A leaf returns `None` from [`Command::sub_commands`]
/// - A category's [`Command::execute`] does nothing
pub trait Command: Send + Sync {
    /// Identifier within the sibling scope.
    fn name(&self) -> &str;

    /// Human-readable help text.
    fn description(&self) -> &str;

    /// Ordered parameter metadata.
    fn parameters(&self) -> &[Parameter] {
        &[]
    }

    /// Children, present only on categories.
    fn sub_commands(&self) -> Option<&[Box<dyn Command>]> {
        None
    }

    /// Current capability set. May depend on runtime context.
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Run the command.
    fn execute(
        &self,
        invocation: &Invocation<'_>,
        log: &dyn ConsoleLog,
    ) -> Result<(), CommandError>;

    /// Check if the command is excluded from listings and completions.
    fn is_hidden(&self) -> bool {
        self.capabilities().is_hidden()
    }

    /// Check if dispatch may invoke the command.
    fn is_executable(&self) -> bool {
        self.capabilities().is_executable()
    }

    /// Check if the command has children to descend into.
    fn is_category(&self) -> bool {
        self.sub_commands().is_some()
    }
}

/// Case-insensitive name comparison used everywhere names are matched.
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
