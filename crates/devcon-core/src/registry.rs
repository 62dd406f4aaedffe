//! Command registry: the top-level forest and dotted-name resolution.
//!
//! Resolution is exact (case-insensitive) on every segment. Prefix matching
//! belongs to autocomplete only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Command, names_match};

/// What to do when a sibling with the same name is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the registration with [`RegistryError::Duplicate`].
    #[default]
    Reject,
    /// Keep both; resolution returns the one registered last.
    LastWins,
}

/// Registration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A sibling with the same case-insensitive name exists.
    #[error("Command '{name}' is already registered in {scope}")]
    Duplicate {
        /// The rejected name.
        name: String,
        /// Where the collision happened (`top level` or a category name).
        scope: String,
    },

    /// Command names must be non-empty and contain no `.` or whitespace.
    #[error("Invalid command name: {0:?}")]
    InvalidName(String),
}

/// Scope label used in errors for top-level collisions.
pub const TOP_LEVEL_SCOPE: &str = "top level";

/// Validate a name and check it against its future siblings.
pub(crate) fn check_sibling(
    siblings: &[Box<dyn Command>],
    name: &str,
    scope: &str,
    policy: DuplicatePolicy,
) -> Result<(), RegistryError> {
    if name.is_empty() || name.contains('.') || name.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }

    if policy == DuplicatePolicy::Reject && find_in_scope(siblings, name).is_some() {
        tracing::warn!(name, scope, "rejected duplicate command registration");
        return Err(RegistryError::Duplicate {
            name: name.to_string(),
            scope: scope.to_string(),
        });
    }

    Ok(())
}

/// Find a sibling by exact case-insensitive name.
///
/// When several siblings share a name (only possible under
/// [`DuplicatePolicy::LastWins`]) the last registered one wins.
pub(crate) fn find_in_scope<'a>(
    siblings: &'a [Box<dyn Command>],
    name: &str,
) -> Option<&'a dyn Command> {
    siblings
        .iter()
        .rev()
        .find(|command| names_match(command.name(), name))
        .map(|command| &**command)
}

/// Ordered forest of top-level commands.
#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    policy: DuplicatePolicy,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "commands",
                &self.commands.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry that rejects duplicates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given duplicate policy.
    pub const fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            commands: Vec::new(),
            policy,
        }
    }

    /// The active duplicate policy.
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Append a command to the top level.
    pub fn add(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        check_sibling(&self.commands, command.name(), TOP_LEVEL_SCOPE, self.policy)?;
        tracing::debug!(name = command.name(), "registered command");
        self.commands.push(command);
        Ok(())
    }

    /// Remove a top-level command by name.
    ///
    /// Under [`DuplicatePolicy::LastWins`] this removes the entry resolution
    /// would have returned.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Command>> {
        let index = self
            .commands
            .iter()
            .rposition(|command| names_match(command.name(), name))?;
        Some(self.commands.remove(index))
    }

    /// Resolve a dotted name to a command.
    ///
    /// Every segment must match a sibling exactly (ignoring case); every
    /// segment but the last must name a command with sub-commands. Empty
    /// segments never match.
    pub fn resolve(&self, dotted_name: &str) -> Option<&dyn Command> {
        let mut scope: &[Box<dyn Command>] = &self.commands;
        let mut found: Option<&dyn Command> = None;

        for segment in dotted_name.split('.') {
            if found.is_some() {
                // Descend into the previous match
                scope = found?.sub_commands()?;
            }
            if segment.is_empty() {
                return None;
            }
            found = Some(find_in_scope(scope, segment)?);
        }

        found
    }

    /// Top-level commands in insertion order.
    pub fn list(&self) -> &[Box<dyn Command>] {
        &self.commands
    }

    /// Number of top-level commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, LeafCommand};

    fn leaf(name: &str) -> Box<dyn Command> {
        Box::new(LeafCommand::new(name, |_, _| Ok(())))
    }

    fn registry_with_net() -> Registry {
        let mut net = Category::new("net");
        net.add(leaf("ping")).unwrap();
        net.add(leaf("pong")).unwrap();

        let mut registry = Registry::new();
        registry.add(leaf("help")).unwrap();
        registry.add(Box::new(net)).unwrap();
        registry
    }

    #[test]
    fn test_resolve_any_case() {
        let registry = registry_with_net();
        for name in ["help", "HELP", "Help", "hElP"] {
            assert_eq!(registry.resolve(name).unwrap().name(), "help");
        }
    }

    #[test]
    fn test_resolve_rejects_prefixes_and_extensions() {
        let registry = registry_with_net();
        for name in ["hel", "helpp", "help.", "help.x", "", ".help", "he lp"] {
            assert!(registry.resolve(name).is_none(), "{name:?} should not resolve");
        }
    }

    #[test]
    fn test_resolve_dotted() {
        let registry = registry_with_net();
        for name in ["net.ping", "NET.PING", "net.Ping", "Net.ping"] {
            assert_eq!(registry.resolve(name).unwrap().name(), "ping");
        }
        assert!(registry.resolve("net.pi").is_none());
        assert!(registry.resolve("net.ping.x").is_none());
        assert!(registry.resolve("net..ping").is_none());
    }

    #[test]
    fn test_resolve_category_itself() {
        let registry = registry_with_net();
        let net = registry.resolve("net").unwrap();
        assert!(net.is_category());
        assert_eq!(net.sub_commands().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let mut registry = Registry::new();
        registry.add(leaf("help")).unwrap();

        let err = registry.add(leaf("HELP")).unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                name: "HELP".into(),
                scope: "top level".into()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_last_wins_policy() {
        let mut registry = Registry::with_policy(DuplicatePolicy::LastWins);
        registry
            .add(Box::new(LeafCommand::new("say", |_, _| Ok(())).with_description("first")))
            .unwrap();
        registry
            .add(Box::new(LeafCommand::new("SAY", |_, _| Ok(())).with_description("second")))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("say").unwrap().description(), "second");

        let removed = registry.remove("say").unwrap();
        assert_eq!(removed.description(), "second");
        assert_eq!(registry.resolve("say").unwrap().description(), "first");
    }

    #[test]
    fn test_invalid_names() {
        let mut registry = Registry::new();
        for name in ["", "a.b", "two words"] {
            assert_eq!(
                registry.add(leaf(name)).unwrap_err(),
                RegistryError::InvalidName(name.to_string())
            );
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_preserves_order_and_remove() {
        let mut registry = registry_with_net();
        registry.add(leaf("alpha")).unwrap();

        let names: Vec<_> = registry.list().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["help", "net", "alpha"]);

        assert!(registry.remove("NET").is_some());
        assert!(registry.remove("net").is_none());
        assert!(registry.resolve("net.ping").is_none());
        assert_eq!(registry.len(), 2);
    }
}
