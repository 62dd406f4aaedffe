//! Hierarchy-aware name completion.
//!
//! [`Completions`] is a pure snapshot: built once from the registry and a
//! partial input, then indexed. Cycling is a plain cursor over
//! `len + 1` slots, the last slot being the input as the user typed it.
//!
//! ```text
//! registry: help, health, hello, net { ping, pong }
//!
//! "he"    -> help, health, hello, "he", help, ...
//! "net.p" -> net.ping, net.pong, "net.p", ...
//! "nope." -> "nope.", "nope.", ...
//! ```

use crate::domain::names_match;
use crate::registry::Registry;

/// Candidate names for one partial input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completions {
    original: String,
    prefix_path: String,
    names: Vec<String>,
}

impl Completions {
    /// Match `input` against the visible commands of `registry`.
    ///
    /// Every dotted segment but the last must name a visible category
    /// exactly; the last is matched as a prefix in the scope reached.
    /// A broken path yields no candidates.
    pub fn build(registry: &Registry, input: &str) -> Self {
        let normalized = input.to_lowercase();
        let mut segments: Vec<&str> = normalized.split('.').collect();
        let partial = segments.pop().unwrap_or_default();

        let mut scope = registry.list();
        let mut path: Vec<&str> = Vec::with_capacity(segments.len());
        for segment in segments {
            let next = scope
                .iter()
                .rev()
                .find(|c| !c.is_hidden() && names_match(c.name(), segment))
                .and_then(|c| c.sub_commands().map(move |children| (c.name(), children)));
            match next {
                Some((name, children)) => {
                    path.push(name);
                    scope = children;
                }
                None => return Self::empty(input),
            }
        }

        let visible: Vec<&str> = scope
            .iter()
            .filter(|c| !c.is_hidden() && c.name().to_lowercase().starts_with(partial))
            .map(|c| c.name())
            .collect();
        // A shadowed duplicate is never what dispatch would run.
        let names = visible
            .iter()
            .enumerate()
            .filter(|&(i, name)| !visible[i + 1..].iter().any(|later| names_match(later, name)))
            .map(|(_, name)| (*name).to_string())
            .collect();

        Self {
            original: input.to_string(),
            prefix_path: path.join("."),
            names,
        }
    }

    fn empty(input: &str) -> Self {
        Self {
            original: input.to_string(),
            prefix_path: String::new(),
            names: Vec::new(),
        }
    }

    /// The input exactly as given.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical names of the categories walked through, joined by `.`.
    pub fn prefix_path(&self) -> &str {
        &self.prefix_path
    }

    /// Number of candidates (not counting the original-input slot).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Full dotted name of candidate `index`.
    pub fn suggestion(&self, index: usize) -> Option<String> {
        self.names.get(index).map(|name| self.qualify(name))
    }

    /// Every full dotted candidate name, in registry order.
    pub fn suggestions(&self) -> impl Iterator<Item = String> + '_ {
        self.names.iter().map(|name| self.qualify(name))
    }

    /// Text for a cursor position, wrapping over `len + 1` slots.
    pub fn at(&self, cursor: usize) -> String {
        let slot = cursor % (self.names.len() + 1);
        self.suggestion(slot).unwrap_or_else(|| self.original.clone())
    }

    /// Whether a display string still belongs to this snapshot.
    pub fn is_reusable_for(&self, display: &str) -> bool {
        names_match(display, &self.prefix_path)
    }

    fn qualify(&self, name: &str) -> String {
        if self.prefix_path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.prefix_path)
        }
    }
}

/// A [`Completions`] snapshot plus a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteSession {
    completions: Completions,
    cursor: usize,
}

impl AutocompleteSession {
    /// Start cycling from the first candidate.
    pub fn begin(registry: &Registry, input: &str) -> Self {
        Self::from_completions(Completions::build(registry, input))
    }

    pub const fn from_completions(completions: Completions) -> Self {
        Self {
            completions,
            cursor: 0,
        }
    }

    pub const fn completions(&self) -> &Completions {
        &self.completions
    }

    pub fn is_reusable_for(&self, display: &str) -> bool {
        self.completions.is_reusable_for(display)
    }
}

/// Never ends: yields each suggestion, then the original input, then
/// starts over.
impl Iterator for AutocompleteSession {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let text = self.completions.at(self.cursor);
        self.cursor = (self.cursor + 1) % (self.completions.len() + 1);
        Some(text)
    }
}
