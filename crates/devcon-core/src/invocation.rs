//! A parsed command line.
//!
//! The console splits a line on whitespace: the first token is the
//! (possibly dotted) command name, the rest are parameter tokens. Commands
//! get all three views of the parameters and pick the one they need:
//!
//! - [`Invocation::args`]: the tokens
//! - [`Invocation::params_joined`]: tokens joined by single spaces
//! - [`Invocation::params_concatenated`]: tokens glued together with no
//!   separator, the historical console contract

/// One dispatched line, borrowed from the caller's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    line: &'a str,
    name: &'a str,
    args: Vec<&'a str>,
}

impl<'a> Invocation<'a> {
    /// Parse a line. Returns `None` for blank input.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next()?;

        Some(Self {
            line,
            name,
            args: tokens.collect(),
        })
    }

    /// Build an invocation from an already-split name and tokens.
    pub fn from_parts(line: &'a str, name: &'a str, args: Vec<&'a str>) -> Self {
        Self { line, name, args }
    }

    /// The original line, untouched.
    pub const fn line(&self) -> &'a str {
        self.line
    }

    /// The command name as typed.
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Parameter tokens (excluding the name).
    pub fn args(&self) -> &[&'a str] {
        &self.args
    }

    /// Get the token at `index` (0 is the first token after the name).
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Tokens joined with single spaces.
    pub fn params_joined(&self) -> String {
        self.args.join(" ")
    }

    /// Tokens concatenated without separators.
    pub fn params_concatenated(&self) -> String {
        self.args.concat()
    }
}
