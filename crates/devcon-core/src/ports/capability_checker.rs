//! Capability checker port.
//!
//! Decides, per bound handler, whether it may be displayed and whether it
//! may be executed. The two questions are asked separately so a handler can
//! be visible-but-refused or hidden-but-callable.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::reflective::ParamKind;

/// Registration-time description of one bound handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
    /// Handler (and command) name as registered.
    pub name: String,
    /// Declared parameter types, in order.
    pub params: Vec<ParamKind>,
    /// Handler was registered with the hidden marker.
    pub hidden: bool,
}

impl HandlerDescriptor {
    /// Create a descriptor for a non-hidden handler.
    pub fn new(name: impl Into<String>, params: Vec<ParamKind>) -> Self {
        Self {
            name: name.into(),
            params,
            hidden: false,
        }
    }

    /// Mark the handler as hidden.
    #[must_use]
    pub const fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Port for capability checks against the console context.
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityChecker: Send + Sync {
    /// May this handler appear in listings and completions?
    fn can_display(&self, handler: &HandlerDescriptor) -> bool;

    /// May this handler be invoked?
    fn can_execute(&self, handler: &HandlerDescriptor) -> bool;
}

/// Grants everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CapabilityChecker for AllowAll {
    fn can_display(&self, _handler: &HandlerDescriptor) -> bool {
        true
    }

    fn can_execute(&self, _handler: &HandlerDescriptor) -> bool {
        true
    }
}

/// Built-in policy for handlers registered with the hidden marker.
///
/// Unmarked handlers are always displayable and executable. Marked handlers
/// are displayable only while `display_hidden` is on and executable only
/// while `execute_hidden` is on. Both toggles can change at runtime.
#[derive(Debug)]
pub struct HiddenCommandPolicy {
    display_hidden: AtomicBool,
    execute_hidden: AtomicBool,
}

impl Default for HiddenCommandPolicy {
    /// Hidden handlers are callable but not listed.
    fn default() -> Self {
        Self::new(false, true)
    }
}

impl HiddenCommandPolicy {
    /// Create a policy with explicit toggles.
    pub const fn new(display_hidden: bool, execute_hidden: bool) -> Self {
        Self {
            display_hidden: AtomicBool::new(display_hidden),
            execute_hidden: AtomicBool::new(execute_hidden),
        }
    }

    /// Whether hidden handlers are currently listed.
    pub fn display_hidden(&self) -> bool {
        self.display_hidden.load(Ordering::Relaxed)
    }

    /// Whether hidden handlers are currently callable.
    pub fn execute_hidden(&self) -> bool {
        self.execute_hidden.load(Ordering::Relaxed)
    }

    /// Toggle listing of hidden handlers.
    pub fn set_display_hidden(&self, enabled: bool) {
        self.display_hidden.store(enabled, Ordering::Relaxed);
    }

    /// Toggle execution of hidden handlers.
    pub fn set_execute_hidden(&self, enabled: bool) {
        self.execute_hidden.store(enabled, Ordering::Relaxed);
    }
}

impl CapabilityChecker for HiddenCommandPolicy {
    fn can_display(&self, handler: &HandlerDescriptor) -> bool {
        !handler.hidden || self.display_hidden()
    }

    fn can_execute(&self, handler: &HandlerDescriptor) -> bool {
        !handler.hidden || self.execute_hidden()
    }
}
