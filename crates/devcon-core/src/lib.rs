//! Command registry, dispatch and autocomplete engine for embedded consoles.
//!
//! Applications register commands once at startup (closure leaves,
//! categories, or methods bound on a shared object) and then feed input
//! lines to [`Console::dispatch`]. Output and errors go to a [`ConsoleLog`]
//! port; visibility and permission decisions for bound methods go to a
//! [`CapabilityChecker`] port.
//!
//! ```
//! use std::sync::Arc;
//! use devcon_core::{Binding, Console, ConsoleSettings, LogLevel, MemoryLog};
//!
//! struct Counter(std::sync::atomic::AtomicI64);
//!
//! let counter = Arc::new(Counter(0.into()));
//! let log = Arc::new(MemoryLog::new());
//! let mut console = Console::new(ConsoleSettings::default(), log.clone()).unwrap();
//!
//! console
//!     .register_reflective(Binding::new(Arc::clone(&counter)).method(
//!         "add",
//!         |c: &Counter, n: i64| {
//!             c.0.fetch_add(n, std::sync::atomic::Ordering::SeqCst);
//!         },
//!     ))
//!     .unwrap();
//!
//! console.dispatch("add 5");
//! console.dispatch("add five");
//!
//! assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 5);
//! assert_eq!(
//!     log.entries_at(LogLevel::Error)[0].message,
//!     "Bad parameters. Check your code."
//! );
//! ```
#![deny(unused_crate_dependencies)]

pub mod autocomplete;
pub mod console;
pub mod domain;
pub mod error;
pub mod invocation;
pub mod ports;
pub mod reflective;
pub mod registry;
pub mod settings;

pub use autocomplete::{AutocompleteSession, Completions};
pub use console::Console;
pub use domain::{Capabilities, Category, Command, LeafCommand, Parameter, names_match};
pub use error::{CommandError, CoreError, UNKNOWN_ERROR};
pub use invocation::Invocation;
pub use ports::{
    AllowAll, CapabilityChecker, ConsoleLog, DEFAULT_MAX_LOG_ENTRIES, HandlerDescriptor,
    HiddenCommandPolicy, LogEntry, LogLevel, MemoryLog, NoopLog, TracingLog,
};
pub use reflective::{
    Binding, CoercionError, FromArg, Handler, HandlerOutput, Method, MethodDoc, ParamKind,
    ReflectiveCommand,
};
pub use registry::{DuplicatePolicy, Registry, RegistryError};
pub use settings::{
    ConsoleSettings, MAX_LOG_ENTRIES_LIMIT, SettingsError, SettingsUpdate, validate_settings,
};
