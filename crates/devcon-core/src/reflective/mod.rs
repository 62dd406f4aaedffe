//! Reflective dispatch: expose the methods of a shared object as commands.
//!
//! Handlers are bound explicitly at registration time. Each [`Method`] keeps
//! a type-erased function plus the [`ParamKind`] list derived from its
//! signature, and methods sharing a name collapse into one
//! [`ReflectiveCommand`] that picks an overload by arity and parseability
//! when invoked.
//!
//! The target is shared as `Arc<T>` and handlers only get `&T`. Targets that
//! need to mutate state use their own interior mutability; the engine takes
//! no locks.

mod args;
mod binding;
mod command;

pub use args::{CoercionError, FromArg, ParamKind};
pub use binding::{Binding, Handler, HandlerOutput, Method, MethodDoc};
pub use command::ReflectiveCommand;
