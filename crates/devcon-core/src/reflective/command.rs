//! The adapter command produced for each bound method name.

use std::sync::Arc;

use tracing::debug;

use super::args::ParamKind;
use super::binding::{Binding, ErasedHandler, Method, MethodDoc};
use crate::domain::{Capabilities, Command, Parameter, names_match};
use crate::error::CommandError;
use crate::invocation::Invocation;
use crate::ports::{CapabilityChecker, ConsoleLog, HandlerDescriptor};

struct Overload<T> {
    descriptor: HandlerDescriptor,
    handler: Box<dyn ErasedHandler<T>>,
}

impl<T> Overload<T> {
    /// Number of `String` parameters. Overloads with fewer are tried first
    /// so that `greet(i32)` gets `"5"` before `greet(String)` swallows it.
    fn string_params(&self) -> usize {
        self.descriptor
            .params
            .iter()
            .filter(|kind| **kind == ParamKind::Str)
            .count()
    }
}

/// All overloads bound under one name, exposed as a single [`Command`].
pub struct ReflectiveCommand<T> {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    target: Arc<T>,
    overloads: Vec<Overload<T>>,
    checker: Arc<dyn CapabilityChecker>,
}

impl<T> std::fmt::Debug for ReflectiveCommand<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectiveCommand")
            .field("name", &self.name)
            .field(
                "overloads",
                &self
                    .overloads
                    .iter()
                    .map(|o| &o.descriptor)
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> ReflectiveCommand<T> {
    fn from_method(
        target: Arc<T>,
        method: Method<T>,
        checker: Arc<dyn CapabilityChecker>,
    ) -> Self {
        let mut command = Self {
            name: method.descriptor.name.clone(),
            description: String::new(),
            parameters: Vec::new(),
            target,
            overloads: Vec::new(),
            checker,
        };
        command.push(method);
        command
    }

    /// Add an overload. Metadata comes from the first overload, except the
    /// description which comes from the first documented one.
    fn push(&mut self, method: Method<T>) {
        if self.overloads.is_empty() {
            self.parameters = parameters_for(&method.descriptor, method.doc.as_ref());
        }
        if self.description.is_empty() {
            if let Some(doc) = &method.doc {
                self.description.clone_from(&doc.description);
            }
        }
        self.overloads.push(Overload {
            descriptor: method.descriptor,
            handler: method.handler,
        });
    }

    /// Descriptors of every overload, in registration order.
    pub fn overloads(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.overloads.iter().map(|o| &o.descriptor)
    }
}

fn parameters_for(descriptor: &HandlerDescriptor, doc: Option<&MethodDoc>) -> Vec<Parameter> {
    descriptor
        .params
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let parameter = Parameter::new(kind.type_name());
            match doc.and_then(|d| d.param_descriptions.get(i)) {
                Some(text) => parameter.with_description(text.as_str()),
                None => parameter,
            }
        })
        .collect()
}

impl<T: Send + Sync + 'static> Command for ReflectiveCommand<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Union over overloads, asked fresh each time so runtime policy
    /// toggles take effect immediately.
    fn capabilities(&self) -> Capabilities {
        self.overloads
            .iter()
            .fold(Capabilities::empty(), |caps, overload| {
                caps | Capabilities::from_checks(
                    self.checker.can_display(&overload.descriptor),
                    self.checker.can_execute(&overload.descriptor),
                )
            })
    }

    fn execute(
        &self,
        invocation: &Invocation<'_>,
        _log: &dyn ConsoleLog,
    ) -> Result<(), CommandError> {
        let mut tokens = invocation.args();
        if let Some((first, rest)) = tokens.split_first() {
            if names_match(first, &self.name) {
                tokens = rest;
            }
        }

        let executable: Vec<&Overload<T>> = self
            .overloads
            .iter()
            .filter(|o| self.checker.can_execute(&o.descriptor))
            .collect();
        if executable.is_empty() {
            return Err(CommandError::NoSuchMethod {
                name: self.name.clone(),
            });
        }

        let mut candidates: Vec<&Overload<T>> = executable
            .into_iter()
            .filter(|o| o.descriptor.arity() == tokens.len())
            .collect();
        candidates.sort_by_key(|o| o.string_params());

        for overload in candidates {
            match overload.handler.call(&self.target, tokens) {
                Ok(outcome) => return outcome.map_err(CommandError::Invocation),
                Err(err) => {
                    debug!(
                        command = %self.name,
                        params = ?overload.descriptor.params,
                        "overload skipped: {err}"
                    );
                }
            }
        }

        Err(CommandError::BadParameters {
            name: self.name.clone(),
        })
    }
}

impl<T: Send + Sync + 'static> Binding<T> {
    /// Collapse the bound methods into one command per distinct name.
    ///
    /// Names are grouped case-insensitively; commands appear in the order
    /// their name was first bound and keep the first spelling.
    pub fn into_commands(
        self,
        checker: Arc<dyn CapabilityChecker>,
    ) -> Vec<ReflectiveCommand<T>> {
        let mut commands: Vec<ReflectiveCommand<T>> = Vec::new();
        for method in self.methods {
            match commands
                .iter_mut()
                .find(|c| names_match(&c.name, &method.descriptor.name))
            {
                Some(command) => command.push(method),
                None => commands.push(ReflectiveCommand::from_method(
                    Arc::clone(&self.target),
                    method,
                    Arc::clone(&checker),
                )),
            }
        }
        commands
    }
}
