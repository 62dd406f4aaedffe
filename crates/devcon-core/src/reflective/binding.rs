//! Registration-time binding of handler functions to a target object.
//!
//! A [`Binding`] pairs a shared target with an ordered list of [`Method`]s.
//! Each method is a plain function or closure taking `&T` followed by up to
//! six [`FromArg`] parameters; its parameter kinds are recorded once, when
//! the method is built.
//!
//! ```ignore
//! let binding = Binding::new(Arc::new(Game::default()))
//!     .method("greet", |game: &Game, name: String| game.greet(&name))
//!     .method("greet", |game: &Game, times: i32| game.greet_n(times))
//!     .with(Method::new("god", Game::god_mode).hidden());
//! console.register_reflective(binding)?;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use super::args::{CoercionError, FromArg, ParamKind, next_arg};
use crate::ports::HandlerDescriptor;

/// What a handler may return.
pub trait HandlerOutput {
    /// Normalise into a fault-or-success result.
    fn into_result(self) -> anyhow::Result<()>;
}

impl HandlerOutput for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> HandlerOutput for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// A function callable with a target and coerced string tokens.
///
/// Implemented for every `Fn(&T, A1, .., An) -> R` with `n <= 6`, where each
/// `Ai: FromArg` and `R: HandlerOutput`. `Marker` only disambiguates the
/// arity impls.
pub trait Handler<T, Marker>: Send + Sync + 'static {
    /// Declared parameter kinds, in order.
    fn param_kinds() -> Vec<ParamKind>;

    /// Coerce every token, then call.
    ///
    /// The outer `Err` means coercion failed and the handler was not
    /// called; the inner result is the handler's own outcome.
    fn call(&self, target: &T, tokens: &[&str]) -> Result<anyhow::Result<()>, CoercionError>;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<T, F, R, $($arg,)*> Handler<T, ($($arg,)*)> for F
        where
            F: Fn(&T, $($arg),*) -> R + Send + Sync + 'static,
            R: HandlerOutput,
            $($arg: FromArg,)*
        {
            fn param_kinds() -> Vec<ParamKind> {
                vec![$($arg::KIND),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables, unused_assignments)]
            fn call(
                &self,
                target: &T,
                tokens: &[&str],
            ) -> Result<anyhow::Result<()>, CoercionError> {
                let mut tokens = tokens.iter().copied();
                let mut index = 0usize;
                $(
                    let $arg: $arg = next_arg(&mut tokens, index)?;
                    index += 1;
                )*
                Ok((self)(target, $($arg),*).into_result())
            }
        }
    };
}

impl_handler!();
impl_handler!(A1);
impl_handler!(A1, A2);
impl_handler!(A1, A2, A3);
impl_handler!(A1, A2, A3, A4);
impl_handler!(A1, A2, A3, A4, A5);
impl_handler!(A1, A2, A3, A4, A5, A6);

/// Object-safe view of a [`Handler`] with its marker erased.
pub(crate) trait ErasedHandler<T>: Send + Sync {
    fn call(&self, target: &T, tokens: &[&str]) -> Result<anyhow::Result<()>, CoercionError>;
}

struct Erased<H, M> {
    handler: H,
    _marker: PhantomData<fn() -> M>,
}

impl<T, H, M> ErasedHandler<T> for Erased<H, M>
where
    H: Handler<T, M>,
    M: 'static,
{
    fn call(&self, target: &T, tokens: &[&str]) -> Result<anyhow::Result<()>, CoercionError> {
        self.handler.call(target, tokens)
    }
}

/// Declarative documentation for a method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodDoc {
    pub description: String,
    /// One entry per parameter, in order. Missing entries stay undocumented.
    pub param_descriptions: Vec<String>,
}

impl MethodDoc {
    /// Create doc metadata from a description and per-parameter texts.
    pub fn new(description: impl Into<String>, param_descriptions: &[&str]) -> Self {
        Self {
            description: description.into(),
            param_descriptions: param_descriptions.iter().map(ToString::to_string).collect(),
        }
    }
}

/// One handler, ready to be bound.
pub struct Method<T> {
    pub(crate) descriptor: HandlerDescriptor,
    pub(crate) doc: Option<MethodDoc>,
    pub(crate) handler: Box<dyn ErasedHandler<T>>,
}

impl<T> std::fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("descriptor", &self.descriptor)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Method<T> {
    /// Wrap a handler under `name`.
    pub fn new<H, M>(name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, M>,
        M: 'static,
    {
        Self {
            descriptor: HandlerDescriptor::new(name, H::param_kinds()),
            doc: None,
            handler: Box::new(Erased {
                handler,
                _marker: PhantomData,
            }),
        }
    }

    /// Attach documentation.
    #[must_use]
    pub fn doc(mut self, description: impl Into<String>, param_descriptions: &[&str]) -> Self {
        self.doc = Some(MethodDoc::new(description, param_descriptions));
        self
    }

    /// Mark the handler hidden for the capability checker.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.descriptor.hidden = true;
        self
    }

    /// The registration-time descriptor.
    pub const fn descriptor(&self) -> &HandlerDescriptor {
        &self.descriptor
    }
}

/// A target object plus the methods exposed on it.
pub struct Binding<T> {
    pub(crate) target: Arc<T>,
    pub(crate) methods: Vec<Method<T>>,
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Binding<T> {
    /// Bind to a shared target.
    pub const fn new(target: Arc<T>) -> Self {
        Self {
            target,
            methods: Vec::new(),
        }
    }

    /// Expose an undocumented handler. Repeating a name adds an overload.
    #[must_use]
    pub fn method<H, M>(self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler<T, M>,
        M: 'static,
    {
        self.with(Method::new(name, handler))
    }

    /// Expose a prepared [`Method`].
    #[must_use]
    pub fn with(mut self, method: Method<T>) -> Self {
        self.methods.push(method);
        self
    }

    /// Append every method of another method list (e.g. a shared base set).
    #[must_use]
    pub fn extend(mut self, methods: impl IntoIterator<Item = Method<T>>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// The bound target.
    pub const fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Descriptors of every method, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.methods.iter().map(|m| &m.descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn call<H, M>(
        handler: &H,
        target: &Recorder,
        tokens: &[&str],
    ) -> Result<anyhow::Result<()>, CoercionError>
    where
        H: Handler<Recorder, M>,
    {
        handler.call(target, tokens)
    }

    #[test]
    fn test_param_kinds_follow_signature() {
        fn mixed(_: &Recorder, _: String, _: i32, _: bool, _: f64) {}

        let method = Method::new("mixed", mixed);
        assert_eq!(
            method.descriptor().params,
            vec![ParamKind::Str, ParamKind::Int, ParamKind::Bool, ParamKind::Double]
        );
        assert!(!method.descriptor().hidden);
    }

    #[test]
    fn test_zero_arity_handler() {
        let target = Recorder::default();
        let handler = |r: &Recorder| r.push("ping".into());

        assert!(call(&handler, &target, &[]).unwrap().is_ok());
        assert_eq!(*target.calls.lock().unwrap(), vec!["ping"]);
    }

    #[test]
    fn test_coercion_happens_before_call() {
        let target = Recorder::default();
        let handler = |r: &Recorder, a: i32, b: i32| r.push(format!("{}", a + b));

        assert!(call(&handler, &target, &["2", "x"]).is_err());
        assert!(target.calls.lock().unwrap().is_empty());

        assert!(call(&handler, &target, &["2", "3"]).unwrap().is_ok());
        assert_eq!(*target.calls.lock().unwrap(), vec!["5"]);
    }

    #[test]
    fn test_fallible_handler_output() {
        let target = Recorder::default();
        let handler = |_: &Recorder, n: i64| -> anyhow::Result<()> {
            anyhow::ensure!(n >= 0, "negative: {n}");
            Ok(())
        };

        assert!(call(&handler, &target, &["4"]).unwrap().is_ok());
        let fault = call(&handler, &target, &["-4"]).unwrap().unwrap_err();
        assert_eq!(fault.to_string(), "negative: -4");
    }

    #[test]
    fn test_std_error_output() {
        let target = Recorder::default();
        let handler = |_: &Recorder, s: String| -> Result<(), std::num::ParseIntError> {
            s.parse::<u8>().map(|_| ())
        };

        let fault = call(&handler, &target, &["300"]).unwrap().unwrap_err();
        assert!(fault.to_string().contains("too large"));
    }

    #[test]
    fn test_method_doc_and_hidden() {
        let method = Method::new("god", |_: &Recorder, _: bool| {})
            .doc("Toggle god mode", &["enabled"])
            .hidden();

        assert!(method.descriptor().hidden);
        let doc = method.doc.as_ref().unwrap();
        assert_eq!(doc.description, "Toggle god mode");
        assert_eq!(doc.param_descriptions, vec!["enabled"]);
    }

    #[test]
    fn test_binding_keeps_registration_order() {
        let base = vec![Method::new("reset", |_: &Recorder| {})];
        let binding = Binding::new(Arc::new(Recorder::default()))
            .method("greet", |_: &Recorder, _: String| {})
            .method("greet", |_: &Recorder, _: i32| {})
            .extend(base);

        let names: Vec<_> = binding.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["greet", "greet", "reset"]);
        assert_eq!(Arc::strong_count(binding.target()), 1);
    }
}
