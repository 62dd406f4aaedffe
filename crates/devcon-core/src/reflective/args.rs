//! Typed parameters and token coercion.
//!
//! Every handler parameter type implements [`FromArg`], which names its
//! [`ParamKind`] and parses one whitespace-free token with Rust's standard
//! `FromStr` rules for that type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared type of a handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Str,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl ParamKind {
    /// Type name shown for undocumented parameters.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Str => "String",
            Self::Bool => "bool",
            Self::Byte => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A token could not be turned into the declared parameter type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("cannot read {token:?} as {kind}")]
    Parse { token: String, kind: ParamKind },

    #[error("missing argument {index} ({kind})")]
    Missing { index: usize, kind: ParamKind },
}

/// A handler parameter type.
pub trait FromArg: Sized {
    /// Declared kind, recorded at registration.
    const KIND: ParamKind;

    /// Parse one token.
    fn from_arg(token: &str) -> Result<Self, CoercionError>;
}

impl FromArg for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_arg(token: &str) -> Result<Self, CoercionError> {
        Ok(token.to_string())
    }
}

fn parse_token<T: FromStr>(token: &str, kind: ParamKind) -> Result<T, CoercionError> {
    token.parse().map_err(|_| CoercionError::Parse {
        token: token.to_string(),
        kind,
    })
}

macro_rules! impl_from_arg {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl FromArg for $ty {
                const KIND: ParamKind = ParamKind::$kind;

                fn from_arg(token: &str) -> Result<Self, CoercionError> {
                    parse_token(token, Self::KIND)
                }
            }
        )*
    };
}

impl_from_arg! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
}

/// Take the next token for parameter `index` and coerce it.
pub(crate) fn next_arg<'t, A, I>(tokens: &mut I, index: usize) -> Result<A, CoercionError>
where
    A: FromArg,
    I: Iterator<Item = &'t str>,
{
    let token = tokens.next().ok_or(CoercionError::Missing {
        index,
        kind: A::KIND,
    })?;
    A::from_arg(token)
}
