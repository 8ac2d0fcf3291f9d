//! Registry error types.

use polymethod_core::{BuildError, DispatchError};
use thiserror::Error;

/// Errors raised when looking a method up in a frozen registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Nothing was ever declared under this name.
    #[error("no method declared under `{0}`")]
    UnknownMethod(String),

    /// The name exists but was declared with another signature.
    #[error("method `{name}` was declared as {declared}, not {expected}")]
    SignatureMismatch {
        /// Logical name of the method.
        name: String,
        /// Signature the caller asked for.
        expected: &'static str,
        /// Signature the method was declared with.
        declared: &'static str,
    },
}

/// Top-level error type for all polymethod operations.
#[derive(Error, Debug)]
pub enum PolymethodError {
    /// A method could not be found.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A method could not be built.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// The invoked method failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl PolymethodError {
    /// Returns true if an aggressive default rejected the call.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, PolymethodError::Dispatch(e) if e.is_unimplemented())
    }
}
