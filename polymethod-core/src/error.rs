//! Error types for polymethod.
//!
//! This module provides the error hierarchy shared by every layer:
//!
//! - [`DispatchError`] - Failures raised while invoking a type-keyed method
//! - [`BuildError`] - Failures raised while assembling a dispatch function
//! - [`BoxError`] - The catch-all error for arbitrary handler failures

use std::fmt::Debug;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when a type-keyed method is invoked.
///
/// There are exactly two kinds. The router itself only ever produces
/// [`DispatchError::UnimplementedForType`]; everything else is a handler's
/// own failure passed through untouched.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No handler was declared for the kind of the first argument.
    #[error("method `{method}` is not implemented for {kind}")]
    UnimplementedForType {
        /// Logical name of the method that was invoked.
        method: String,
        /// The offending kind, rendered with its `Debug` form.
        kind: String,
    },

    /// A handler failed.
    #[error(transparent)]
    Handler(#[from] BoxError),
}

impl DispatchError {
    /// Build an [`DispatchError::UnimplementedForType`] for `kind`.
    pub fn unimplemented(method: impl Into<String>, kind: &impl Debug) -> Self {
        DispatchError::UnimplementedForType {
            method: method.into(),
            kind: format!("{kind:?}"),
        }
    }

    /// Wrap an arbitrary handler failure.
    pub fn handler(err: impl Into<BoxError>) -> Self {
        DispatchError::Handler(err.into())
    }

    /// Returns true if this error was raised by an aggressive default.
    pub fn is_unimplemented(&self) -> bool {
        matches!(self, DispatchError::UnimplementedForType { .. })
    }
}

/// Errors that can occur while building a dispatch function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A key was bound twice while rebinding is rejected.
    #[error("duplicate dispatch key: {0}")]
    DuplicateKey(String),

    /// An exhaustive build found kinds without a handler.
    #[error("method `{method}` has no handler for: {}", .kinds.join(", "))]
    MissingVariants {
        /// Logical name of the incomplete method.
        method: String,
        /// The kinds left unbound.
        kinds: Vec<String>,
    },
}
