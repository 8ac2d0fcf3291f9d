//! # polymethod-core
//!
//! Core building blocks of the polymethod multiple-dispatch registry.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! libraries that only need to define dispatch functions, without the
//! type-keyed convenience layer in `polymethod-std`.
//!
//! # Layers
//!
//! ## Dispatch Table ([`DispatchTable`])
//!
//! Pure data: a mapping from dispatch key to handler, plus exactly one
//! default slot. An unbound key is never an error; it resolves through the
//! default, which starts out as the no-op.
//!
//! ## Dispatch Function ([`DispatchFunction`])
//!
//! A key-extraction function closed over at construction plus one table.
//! Invocation extracts the key, looks up a handler and calls it with the
//! original arguments. Handler failures pass through untouched.
//!
//! ## Registration ([`DispatchFunctionBuilder`])
//!
//! Handlers are collected on a builder and frozen into an immutable
//! dispatch function. Later registrations under the same key replace
//! earlier ones unless the builder rejects rebinding.
//!
//! # Error Types
//!
//! - [`DispatchError`] - Failures of type-keyed invocation
//! - [`BuildError`] - Failures while assembling a dispatch function

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod function;
mod handler;
mod key;
mod table;

// Re-exports
pub use error::{BoxError, BuildError, DispatchError};
pub use function::{DispatchFunction, DispatchFunctionBuilder, KeyFn, RebindPolicy};
pub use handler::{Handler, SharedHandler};
pub use key::{DispatchKey, Dispatchable, Variant, VariantSet};
pub use table::{DispatchTable, Fallback, Lookup};
