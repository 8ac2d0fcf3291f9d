//! # polymethod-std
//!
//! Type-keyed methods for the polymethod multiple-dispatch registry.
//!
//! This crate provides:
//! - **Methods**: [`Method`], [`MethodBuilder`] - dispatch on the kind of the
//!   first argument, failing loudly for undeclared kinds
//! - **Registries**: [`MethodRegistry`], [`Methods`] - accumulate declarations
//!   by logical name, then freeze
//! - **Link-time collection**: [`MethodDeclaration`] (feature `inventory`)
//! - **Testing**: [`testing`] helpers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use polymethod_core;

// Modules
#[cfg(feature = "inventory")]
pub mod declared;
pub mod error;
pub mod method;
pub mod registry;
pub mod testing;

#[cfg(feature = "inventory")]
pub use declared::{InstallFn, MethodDeclaration};
pub use error::{PolymethodError, RegistryError};
pub use method::{Method, MethodBuilder};
pub use registry::{MethodRegistry, Methods};

#[cfg(feature = "inventory")]
pub use inventory;
