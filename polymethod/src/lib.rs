//! # polymethod - Open Multiple Dispatch
//!
//! `polymethod` routes a call to one of many independently written handlers
//! sharing a logical name. The handler is picked by a *dispatch key*
//! computed from the call's arguments: the variant of the first argument,
//! a field of a record, or anything else that can be hashed and compared.
//!
//! New handlers can be added without touching the original definition or
//! any other handler.
//!
//! ## Quick Start (Type-Keyed)
//!
//! ```rust,ignore
//! use polymethod::{Dispatchable, MethodRegistry};
//!
//! #[derive(Dispatchable)]
//! enum Shape {
//!     Circle(Circle),
//!     Square(Square),
//! }
//!
//! let mut registry = MethodRegistry::new();
//! registry
//!     .method::<Shape, f64>("area")
//!     .declare_variant(|c: &Circle| Ok(c.radius * c.radius * PI))?
//!     .declare_variant(|s: &Square| Ok(s.side * s.side))?;
//!
//! let methods = registry.freeze();
//! assert_eq!(methods.invoke::<Shape, f64>("area", &unit_square)?, 1.0);
//! ```
//!
//! ## Arbitrary Keys
//!
//! ```rust,ignore
//! use polymethod::DispatchFunction;
//!
//! let area = DispatchFunction::builder(|r: &Record| r.key.clone())
//!     .on("square".to_string(), |r: &Record| Ok(r.side * r.side))?
//!     .build();
//!
//! // Unbound keys resolve to the no-op default, not an error.
//! assert_eq!(area.invoke(&blancmange)?, None);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use polymethod_core::{
    // Error types
    BoxError,
    BuildError,
    DispatchError,
    // Dispatch functions
    DispatchFunction,
    DispatchFunctionBuilder,
    // Keys
    DispatchKey,
    // Tables
    DispatchTable,
    Dispatchable,
    Fallback,
    // Handlers
    Handler,
    KeyFn,
    Lookup,
    RebindPolicy,
    SharedHandler,
    Variant,
    VariantSet,
};

// Type-keyed methods
pub use polymethod_std::{
    Method, MethodBuilder, MethodRegistry, Methods, PolymethodError, RegistryError,
};

#[cfg(feature = "inventory")]
pub use polymethod_std::{InstallFn, MethodDeclaration};

/// Testing utilities.
pub mod testing {
    pub use polymethod_std::testing::{FailingHandler, RecordingHandler};
}

/// Prelude module - common imports for polymethod.
///
/// # Usage
///
/// ```rust,ignore
/// use polymethod::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        BuildError,
        DispatchError,
        // Core types
        DispatchFunction,
        Dispatchable,
        Handler,
        // Type-keyed layer
        Method,
        MethodRegistry,
        Methods,
        PolymethodError,
        Variant,
        VariantSet,
    };
}

#[cfg(feature = "macros")]
pub use polymethod_macros::Dispatchable;

#[cfg(feature = "inventory")]
pub use inventory;
