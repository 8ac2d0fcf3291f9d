//! # Handlers
//!
//! A handler is the per-key implementation behind a dispatch function. It
//! receives the very same arguments the dispatch function was invoked with
//! and either produces a result or fails.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|shape: &Shape| Ok(shape.area())`
//! 2. **Struct implementation**: `impl Handler<Shape, f64, BoxError> for AreaOfCircle`

use std::sync::Arc;

/// The implementation bound under one dispatch key.
///
/// Handlers own their failure contract: whatever they return is passed back
/// to the caller of the dispatch function unchanged.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle arguments of type `{A}`",
    label = "missing `Handler<{A}, {R}, {E}>` implementation",
    note = "Closures must have the shape `Fn(&{A}) -> Result<{R}, {E}>`."
)]
pub trait Handler<A: ?Sized, R, E>: Send + Sync + 'static {
    /// Executes the handler.
    fn call(&self, args: &A) -> Result<R, E>;
}

// Blanket impl for closures
impl<F, A, R, E> Handler<A, R, E> for F
where
    A: ?Sized,
    F: Fn(&A) -> Result<R, E> + Send + Sync + 'static,
{
    fn call(&self, args: &A) -> Result<R, E> {
        (self)(args)
    }
}

/// A type-erased handler shared between a builder and the functions it builds.
pub type SharedHandler<A, R, E> = Arc<dyn Handler<A, R, E>>;
