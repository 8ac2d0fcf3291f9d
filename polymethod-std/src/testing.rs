//! Testing utilities for polymethod.
//!
//! This module provides handlers that make routing easy to observe in tests.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records every argument it receives
//! - [`FailingHandler`]: A handler that always fails with a fixed message

use polymethod_core::{BoxError, Handler};
use std::sync::{Arc, Mutex};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the arguments it is called with and returns a
/// fixed result.
///
/// Useful for verifying that calls are being routed to the right key.
///
/// # Example
///
/// ```rust,ignore
/// let circles = RecordingHandler::new(1.0);
/// let function = DispatchFunction::builder(|s: &Shape| s.kind())
///     .on(ShapeKind::Circle, circles.clone())?
///     .build();
///
/// function.invoke(&circle)?;
/// assert_eq!(circles.count(), 1);
/// ```
pub struct RecordingHandler<A, R> {
    calls: Arc<Mutex<Vec<A>>>,
    result: R,
}

impl<A: Clone, R: Clone> RecordingHandler<A, R> {
    /// Create a recording handler that returns `result`.
    pub fn new(result: R) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Get a clone of the recorded arguments.
    pub fn calls(&self) -> Vec<A> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl<A, R: Clone> Clone for RecordingHandler<A, R> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
            result: self.result.clone(),
        }
    }
}

impl<A, R, E> Handler<A, R, E> for RecordingHandler<A, R>
where
    A: Clone + Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    fn call(&self, args: &A) -> Result<R, E> {
        self.calls.lock().unwrap().push(args.clone());
        Ok(self.result.clone())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that always fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<A, R, E> Handler<A, R, E> for FailingHandler
where
    A: ?Sized,
    E: From<BoxError>,
{
    fn call(&self, _args: &A) -> Result<R, E> {
        Err(E::from(BoxError::from(self.message.clone())))
    }
}
