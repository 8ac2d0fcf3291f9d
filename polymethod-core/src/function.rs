//! # Dispatch Functions
//!
//! A [`DispatchFunction`] pairs a key-extraction function with a
//! [`DispatchTable`]. Invoking it extracts the key from the arguments, looks
//! up a handler and calls that handler with the very same arguments.
//!
//! Dispatch functions are assembled by a [`DispatchFunctionBuilder`] and are
//! immutable once built. Registration therefore only exists on the builder:
//! handing anything other than a builder to the registration protocol is a
//! type error, not a runtime surprise.
//!
//! # Example
//!
//! ```rust,ignore
//! let area = DispatchFunction::builder(|shape: &Record| shape.key.clone())
//!     .on("circle".to_string(), |c: &Record| Ok(c.radius * c.radius * PI))?
//!     .on("square".to_string(), |s: &Record| Ok(s.side * s.side))?
//!     .build();
//!
//! assert_eq!(area.invoke(&unit_square)?, Some(1.0));
//! assert_eq!(area.invoke(&blancmange)?, None);
//! ```

use crate::{
    error::{BoxError, BuildError},
    handler::{Handler, SharedHandler},
    key::DispatchKey,
    table::{DispatchTable, Fallback, Lookup},
};
use std::{borrow::Cow, sync::Arc};

/// The key-extraction function of a dispatch function.
pub type KeyFn<A, K> = Arc<dyn Fn(&A) -> K + Send + Sync>;

/// What to do when a key that is already bound is bound again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebindPolicy {
    /// Later registrations replace earlier ones (default).
    #[default]
    Replace,
    /// Rebinding is a [`BuildError::DuplicateKey`].
    Reject,
}

/// A key-extraction function plus a dispatch table, invocable.
///
/// Cloning is cheap: the table and the key function are shared.
pub struct DispatchFunction<K, A: ?Sized, R, E = BoxError> {
    name: Option<Cow<'static, str>>,
    key_fn: KeyFn<A, K>,
    table: Arc<DispatchTable<K, SharedHandler<A, R, E>>>,
    policy: RebindPolicy,
}

impl<K, A, R, E> DispatchFunction<K, A, R, E>
where
    K: DispatchKey,
    A: ?Sized + 'static,
    R: 'static,
    E: 'static,
{
    /// Start building a dispatch function around `key_fn`.
    pub fn builder<F>(key_fn: F) -> DispatchFunctionBuilder<K, A, R, E>
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        DispatchFunctionBuilder::new(key_fn)
    }

    /// A dispatch function with no bindings and the no-op default.
    pub fn new<F>(key_fn: F) -> Self
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        DispatchFunctionBuilder::new(key_fn).build()
    }

    /// Invoke the function.
    ///
    /// Returns `Ok(None)` when the key is unbound and the default is the
    /// no-op. Handler failures are returned exactly as the handler produced
    /// them.
    pub fn invoke(&self, args: &A) -> Result<Option<R>, E> {
        let key = (self.key_fn)(args);
        let lookup = self.table.lookup(&key);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            function = self.name().unwrap_or("<anonymous>"),
            key = ?key,
            outcome = lookup.outcome(),
            "dispatching"
        );

        match lookup.handler() {
            Some(handler) => handler.call(args).map(Some),
            None => Ok(None),
        }
    }

    /// The key `args` would dispatch on.
    pub fn key_of(&self, args: &A) -> K {
        (self.key_fn)(args)
    }

    /// Look up the handler bound for `key`.
    pub fn lookup(&self, key: &K) -> Lookup<'_, SharedHandler<A, R, E>> {
        self.table.lookup(key)
    }

    /// Check if `key` has its own handler.
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Iterate over the bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.keys()
    }

    /// The name given at build time, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The rebinding policy the function was built with.
    pub fn policy(&self) -> RebindPolicy {
        self.policy
    }

    /// Start a new builder seeded with this function's bindings, default,
    /// key function and rebinding policy.
    ///
    /// The original function is unaffected.
    pub fn to_builder(&self) -> DispatchFunctionBuilder<K, A, R, E> {
        DispatchFunctionBuilder {
            name: self.name.clone(),
            key_fn: self.key_fn.clone(),
            table: DispatchTable::clone(&self.table),
            policy: self.policy,
        }
    }

    /// Like [`to_builder`](Self::to_builder), reusing the table when this is
    /// the only handle to it.
    pub fn into_builder(self) -> DispatchFunctionBuilder<K, A, R, E> {
        let table = Arc::try_unwrap(self.table).unwrap_or_else(|shared| (*shared).clone());
        DispatchFunctionBuilder {
            name: self.name,
            key_fn: self.key_fn,
            table,
            policy: self.policy,
        }
    }
}

impl<K, A: ?Sized, R, E> Clone for DispatchFunction<K, A, R, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            key_fn: self.key_fn.clone(),
            table: self.table.clone(),
            policy: self.policy,
        }
    }
}

impl<K, A: ?Sized, R, E> std::fmt::Debug for DispatchFunction<K, A, R, E>
where
    K: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchFunction")
            .field("name", &self.name)
            .field("keys", &self.table.keys().collect::<Vec<_>>())
            .field("has_default", &self.table.fallback().handler().is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

/// Builder collecting `(key, handler)` pairs before freezing them into a
/// [`DispatchFunction`].
///
/// # Example
/// ```ignore
/// let perimeter = DispatchFunction::builder(|s: &Shape| s.kind())
///     .on(ShapeKind::Square, |s: &Shape| Ok(4.0 * s.side()))?
///     .default(|_: &Shape| Ok(0.0))
///     .build();
/// ```
pub struct DispatchFunctionBuilder<K, A: ?Sized, R, E = BoxError> {
    name: Option<Cow<'static, str>>,
    key_fn: KeyFn<A, K>,
    table: DispatchTable<K, SharedHandler<A, R, E>>,
    policy: RebindPolicy,
}

impl<K, A, R, E> DispatchFunctionBuilder<K, A, R, E>
where
    K: DispatchKey,
    A: ?Sized + 'static,
    R: 'static,
    E: 'static,
{
    /// Create an empty builder around `key_fn`.
    pub fn new<F>(key_fn: F) -> Self
    where
        F: Fn(&A) -> K + Send + Sync + 'static,
    {
        Self {
            name: None,
            key_fn: Arc::new(key_fn),
            table: DispatchTable::new(),
            policy: RebindPolicy::default(),
        }
    }

    /// Name the function; the name shows up in logs and errors.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Reject rebinding a key that is already bound.
    pub fn deny_rebinding(mut self) -> Self {
        self.policy = RebindPolicy::Reject;
        self
    }

    /// Set the rebinding policy.
    pub fn with_policy(mut self, policy: RebindPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The current rebinding policy.
    pub fn policy(&self) -> RebindPolicy {
        self.policy
    }

    /// The registration protocol.
    ///
    /// `None` replaces the default handler; `Some(key)` binds `handler`
    /// under `key`.
    pub fn register<H: Handler<A, R, E>>(
        mut self,
        key: Option<K>,
        handler: H,
    ) -> Result<Self, BuildError> {
        self.register_mut(key, handler)?;
        Ok(self)
    }

    /// The registration protocol (mutable version).
    pub fn register_mut<H: Handler<A, R, E>>(
        &mut self,
        key: Option<K>,
        handler: H,
    ) -> Result<&mut Self, BuildError> {
        self.register_shared(key, Arc::new(handler))
    }

    /// Register an already shared handler.
    pub fn register_shared(
        &mut self,
        key: Option<K>,
        handler: SharedHandler<A, R, E>,
    ) -> Result<&mut Self, BuildError> {
        match key {
            None => {
                self.set_default_shared(handler);
            }
            Some(key) => {
                if self.policy == RebindPolicy::Reject && self.table.contains(&key) {
                    return Err(BuildError::DuplicateKey(format!("{key:?}")));
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    function = self.name.as_deref().unwrap_or("<anonymous>"),
                    key = ?key,
                    "handler bound"
                );
                self.table.bind(key, handler);
            }
        }
        Ok(self)
    }

    /// Bind `handler` under `key`.
    pub fn on<H: Handler<A, R, E>>(self, key: K, handler: H) -> Result<Self, BuildError> {
        self.register(Some(key), handler)
    }

    /// Bind `handler` under `key` (mutable version).
    pub fn on_mut<H: Handler<A, R, E>>(
        &mut self,
        key: K,
        handler: H,
    ) -> Result<&mut Self, BuildError> {
        self.register_mut(Some(key), handler)
    }

    /// Replace the default handler. The last default set wins.
    pub fn default<H: Handler<A, R, E>>(mut self, handler: H) -> Self {
        self.set_default_shared(Arc::new(handler));
        self
    }

    /// Replace the default handler (mutable version).
    pub fn default_mut<H: Handler<A, R, E>>(&mut self, handler: H) -> &mut Self {
        self.set_default_shared(Arc::new(handler));
        self
    }

    fn set_default_shared(&mut self, handler: SharedHandler<A, R, E>) {
        self.table.set_default(handler);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            function = self.name.as_deref().unwrap_or("<anonymous>"),
            "default handler set"
        );
    }

    /// Check if `key` is already bound.
    pub fn contains(&self, key: &K) -> bool {
        self.table.contains(key)
    }

    /// Iterate over the bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.table.keys()
    }

    /// The name given so far, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Freeze the bindings into an immutable dispatch function.
    pub fn build(self) -> DispatchFunction<K, A, R, E> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            function = self.name.as_deref().unwrap_or("<anonymous>"),
            bindings = self.table.len(),
            has_default = matches!(self.table.fallback(), Fallback::Handler(_)),
            "dispatch function built"
        );

        DispatchFunction {
            name: self.name,
            key_fn: self.key_fn,
            table: Arc::new(self.table),
            policy: self.policy,
        }
    }

    /// Whether a default handler other than the no-op is set.
    pub fn has_default(&self) -> bool {
        matches!(self.table.fallback(), Fallback::Handler(_))
    }
}
