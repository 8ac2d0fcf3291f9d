//! Name registry for type-keyed methods.
//!
//! A [`MethodRegistry`] is owned by the caller. Declarations made under the
//! same logical name accumulate into one shared [`MethodBuilder`], so a
//! family of per-kind handlers can be assembled from many places without a
//! shared base type. Once every declaration is in, [`MethodRegistry::freeze`]
//! turns the registry into an immutable, thread-safe [`Methods`].
//!
//! # Example
//! ```ignore
//! let mut registry = MethodRegistry::new();
//! registry
//!     .method::<Shape, f64>("area")
//!     .declare_variant(|c: &Circle| Ok(c.radius * c.radius * PI))?
//!     .declare_variant(|s: &Square| Ok(s.side * s.side))?;
//!
//! let methods = registry.freeze();
//! let area = methods.invoke::<Shape, f64>("area", &shape)?;
//! ```

use crate::{
    error::{PolymethodError, RegistryError},
    method::{Method, MethodBuilder},
};
use polymethod_core::{BuildError, DispatchError, Dispatchable, Handler, RebindPolicy, Variant};
use std::{
    any::{Any, type_name},
    collections::HashMap,
};

/// The signature a method family is declared with.
fn signature<A, R>() -> &'static str {
    type_name::<fn(&A) -> R>()
}

// ============================================================================
// Type erasure
// ============================================================================

/// A method builder with its argument and result types erased.
trait ErasedBuilder: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn signature(&self) -> &'static str;
    fn freeze(self: Box<Self>) -> FrozenMethod;
}

impl<A, R> ErasedBuilder for MethodBuilder<A, R>
where
    A: Dispatchable + 'static,
    R: 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn signature(&self) -> &'static str {
        signature::<A, R>()
    }

    fn freeze(self: Box<Self>) -> FrozenMethod {
        FrozenMethod {
            method: Box::new((*self).build()),
            signature: signature::<A, R>(),
        }
    }
}

struct FrozenMethod {
    method: Box<dyn Any + Send + Sync>,
    signature: &'static str,
}

fn fresh<A, R>(name: &str, policy: RebindPolicy) -> Box<dyn ErasedBuilder>
where
    A: Dispatchable + 'static,
    R: 'static,
{
    Box::new(MethodBuilder::<A, R>::new(name).with_policy(policy))
}

// ============================================================================
// MethodRegistry - the declaration phase
// ============================================================================

/// Caller-owned mapping from logical name to the method declared under it.
#[derive(Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Box<dyn ErasedBuilder>>,
    policy: RebindPolicy,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject a second declaration for the same name and kind.
    pub fn deny_rebinding(mut self) -> Self {
        self.policy = RebindPolicy::Reject;
        self
    }

    /// Get the builder for `name`, creating it on first use.
    ///
    /// A name previously declared with a different signature is not a
    /// method of this signature: its entry is replaced by a fresh builder.
    pub fn method<A, R>(&mut self, name: &str) -> &mut MethodBuilder<A, R>
    where
        A: Dispatchable + 'static,
        R: 'static,
    {
        let policy = self.policy;
        let slot = self.methods.entry(name.to_owned()).or_insert_with(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(method = name, signature = signature::<A, R>(), "method created");
            fresh::<A, R>(name, policy)
        });

        if !slot.as_any().is::<MethodBuilder<A, R>>() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                method = name,
                previous = slot.signature(),
                signature = signature::<A, R>(),
                "replacing method declared with another signature"
            );
            *slot = fresh::<A, R>(name, policy);
        }

        slot.as_any_mut()
            .downcast_mut::<MethodBuilder<A, R>>()
            .expect("registry entry holds the requested signature")
    }

    /// Declare `handler` for arguments of `kind` under `name`.
    pub fn declare<A, R, H>(
        &mut self,
        name: &str,
        kind: A::Kind,
        handler: H,
    ) -> Result<&mut MethodBuilder<A, R>, BuildError>
    where
        A: Dispatchable + 'static,
        R: 'static,
        H: Handler<A, R, DispatchError>,
    {
        self.method::<A, R>(name).declare(kind, handler)
    }

    /// Declare `handler` for the variant carrying `V` under `name`.
    pub fn declare_variant<A, R, V, F>(
        &mut self,
        name: &str,
        handler: F,
    ) -> Result<&mut MethodBuilder<A, R>, BuildError>
    where
        A: Dispatchable + 'static,
        R: 'static,
        V: Variant<A> + 'static,
        F: Fn(&V) -> Result<R, DispatchError> + Send + Sync + 'static,
    {
        self.method::<A, R>(name).declare_variant(handler)
    }

    /// Check if anything was declared under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Iterate over the declared names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Get the number of declared methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Freeze every declared method.
    pub fn freeze(self) -> Methods {
        #[cfg(feature = "tracing")]
        tracing::debug!(methods = self.methods.len(), "registry frozen");

        let methods = self
            .methods
            .into_iter()
            .map(|(name, builder)| (name, builder.freeze()))
            .collect();
        Methods { methods }
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.methods.iter().map(|(name, b)| (name, b.signature())))
            .finish()
    }
}

// ============================================================================
// Methods - the frozen registry
// ============================================================================

/// An immutable set of methods, addressed by logical name.
pub struct Methods {
    methods: HashMap<String, FrozenMethod>,
}

impl Methods {
    /// Get the method declared under `name`.
    pub fn get<A, R>(&self, name: &str) -> Result<&Method<A, R>, RegistryError>
    where
        A: Dispatchable + 'static,
        R: 'static,
    {
        let frozen = self
            .methods
            .get(name)
            .ok_or_else(|| RegistryError::UnknownMethod(name.to_owned()))?;

        frozen
            .method
            .downcast_ref::<Method<A, R>>()
            .ok_or_else(|| RegistryError::SignatureMismatch {
                name: name.to_owned(),
                expected: signature::<A, R>(),
                declared: frozen.signature,
            })
    }

    /// Invoke the method declared under `name`.
    pub fn invoke<A, R>(&self, name: &str, args: &A) -> Result<R, PolymethodError>
    where
        A: Dispatchable + 'static,
        R: 'static,
    {
        Ok(self.get::<A, R>(name)?.invoke(args)?)
    }

    /// Check if a method exists under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Iterate over the method names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Get the number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if there are no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for Methods {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.methods.iter().map(|(name, m)| (name, m.signature)))
            .finish()
    }
}
