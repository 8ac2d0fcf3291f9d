//! Type-keyed methods.
//!
//! A [`Method`] is a dispatch function whose key is the kind of its first
//! argument and whose default is the *aggressive default*: calling it with a
//! kind nobody declared fails with [`DispatchError::UnimplementedForType`]
//! instead of quietly returning nothing.

use polymethod_core::{
    BuildError, DispatchError, DispatchFunction, DispatchFunctionBuilder, Dispatchable, Handler,
    RebindPolicy, Variant, VariantSet,
};

/// A family of handlers sharing one logical name, routed by argument kind.
pub struct Method<A: Dispatchable, R> {
    name: String,
    function: DispatchFunction<A::Kind, A, R, DispatchError>,
}

impl<A, R> Method<A, R>
where
    A: Dispatchable + 'static,
    R: 'static,
{
    /// Start declaring a method called `name`.
    pub fn builder(name: impl Into<String>) -> MethodBuilder<A, R> {
        MethodBuilder::new(name)
    }

    /// Invoke the handler declared for the kind of `args`.
    pub fn invoke(&self, args: &A) -> Result<R, DispatchError> {
        match self.function.invoke(args)? {
            Some(result) => Ok(result),
            None => Err(DispatchError::unimplemented(self.name.as_str(), &args.kind())),
        }
    }

    /// The logical name of this method.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a handler was declared for `kind`.
    pub fn implements(&self, kind: &A::Kind) -> bool {
        self.function.contains(kind)
    }

    /// Iterate over the kinds with a declared handler, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &A::Kind> {
        self.function.keys()
    }

    /// The underlying dispatch function.
    pub fn as_function(&self) -> &DispatchFunction<A::Kind, A, R, DispatchError> {
        &self.function
    }

    /// Start a new builder seeded with every declaration of this method.
    ///
    /// The builder keeps the rebinding policy the method was built with.
    pub fn to_builder(&self) -> MethodBuilder<A, R> {
        MethodBuilder {
            name: self.name.clone(),
            inner: self.function.to_builder(),
        }
    }
}

impl<A: Dispatchable, R> Clone for Method<A, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            function: self.function.clone(),
        }
    }
}

impl<A: Dispatchable + 'static, R: 'static> std::fmt::Debug for Method<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kinds", &self.function.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects the per-kind handlers of one [`Method`].
pub struct MethodBuilder<A: Dispatchable, R> {
    name: String,
    inner: DispatchFunctionBuilder<A::Kind, A, R, DispatchError>,
}

impl<A, R> MethodBuilder<A, R>
where
    A: Dispatchable + 'static,
    R: 'static,
{
    /// Create a builder whose default fails with `UnimplementedForType`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let method = name.clone();
        let inner = DispatchFunctionBuilder::new(|args: &A| args.kind())
            .named(name.clone())
            .default(move |args: &A| {
                Err(DispatchError::unimplemented(method.as_str(), &args.kind()))
            });

        Self { name, inner }
    }

    /// Set the rebinding policy.
    pub fn with_policy(mut self, policy: RebindPolicy) -> Self {
        self.inner = self.inner.with_policy(policy);
        self
    }

    /// Reject a second declaration for the same kind.
    pub fn deny_rebinding(self) -> Self {
        self.with_policy(RebindPolicy::Reject)
    }

    /// Declare `handler` for arguments of `kind`.
    pub fn declare<H>(&mut self, kind: A::Kind, handler: H) -> Result<&mut Self, BuildError>
    where
        H: Handler<A, R, DispatchError>,
    {
        self.inner.on_mut(kind, handler)?;
        Ok(self)
    }

    /// Declare `handler` for the variant carrying `V`.
    ///
    /// The handler receives the payload directly.
    pub fn declare_variant<V, F>(&mut self, handler: F) -> Result<&mut Self, BuildError>
    where
        V: Variant<A> + 'static,
        F: Fn(&V) -> Result<R, DispatchError> + Send + Sync + 'static,
    {
        let method = self.name.clone();
        let projected = move |args: &A| match V::project(args) {
            Some(payload) => handler(payload),
            None => Err(DispatchError::unimplemented(method.as_str(), &args.kind())),
        };
        self.declare(V::KIND, projected)
    }

    /// The logical name of the method being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a handler was declared for `kind`.
    pub fn implements(&self, kind: &A::Kind) -> bool {
        self.inner.contains(kind)
    }

    /// Freeze the declarations.
    pub fn build(self) -> Method<A, R> {
        Method {
            name: self.name,
            function: self.inner.build(),
        }
    }

    /// Freeze the declarations, requiring a handler for every kind.
    pub fn build_exhaustive(self) -> Result<Method<A, R>, BuildError>
    where
        A::Kind: VariantSet,
    {
        let missing: Vec<String> = <A::Kind as VariantSet>::ALL
            .iter()
            .filter(|kind| !self.inner.contains(kind))
            .map(|kind| format!("{kind:?}"))
            .collect();

        if !missing.is_empty() {
            return Err(BuildError::MissingVariants {
                method: self.name,
                kinds: missing,
            });
        }
        Ok(self.build())
    }
}
