//! # Link-time method declarations
//!
//! Lets modules that never see each other contribute handlers to the same
//! method family. Each module submits a [`MethodDeclaration`] through
//! `inventory`; the application then applies all of them to a registry it
//! owns with [`MethodRegistry::collect_declared`].
//!
//! # Example
//!
//! ```rust,ignore
//! fn declare_circle(registry: &mut MethodRegistry) -> Result<(), BuildError> {
//!     registry
//!         .method::<Shape, f64>("area")
//!         .declare_variant(|c: &Circle| Ok(c.radius * c.radius * PI))?;
//!     Ok(())
//! }
//!
//! inventory::submit! { MethodDeclaration::new("area", declare_circle) }
//!
//! let mut registry = MethodRegistry::new();
//! registry.collect_declared()?;
//! ```

use crate::registry::MethodRegistry;
use polymethod_core::BuildError;

/// Installs one or more handlers into a registry.
pub type InstallFn = fn(&mut MethodRegistry) -> Result<(), BuildError>;

/// A declaration submitted for collection at link time.
pub struct MethodDeclaration {
    name: &'static str,
    install: InstallFn,
}

impl MethodDeclaration {
    /// Create a declaration for the method family `name`.
    pub const fn new(name: &'static str, install: InstallFn) -> Self {
        Self { name, install }
    }

    /// The method family this declaration contributes to.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

inventory::collect!(MethodDeclaration);

impl MethodRegistry {
    /// Apply every submitted [`MethodDeclaration`] to this registry.
    ///
    /// Declarations are applied in no particular order.
    pub fn collect_declared(&mut self) -> Result<&mut Self, BuildError> {
        for declaration in inventory::iter::<MethodDeclaration> {
            #[cfg(feature = "tracing")]
            tracing::debug!(method = declaration.name, "applying declaration");
            (declaration.install)(self)?;
        }
        Ok(self)
    }

    /// Get the number of submitted declarations for `name`.
    pub fn declared_count(name: &str) -> usize {
        let mut count = 0;
        for declaration in inventory::iter::<MethodDeclaration> {
            if declaration.name == name {
                count += 1;
            }
        }
        count
    }
}
