//! # Dispatch Keys
//!
//! A dispatch key is any value computed deterministically from call
//! arguments. Keys are compared by equality only: there is no ordering,
//! no subtyping and no "closest match".
//!
//! Type-keyed dispatch uses the *kind* of the first argument as its key.
//! A kind is the variant tag of a closed enumeration, usually generated by
//! `#[derive(Dispatchable)]`:
//!
//! ```rust,ignore
//! #[derive(Dispatchable)]
//! enum Shape {
//!     Circle(Circle),
//!     Square(Square),
//! }
//!
//! assert_eq!(Shape::Circle(c).kind(), ShapeKind::Circle);
//! ```

use std::{fmt::Debug, hash::Hash};

/// A value usable as a dispatch key.
pub trait DispatchKey: Hash + Eq + Clone + Debug + Send + Sync + 'static {}

impl<T> DispatchKey for T where T: Hash + Eq + Clone + Debug + Send + Sync + 'static {}

/// A value that knows its own variant tag.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be dispatched on by kind",
    label = "missing `Dispatchable` implementation",
    note = "Derive it with `#[derive(Dispatchable)]` on an enum, or implement `kind` by hand."
)]
pub trait Dispatchable {
    /// The tag type, one value per participating variant.
    type Kind: DispatchKey;

    /// The tag of this value.
    fn kind(&self) -> Self::Kind;
}

impl<T: Dispatchable + ?Sized> Dispatchable for &T {
    type Kind = T::Kind;

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}

impl<T: Dispatchable + ?Sized> Dispatchable for Box<T> {
    type Kind = T::Kind;

    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }
}

// Argument lists dispatch on their first element.
macro_rules! impl_dispatchable_for_args {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Dispatchable $(, $rest)*> Dispatchable for ($first, $($rest,)*) {
            type Kind = $first::Kind;

            fn kind(&self) -> Self::Kind {
                self.0.kind()
            }
        }
    };
}

impl_dispatchable_for_args!(T0);
impl_dispatchable_for_args!(T0, T1);
impl_dispatchable_for_args!(T0, T1, T2);
impl_dispatchable_for_args!(T0, T1, T2, T3);

/// A closed set of kinds, known in full at compile time.
pub trait VariantSet: Sized + 'static {
    /// Every member of the set, in declaration order.
    const ALL: &'static [Self];
}

/// The payload of one variant of a dispatchable enum.
///
/// Lets a handler be written against the payload type directly instead of
/// matching on the whole enum.
pub trait Variant<E: Dispatchable>: Sized {
    /// The tag of the variant carrying `Self`.
    const KIND: E::Kind;

    /// Borrow the payload if `value` is this variant.
    fn project(value: &E) -> Option<&Self>;
}
