use proc_macro::TokenStream;

mod dispatchable;

/// Derive macro for implementing `Dispatchable` on an enum.
///
/// Generates a `<Enum>Kind` tag enum (rename it with
/// `#[dispatch(kind = "Name")]`), its `VariantSet`, and a `Variant`
/// projection for every single-field tuple variant with a unique payload type.
/// Mark a variant `#[dispatch(skip)]` to leave its payload type out of the
/// uniqueness check.
///
/// ```rust,ignore
/// #[derive(Dispatchable)]
/// enum Shape {
///     Circle(Circle),
///     Square(Square),
///     Blancmange,
/// }
///
/// assert_eq!(ShapeKind::ALL.len(), 3);
/// ```
#[proc_macro_derive(Dispatchable, attributes(dispatch))]
pub fn derive_dispatchable(input: TokenStream) -> TokenStream {
    dispatchable::derive_dispatchable_impl(input)
}
