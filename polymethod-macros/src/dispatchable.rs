//! `#[derive(Dispatchable)]`.
//!
//! For an enum `Shape` this generates:
//! - a `ShapeKind` tag enum with one unit variant per variant of `Shape`
//! - `impl VariantSet for ShapeKind`
//! - `impl Dispatchable for Shape`
//! - `impl Variant<Shape> for P` for every single-field tuple variant whose
//!   payload type `P` is carried by no other variant
//!
//! Payload types are compared by their last path segment, so `String` and
//! `std::string::String` collide and neither projects. A type alias is not
//! seen through; mark such a variant `#[dispatch(skip)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
    parse_macro_input,
};

/// Arguments of the `#[dispatch(...)]` attribute.
#[derive(Default)]
struct DispatchArgs {
    kind: Option<Ident>,
}

impl DispatchArgs {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = DispatchArgs::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("dispatch")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("kind") {
                    let lit: LitStr = meta.value()?.parse()?;
                    args.kind = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error(format!(
                        "unknown dispatch attribute: {}",
                        meta.path.to_token_stream()
                    )))
                }
            })?;
        }

        Ok(args)
    }
}

/// Whether a variant carries `#[dispatch(skip)]`.
fn is_skipped(variant: &syn::Variant) -> syn::Result<bool> {
    let mut skip = false;

    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("dispatch")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error(format!(
                    "unknown dispatch variant attribute: {}",
                    meta.path.to_token_stream()
                )))
            }
        })?;
    }

    Ok(skip)
}

/// Implementation of `#[derive(Dispatchable)]`.
pub fn derive_dispatchable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Dispatchable` can only be derived for enums",
        ));
    };

    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Dispatchable` needs at least one variant to dispatch on",
        ));
    }

    let args = DispatchArgs::from_attrs(&input.attrs)?;
    let name = &input.ident;
    let vis = &input.vis;
    let kind_name = args.kind.unwrap_or_else(|| format_ident!("{}Kind", name));
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let variants: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();
    let variant_names: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
    let variant_docs = variant_names
        .iter()
        .map(|v| format!("Tag of `{name}::{v}`."));
    let kind_doc = format!("Variant tags of [`{name}`].");

    let projections = if input.generics.type_params().next().is_none() {
        projections(input, &data.variants, &kind_name)?
    } else {
        // A payload naming a type parameter would be an orphan impl.
        Vec::new()
    };

    Ok(quote! {
        #[doc = #kind_doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #vis enum #kind_name {
            #(
                #[doc = #variant_docs]
                #variants,
            )*
        }

        impl #kind_name {
            /// The name of the variant this tag stands for.
            pub const fn name(self) -> &'static str {
                match self {
                    #( #kind_name::#variants => #variant_names, )*
                }
            }
        }

        impl ::polymethod::VariantSet for #kind_name {
            const ALL: &'static [Self] = &[ #( #kind_name::#variants, )* ];
        }

        impl #impl_generics ::polymethod::Dispatchable for #name #ty_generics #where_clause {
            type Kind = #kind_name;

            fn kind(&self) -> #kind_name {
                match self {
                    #( Self::#variants { .. } => #kind_name::#variants, )*
                }
            }
        }

        #(#projections)*
    })
}

fn projections(
    input: &DeriveInput,
    variants: &syn::punctuated::Punctuated<syn::Variant, syn::token::Comma>,
    kind_name: &Ident,
) -> syn::Result<Vec<TokenStream2>> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut payloads: Vec<(&Ident, &Type)> = Vec::new();
    for v in variants {
        if is_skipped(v)? {
            continue;
        }
        match &v.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                payloads.extend(fields.unnamed.first().map(|f| (&v.ident, &f.ty)));
            }
            _ => {}
        }
    }

    Ok(payloads
        .iter()
        .filter(|(_, ty)| {
            payloads
                .iter()
                .filter(|(_, other)| type_key(other) == type_key(ty))
                .count()
                == 1
        })
        .map(|(variant, ty)| {
            quote! {
                impl #impl_generics ::polymethod::Variant<#name #ty_generics> for #ty
                #where_clause
                {
                    const KIND: #kind_name = #kind_name::#variant;

                    fn project(value: &#name #ty_generics) -> ::core::option::Option<&Self> {
                        match value {
                            #name::#variant(inner) => ::core::option::Option::Some(inner),
                            #[allow(unreachable_patterns)]
                            _ => ::core::option::Option::None,
                        }
                    }
                }
            }
        })
        .collect())
}

/// A spelling-independent rendering of `ty`: every path is cut down to its
/// last segment, recursively through generic arguments.
fn type_key(ty: &Type) -> String {
    match ty {
        Type::Path(p) if p.qself.is_none() => match p.path.segments.last() {
            Some(segment) => match &segment.arguments {
                PathArguments::AngleBracketed(args) => {
                    let args: Vec<String> = args
                        .args
                        .iter()
                        .map(|arg| match arg {
                            GenericArgument::Type(ty) => type_key(ty),
                            other => other.to_token_stream().to_string(),
                        })
                        .collect();
                    format!("{}<{}>", segment.ident, args.join(","))
                }
                other => format!("{}{}", segment.ident, other.to_token_stream()),
            },
            None => ty.to_token_stream().to_string(),
        },
        Type::Reference(r) => {
            let mutability = if r.mutability.is_some() { "mut " } else { "" };
            format!("&{mutability}{}", type_key(&r.elem))
        }
        Type::Paren(p) => type_key(&p.elem),
        Type::Group(g) => type_key(&g.elem),
        Type::Tuple(t) => {
            let elems: Vec<String> = t.elems.iter().map(type_key).collect();
            format!("({})", elems.join(","))
        }
        Type::Slice(s) => format!("[{}]", type_key(&s.elem)),
        Type::Array(a) => format!("[{};{}]", type_key(&a.elem), a.len.to_token_stream()),
        _ => ty.to_token_stream().to_string(),
    }
}
