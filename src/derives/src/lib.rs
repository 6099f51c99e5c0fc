use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Lit, Meta, NestedMeta};

/// Implements `Named` for a resource record.
///
/// Names default to the lowercased type name and that name plus "s".
/// Irregular names are set with `#[named(singular = "...", plural = "...")]`.
#[proc_macro_derive(Named, attributes(named))]
pub fn derive_named(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, attrs, .. } = parse_macro_input!(input);
    let mut singular = ident.to_string().to_lowercase();
    let mut plural = None;
    for attr in attrs.iter().filter(|a| a.path.is_ident("named")) {
        let Ok(Meta::List(list)) = attr.parse_meta() else {
            continue;
        };
        for nested in list.nested {
            if let NestedMeta::Meta(Meta::NameValue(nv)) = nested {
                if let Lit::Str(s) = nv.lit {
                    if nv.path.is_ident("singular") {
                        singular = s.value();
                    } else if nv.path.is_ident("plural") {
                        plural = Some(s.value());
                    }
                }
            }
        }
    }
    let plural = plural.unwrap_or_else(|| singular.clone() + "s");
    quote! {
        impl crate::traits::Named for #ident {
            const NAME_SINGULAR: &'static str = #singular;
            const NAME_PLURAL: &'static str = #plural;
        }
    }
    .into()
}
