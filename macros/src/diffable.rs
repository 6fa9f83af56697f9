//! `#[derive(Diffable)]` implementation

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{parse2, Data, DeriveInput, Field, Fields, Index, Member, Result};

pub fn expand(item: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(item)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Diffable can only be derived for structs",
            ))
        }
    };

    let (member, field) = key_field(fields, &input)?;
    let key_ty = &field.ty;

    Ok(quote! {
        impl #impl_generics ::tola_listdiff::Diffable for #name #ty_generics #where_clause {
            type Key = #key_ty;

            #[inline]
            fn diff_key(&self) -> Self::Key {
                ::core::clone::Clone::clone(&self.#member)
            }
        }
    })
}

/// Find the single field carrying `#[diff(key)]`.
fn key_field<'a>(fields: &'a Fields, input: &DeriveInput) -> Result<(Member, &'a Field)> {
    let mut found: Option<(Member, &Field)> = None;

    for (i, field) in fields.iter().enumerate() {
        if !is_key(field)? {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                field.to_token_stream(),
                "only one field may be marked #[diff(key)]",
            ));
        }
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(i)),
        };
        found = Some((member, field));
    }

    found.ok_or_else(|| {
        syn::Error::new_spanned(&input.ident, "mark the identity field with #[diff(key)]")
    })
}

fn is_key(field: &Field) -> Result<bool> {
    let mut key = false;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("diff")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                key = true;
                Ok(())
            } else {
                Err(meta.error("expected `key`"))
            }
        })?;
    }
    Ok(key)
}
