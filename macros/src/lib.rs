//! Procedural macros for tola-listdiff
//!
//! Provides `#[derive(Diffable)]`, which implements the identity contract
//! from a field marked `#[diff(key)]`.

use proc_macro::TokenStream;

mod diffable;

/// Derive `Diffable` from the field marked `#[diff(key)]`.
///
/// # Usage
///
/// ```ignore
/// #[derive(PartialEq, Diffable)]
/// struct Contact {
///     #[diff(key)]
///     id: u64,
///     name: String,
/// }
///
/// // Tuple structs work too
/// #[derive(PartialEq, Diffable)]
/// struct Tagged(#[diff(key)] String, u32);
/// ```
///
/// The key field's type becomes `Diffable::Key` and must be
/// `Clone + Hash + Eq`. `PartialEq` is not derived: equality decides what
/// counts as an update, so it stays under the caller's control.
///
/// # Errors
///
/// - no field, or more than one field, marked `#[diff(key)]`
/// - applied to an enum or union
#[proc_macro_derive(Diffable, attributes(diff))]
pub fn derive_diffable(item: TokenStream) -> TokenStream {
    diffable::expand(item.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
