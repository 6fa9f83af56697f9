//! Impl-generation macros
//!
//! These macros eliminate repetitive impls and match arms.
//! Accessor macros use `paste` internally for identifier concatenation.

/// Implement `Diffable` for types that are their own identity.
///
/// The key is a clone of the value, so two equal values are always the same
/// element and can never produce an `Update`.
#[macro_export]
macro_rules! impl_diffable_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Diffable for $ty {
                type Key = $ty;

                #[inline]
                fn diff_key(&self) -> $ty {
                    ::core::clone::Clone::clone(self)
                }
            }
        )*
    };
}

/// Generate `is_xxx` checks for unit-like use of struct variants.
///
/// # Generated methods per variant:
/// - `is_xxx(&self) -> bool` - variant check
///
/// # Example
/// ```ignore
/// impl<T> EditStep<'_, T> {
///     impl_variant_checks!(Insert, Delete, Move, Update);
/// }
/// ```
#[macro_export]
macro_rules! impl_variant_checks {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a `" $variant "` step"]
                #[inline]
                pub fn [<is_ $variant:snake>](&self) -> bool {
                    matches!(self, Self::$variant { .. })
                }
            )*
        }
    };
}

/// Generate a method that reads a field shared by every variant.
///
/// # Example
/// ```ignore
/// impl_variant_field_get!(value, &'a T, Insert, Delete, Move, Update);
/// // Expands to: pub fn value(&self) -> &'a T { match self { Self::Insert { value, .. } => *value, ... } }
/// ```
#[macro_export]
macro_rules! impl_variant_field_get {
    ($field:ident, $ret:ty, $($variant:ident),* $(,)?) => {
        #[doc = concat!("Get `", stringify!($field), "` from any variant")]
        #[inline]
        pub fn $field(&self) -> $ret {
            match self {
                $(Self::$variant { $field, .. } => *$field,)*
            }
        }
    };
}
