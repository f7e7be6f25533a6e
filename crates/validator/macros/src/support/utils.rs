use syn::spanned::Spanned;
use syn::{DeriveInput, Field, Ident};

/// Rejects generic parameters: the field table is a `static`.
pub fn require_no_generics(input: &DeriveInput) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        return Ok(());
    }
    Err(syn::Error::new(
        input.generics.span(),
        "Inspect cannot be derived for generic types",
    ))
}

/// The identifier of a named field.
pub fn field_ident(field: &Field) -> syn::Result<&Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))
}
