//! The part of `#[serde(...)]` that decides how a field or variant is
//! serialized. Everything else serde accepts is parsed and ignored.

use syn::{Attribute, Ident, LitStr, Result, Token, meta::ParseNestedMeta};

use crate::support::diag;

/// serde's `rename_all` conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(diag::error_spanned(
                    lit,
                    format!("unknown rename rule `{other}`"),
                ));
            }
        })
    }

    /// Applies the convention to a snake_case field name, the way serde does.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            Self::Camel => lower_first(&Self::Pascal.apply_to_field(field)),
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Applies the convention to a PascalCase variant name, the way serde
    /// does: every uppercase letter starts a word.
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::Pascal => variant.to_owned(),
            Self::Lower => variant.to_ascii_lowercase(),
            Self::Upper => variant.to_ascii_uppercase(),
            Self::Camel => lower_first(variant),
            Self::Snake => {
                let mut snake = String::with_capacity(variant.len() + 4);
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            Self::ScreamingSnake => Self::Snake.apply_to_variant(variant).to_ascii_uppercase(),
            Self::Kebab => Self::Snake.apply_to_variant(variant).replace('_', "-"),
            Self::ScreamingKebab => Self::ScreamingSnake.apply_to_variant(variant).replace('_', "-"),
        }
    }
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Container-level serde settings.
#[derive(Debug, Default)]
pub struct SerdeContainer {
    pub rename_all: Option<RenameRule>,
}

/// Field- or variant-level serde settings.
#[derive(Debug, Default)]
pub struct SerdeField {
    pub rename: Option<String>,
    /// `skip` or `skip_serializing`.
    pub skip_serializing: bool,
    pub flatten: bool,
}

impl SerdeField {
    /// The serialized name of the field `ident` under `container`'s
    /// conventions.
    pub fn field_key(&self, ident: &Ident, container: &SerdeContainer) -> String {
        self.key(ident, container, RenameRule::apply_to_field)
    }

    /// The serialized name of the variant `ident` under `container`'s
    /// conventions.
    pub fn variant_key(&self, ident: &Ident, container: &SerdeContainer) -> String {
        self.key(ident, container, RenameRule::apply_to_variant)
    }

    fn key(
        &self,
        ident: &Ident,
        container: &SerdeContainer,
        apply: fn(RenameRule, &str) -> String,
    ) -> String {
        if let Some(rename) = &self.rename {
            return rename.clone();
        }
        let name = unraw(ident);
        match container.rename_all {
            Some(rule) => apply(rule, &name),
            None => name,
        }
    }
}

/// The identifier without a raw `r#` prefix.
pub fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_owned(),
        None => name,
    }
}

pub fn parse_container(attrs: &[Attribute]) -> Result<SerdeContainer> {
    let mut out = SerdeContainer::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if let Some(lit) = serialize_name(&meta)? {
                    out.rename_all = Some(RenameRule::parse(&lit)?);
                }
                return Ok(());
            }
            ignore(&meta)
        })?;
    }
    Ok(out)
}

pub fn parse_field(attrs: &[Attribute]) -> Result<SerdeField> {
    let mut out = SerdeField::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if let Some(lit) = serialize_name(&meta)? {
                    out.rename = Some(lit.value());
                }
                return Ok(());
            }
            if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                out.skip_serializing = true;
                return Ok(());
            }
            if meta.path.is_ident("flatten") {
                out.flatten = true;
                return Ok(());
            }
            ignore(&meta)
        })?;
    }
    Ok(out)
}

/// `key = "x"` or `key(serialize = "x", deserialize = "y")`.
fn serialize_name(meta: &ParseNestedMeta<'_>) -> Result<Option<LitStr>> {
    if meta.input.peek(Token![=]) {
        return meta.value()?.parse().map(Some);
    }
    let mut found = None;
    meta.parse_nested_meta(|inner| {
        let lit: LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("serialize") {
            found = Some(lit);
        }
        Ok(())
    })?;
    Ok(found)
}

/// Consumes a serde item this derive does not care about.
fn ignore(meta: &ParseNestedMeta<'_>) -> Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}
