use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DataEnum, DeriveInput, Field, Fields, FieldsNamed, parse_macro_input};

use crate::support::serde_attrs::{self, SerdeContainer};
use crate::support::{attrs, diag, utils};

const CONTAINER_FLAGS: &[&str] = &[
    "rules",
    "context_rules",
    "value_rules",
    "normalize",
    "context_normalize",
];
const FIELD_FLAGS: &[&str] = &["skip", "skip_docs", "no_rules"];

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(input) {
        Ok(ts) => ts,
        Err(e) => diag::to_compile_error(e),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    utils::require_no_generics(&input)?;

    let args = attrs::parse_attrs(&input.attrs, "inspect")?;
    args.ensure_flags(CONTAINER_FLAGS, "container")?;
    if let Some(flag) = args.conflict(&["rules", "context_rules", "value_rules"]) {
        return Err(diag::error_spanned(
            flag,
            "declare at most one of `rules`, `context_rules` and `value_rules`",
        ));
    }
    if let Some(flag) = args.conflict(&["normalize", "context_normalize"]) {
        return Err(diag::error_spanned(
            flag,
            "declare at most one of `normalize` and `context_normalize`",
        ));
    }

    let serde = serde_attrs::parse_container(&input.attrs)?;
    let hooks = Hooks::from_args(&args);

    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_struct(&input, &hooks, &serde, fields)?,
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                expand_newtype(&input, &hooks, &fields.unnamed[0])?
            }
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Inspect can be derived for structs with named fields, \
                     single-field tuple structs and unit-only enums",
                ));
            }
        },
        Data::Enum(data) => expand_enum(&input, &hooks, &serde, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.ident.span(),
                "Inspect cannot be derived for unions",
            ));
        }
    };

    Ok(expanded.into())
}

// ============================================================================
// CONTAINER HOOKS
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Declarator {
    None,
    Rules,
    ContextRules,
    ValueRules,
}

struct Hooks {
    declarator: Declarator,
    normalize: TokenStream2,
}

impl Hooks {
    fn from_args(args: &attrs::AttrArgs) -> Self {
        let declarator = if args.has_flag("rules") {
            Declarator::Rules
        } else if args.has_flag("context_rules") {
            Declarator::ContextRules
        } else if args.has_flag("value_rules") {
            Declarator::ValueRules
        } else {
            Declarator::None
        };

        let normalize = if args.has_flag("normalize") {
            quote!(<Self as ::apivalid::Normalize>::normalize(self);)
        } else if args.has_flag("context_normalize") {
            quote!(<Self as ::apivalid::ContextNormalize>::normalize(self, ctx);)
        } else {
            quote!()
        };

        Self {
            declarator,
            normalize,
        }
    }

    /// `describe` body decoration for value-level types.
    fn value_schema(&self, schema: TokenStream2) -> TokenStream2 {
        if self.declarator == Declarator::ValueRules {
            quote! {
                ::apivalid::schema::describe_value_rules(
                    #schema,
                    &<Self as ::apivalid::ValueRules>::value_rules(),
                )
            }
        } else {
            quote!(::core::result::Result::Ok(#schema))
        }
    }
}

// ============================================================================
// STRUCTS WITH NAMED FIELDS
// ============================================================================

fn expand_struct(
    input: &DeriveInput,
    hooks: &Hooks,
    serde: &SerdeContainer,
    fields: &FieldsNamed,
) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let name_str = name.to_string();

    let mut metas = Vec::new();
    let mut field_refs = Vec::new();
    let mut schema_arms = Vec::new();
    let mut normalize_children = Vec::new();
    let mut string_children = Vec::new();

    for field in &fields.named {
        let ident = utils::field_ident(field)?;
        let ident_str = ident.to_string();
        let ty = &field.ty;

        let args = attrs::parse_attrs(&field.attrs, "inspect")?;
        args.ensure_flags(FIELD_FLAGS, "field")?;
        let field_serde = serde_attrs::parse_field(&field.attrs)?;

        let skip = args.has_flag("skip");
        if skip && field_serde.flatten {
            return Err(diag::error_spanned(
                ident,
                "a flattened field cannot be `#[inspect(skip)]`",
            ));
        }

        let key = field_serde.field_key(ident, serde);
        let skip_serializing = field_serde.skip_serializing;
        let skip_docs = args.has_flag("skip_docs");
        let no_rules = args.has_flag("no_rules");
        let inspectable = !skip;
        let flatten = if field_serde.flatten {
            quote! {
                ::core::option::Option::Some(::apivalid::Flatten {
                    meta: <#ty as ::apivalid::Structure>::meta,
                    declared: <#ty as ::apivalid::Structure>::declared,
                })
            }
        } else {
            quote!(::core::option::Option::None)
        };

        metas.push(quote! {
            ::apivalid::FieldMeta {
                ident: #ident_str,
                key: #key,
                skip_serializing: #skip_serializing,
                skip_docs: #skip_docs,
                no_rules: #no_rules,
                inspectable: #inspectable,
                flatten: #flatten,
            }
        });

        if skip {
            continue;
        }

        field_refs.push(quote! {
            #ident_str => ::core::option::Option::Some(&self.#ident as &dyn ::apivalid::Inspect),
        });
        normalize_children.push(quote! {
            ::apivalid::Inspect::normalize_tree(&mut self.#ident, ctx);
        });
        string_children.push(quote! {
            ::apivalid::Inspect::for_each_string(&mut self.#ident, f);
        });
        schema_arms.push(if field_serde.flatten {
            quote! {
                #ident_str => ::apivalid::schema::properties_of::<#ty>(
                    generator,
                    this.map(|this| &this.#ident),
                ),
            }
        } else {
            quote! {
                #ident_str => match this {
                    ::core::option::Option::Some(this) => {
                        ::apivalid::Inspect::instance_schema(&this.#ident, generator)
                    }
                    ::core::option::Option::None => {
                        <#ty as ::apivalid::Inspect>::describe(generator)
                    }
                },
            }
        });
    }

    let declared = match hooks.declarator {
        Declarator::Rules => quote! {
            ::core::option::Option::Some(::apivalid::Declared::new(
                &__META,
                <Self as ::apivalid::RuleSet>::rules(),
            ))
        },
        Declarator::ContextRules => quote! {
            ::core::option::Option::Some(::apivalid::Declared::new(
                &__META,
                <Self as ::apivalid::ContextRuleSet>::rules(ctx),
            ))
        },
        Declarator::None => quote!(::core::option::Option::None),
        Declarator::ValueRules => {
            return Err(syn::Error::new(
                name.span(),
                "`value_rules` applies to newtypes and unit enums; \
                 structs with named fields use `rules` or `context_rules`",
            ));
        }
    };
    let has_rules = hooks.declarator != Declarator::None;
    let normalize = &hooks.normalize;

    Ok(quote! {
        const _: () = {
            static __META: ::apivalid::ContainerMeta = ::apivalid::ContainerMeta {
                name: #name_str,
                fields: &[#(#metas),*],
            };

            #[automatically_derived]
            impl ::apivalid::Inspect for #name {
                fn value(&self) -> ::apivalid::Value<'_> {
                    ::apivalid::Value::Struct
                }

                fn shape(&self) -> ::apivalid::Shape<'_> {
                    ::apivalid::Shape::Container(self)
                }

                #[allow(unused_variables)]
                fn normalize_tree(&mut self, ctx: &::apivalid::Context) {
                    #normalize
                    #(#normalize_children)*
                }

                #[allow(unused_variables)]
                fn for_each_string(&mut self, f: &mut dyn ::core::ops::FnMut(&mut ::std::string::String)) {
                    #(#string_children)*
                }

                fn instance_schema(
                    &self,
                    generator: &::apivalid::SchemaGenerator,
                ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                    ::apivalid::schema::describe_struct::<Self>(generator, ::core::option::Option::Some(self))
                }

                fn describe(
                    generator: &::apivalid::SchemaGenerator,
                ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                    ::apivalid::schema::describe_struct::<Self>(generator, ::core::option::Option::None)
                }

                fn has_rules() -> bool {
                    #has_rules
                }
            }

            #[automatically_derived]
            impl ::apivalid::Structure for #name {
                fn meta() -> &'static ::apivalid::ContainerMeta {
                    &__META
                }

                #[allow(unused_variables)]
                fn declared(ctx: &::apivalid::Context) -> ::core::option::Option<::apivalid::Declared> {
                    #declared
                }

                fn field_ref(&self, ident: &str) -> ::core::option::Option<&dyn ::apivalid::Inspect> {
                    match ident {
                        #(#field_refs)*
                        _ => ::core::option::Option::None,
                    }
                }

                #[allow(unused_variables)]
                fn field_schema(
                    generator: &::apivalid::SchemaGenerator,
                    this: ::core::option::Option<&Self>,
                    ident: &str,
                ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                    match ident {
                        #(#schema_arms)*
                        _ => ::core::result::Result::Ok(::apivalid::Schema::any()),
                    }
                }
            }
        };
    })
}

// ============================================================================
// NEWTYPES
// ============================================================================

fn expand_newtype(input: &DeriveInput, hooks: &Hooks, field: &Field) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let inner = &field.ty;

    if matches!(hooks.declarator, Declarator::Rules | Declarator::ContextRules) {
        return Err(syn::Error::new(
            name.span(),
            "field bindings need named fields; use `#[inspect(value_rules)]` on newtypes",
        ));
    }

    let shape = if hooks.declarator == Declarator::ValueRules {
        quote!(::apivalid::Shape::Value(<Self as ::apivalid::ValueRules>::value_rules()))
    } else {
        quote!(::apivalid::Inspect::shape(&self.0))
    };
    let has_rules = if hooks.declarator == Declarator::ValueRules {
        quote!(true)
    } else {
        quote!(<#inner as ::apivalid::Inspect>::has_rules())
    };
    let type_schema = hooks.value_schema(quote!(<#inner as ::apivalid::Inspect>::describe(generator)?));
    let instance_schema =
        hooks.value_schema(quote!(::apivalid::Inspect::instance_schema(&self.0, generator)?));
    let normalize = &hooks.normalize;

    Ok(quote! {
        #[automatically_derived]
        impl ::apivalid::Inspect for #name {
            fn value(&self) -> ::apivalid::Value<'_> {
                ::apivalid::Inspect::value(&self.0)
            }

            fn shape(&self) -> ::apivalid::Shape<'_> {
                #shape
            }

            fn normalize_tree(&mut self, ctx: &::apivalid::Context) {
                #normalize
                ::apivalid::Inspect::normalize_tree(&mut self.0, ctx);
            }

            fn for_each_string(&mut self, f: &mut dyn ::core::ops::FnMut(&mut ::std::string::String)) {
                ::apivalid::Inspect::for_each_string(&mut self.0, f);
            }

            fn instance_schema(
                &self,
                generator: &::apivalid::SchemaGenerator,
            ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                #instance_schema
            }

            fn describe(
                generator: &::apivalid::SchemaGenerator,
            ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                #type_schema
            }

            fn has_rules() -> bool {
                #has_rules
            }
        }
    })
}

// ============================================================================
// UNIT ENUMS
// ============================================================================

fn expand_enum(
    input: &DeriveInput,
    hooks: &Hooks,
    serde: &SerdeContainer,
    data: &DataEnum,
) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if matches!(hooks.declarator, Declarator::Rules | Declarator::ContextRules) {
        return Err(syn::Error::new(
            name.span(),
            "field bindings need named fields; use `#[inspect(value_rules)]` on enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            name.span(),
            "Inspect cannot be derived for enums without variants",
        ));
    }

    let mut arms = Vec::new();
    let mut documented = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(diag::error_spanned(
                variant,
                "Inspect can only be derived for enums whose variants carry no data",
            ));
        }
        let ident = &variant.ident;
        let variant_serde = serde_attrs::parse_field(&variant.attrs)?;
        let key = variant_serde.variant_key(ident, serde);

        arms.push(quote! {
            Self::#ident => ::apivalid::Value::Str(::std::borrow::Cow::Borrowed(#key)),
        });
        if !variant_serde.skip_serializing {
            documented.push(key);
        }
    }

    let shape = if hooks.declarator == Declarator::ValueRules {
        quote!(::apivalid::Shape::Value(<Self as ::apivalid::ValueRules>::value_rules()))
    } else {
        quote!(::apivalid::Shape::Opaque)
    };
    let has_rules = hooks.declarator == Declarator::ValueRules;
    let type_schema = hooks.value_schema(quote! {{
        let mut schema = ::apivalid::Schema::string();
        schema.enum_values = ::std::vec![#(::apivalid::__private::serde_json::Value::from(#documented)),*];
        schema
    }});
    let normalize = &hooks.normalize;

    Ok(quote! {
        #[automatically_derived]
        impl ::apivalid::Inspect for #name {
            fn value(&self) -> ::apivalid::Value<'_> {
                match self {
                    #(#arms)*
                }
            }

            fn shape(&self) -> ::apivalid::Shape<'_> {
                #shape
            }

            #[allow(unused_variables)]
            fn normalize_tree(&mut self, ctx: &::apivalid::Context) {
                #normalize
            }

            fn instance_schema(
                &self,
                generator: &::apivalid::SchemaGenerator,
            ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                <Self as ::apivalid::Inspect>::describe(generator)
            }

            #[allow(unused_variables)]
            fn describe(
                generator: &::apivalid::SchemaGenerator,
            ) -> ::core::result::Result<::apivalid::Schema, ::apivalid::SchemaError> {
                #type_schema
            }

            fn has_rules() -> bool {
                #has_rules
            }
        }
    })
}
