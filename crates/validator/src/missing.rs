//! Rule coverage check.
//!
//! Meant for tests: assert that every serialized field of a request type is
//! either bound to rules or explicitly marked as intentionally unbound.
//!
//! ```rust,ignore
//! #[test]
//! fn every_field_has_rules() {
//!     assert_eq!(apivalid::missing_rules::<Signup>(&[]).unwrap(), Vec::<String>::new());
//! }
//! ```

use std::collections::HashSet;

use crate::context::Context;
use crate::error::BindingError;
use crate::expand::expand;
use crate::inspect::{ContainerMeta, Structure};

/// Serialized names of the fields of `T` that no declared binding covers.
///
/// Fields excluded from serialization or documentation, fields marked
/// `#[inspect(no_rules)]` or `#[inspect(skip)]`, and fields named in
/// `exclude` (by serialized name or Rust identifier) are not reported.
/// Flattened structs contribute their own fields. A type without a rule
/// declarator yields an empty list.
pub fn missing_rules<T: Structure>(exclude: &[&str]) -> Result<Vec<String>, BindingError> {
    missing_rules_with_context::<T>(exclude, &Context::new())
}

/// [`missing_rules`] for types whose declarator reads a [`Context`].
#[tracing::instrument(level = "debug", skip_all, fields(ty = T::meta().name))]
pub fn missing_rules_with_context<T: Structure>(
    exclude: &[&str],
    ctx: &Context,
) -> Result<Vec<String>, BindingError> {
    let Some(declared) = T::declared(ctx) else {
        return Ok(Vec::new());
    };

    let covered: HashSet<&'static str> = expand(declared, ctx)?
        .iter()
        .map(|binding| binding.key())
        .collect();

    let mut missing = Vec::new();
    collect_uncovered(T::meta(), exclude, &covered, &mut missing);
    Ok(missing)
}

fn collect_uncovered(
    meta: &'static ContainerMeta,
    exclude: &[&str],
    covered: &HashSet<&'static str>,
    missing: &mut Vec<String>,
) {
    for field in meta.fields {
        if let Some(flatten) = field.flatten {
            collect_uncovered((flatten.meta)(), exclude, covered, missing);
            continue;
        }
        if field.skip_serializing || field.skip_docs || field.no_rules || !field.inspectable {
            continue;
        }
        if exclude.contains(&field.key) || exclude.contains(&field.ident) {
            continue;
        }
        if !covered.contains(field.key) {
            missing.push(field.key.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::FieldRules;
    use crate::error::SchemaError;
    use crate::inspect::{Declared, FieldMeta, Inspect, Shape};
    use crate::rules::required;
    use crate::schema::{Schema, SchemaGenerator};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    const fn plain(ident: &'static str, key: &'static str) -> FieldMeta {
        FieldMeta {
            ident,
            key,
            skip_serializing: false,
            skip_docs: false,
            no_rules: false,
            inspectable: true,
            flatten: None,
        }
    }

    static PERSON: ContainerMeta = ContainerMeta {
        name: "Person",
        fields: &[
            plain("name", "Name"),
            plain("email", "Email"),
            plain("age", "Age"),
            FieldMeta {
                skip_serializing: true,
                ..plain("secret", "secret")
            },
            FieldMeta {
                no_rules: true,
                ..plain("note", "Note")
            },
        ],
    };

    struct Person;

    impl Inspect for Person {
        fn value(&self) -> Value<'_> {
            Value::Struct
        }

        fn shape(&self) -> Shape<'_> {
            Shape::Container(self)
        }

        fn instance_schema(&self, _: &SchemaGenerator) -> Result<Schema, SchemaError> {
            Ok(Schema::object())
        }

        fn describe(_: &SchemaGenerator) -> Result<Schema, SchemaError> {
            Ok(Schema::object())
        }
    }

    impl Structure for Person {
        fn meta() -> &'static ContainerMeta {
            &PERSON
        }

        fn declared(_ctx: &Context) -> Option<Declared> {
            Some(Declared::new(&PERSON, vec![FieldRules::new("name").rule(required())]))
        }

        fn field_ref(&self, _ident: &str) -> Option<&dyn Inspect> {
            None
        }

        fn field_schema(
            _: &SchemaGenerator,
            _: Option<&Self>,
            _: &str,
        ) -> Result<Schema, SchemaError> {
            Ok(Schema::any())
        }
    }

    #[test]
    fn test_reports_unbound_fields_in_declaration_order() {
        assert_eq!(missing_rules::<Person>(&[]).unwrap(), vec!["Email", "Age"]);
    }

    #[test]
    fn test_exclusions_by_key_or_ident() {
        assert_eq!(missing_rules::<Person>(&["Age"]).unwrap(), vec!["Email"]);
        assert_eq!(missing_rules::<Person>(&["email", "age"]).unwrap(), Vec::<String>::new());
    }
}
