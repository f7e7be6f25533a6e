//! The capability traits every traversal dispatches on.
//!
//! [`Inspect`] is the single entry point: validation asks a value for its
//! [`Shape`], normalization calls [`Inspect::normalize_tree`], schema
//! synthesis calls [`Inspect::describe`]. Implementations for structs,
//! newtypes and unit enums are generated by `#[derive(Inspect)]`; the
//! standard containers and scalars are implemented in this crate.
//!
//! The declarator traits ([`RuleSet`], [`ContextRuleSet`], [`ValueRules`],
//! [`Normalize`], [`ContextNormalize`]) are implemented by hand and wired in
//! with container attributes:
//!
//! ```rust,ignore
//! #[derive(Deserialize, Inspect)]
//! #[inspect(rules, normalize)]
//! struct Signup {
//!     email: String,
//! }
//!
//! impl RuleSet for Signup {
//!     fn rules() -> Vec<FieldRules> {
//!         vec![field!(email, required(), length(3, 254))]
//!     }
//! }
//!
//! impl Normalize for Signup {
//!     fn normalize(&mut self) {
//!         self.email = self.email.trim().to_lowercase();
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::binding::FieldRules;
use crate::context::Context;
use crate::error::{SchemaError, ValidationError};
use crate::rule::Rule;
use crate::schema::{Schema, SchemaGenerator};
use crate::value::Value;

// ============================================================================
// INSPECT
// ============================================================================

/// A value the traversals can walk.
pub trait Inspect: Any + 'static {
    /// The dereferenced view handed to rules.
    fn value(&self) -> Value<'_>;

    /// The pointer layer this value is, if any. Typed rules look through
    /// these layers to reach the concrete field type.
    fn indirection(&self) -> Indirection<'_> {
        Indirection::Direct
    }

    /// How validation should treat this value.
    fn shape(&self) -> Shape<'_> {
        Shape::Opaque
    }

    /// Runs this value's normalization hook (if any), then its children's.
    fn normalize_tree(&mut self, _ctx: &Context) {}

    /// Calls `f` on every `String` reachable from this value.
    fn for_each_string(&mut self, _f: &mut dyn FnMut(&mut String)) {}

    /// Schema for this value, consulting the instance where the type alone
    /// is not enough (dynamically typed fields).
    fn instance_schema(&self, generator: &SchemaGenerator) -> Result<Schema, SchemaError>;

    /// Schema for this type.
    fn describe(generator: &SchemaGenerator) -> Result<Schema, SchemaError>
    where
        Self: Sized;

    /// True if instances of this type (or, for collections, their elements)
    /// carry rules, so a collection of them is worth walking.
    fn has_rules() -> bool
    where
        Self: Sized,
    {
        false
    }
}

impl dyn Inspect {
    /// Downcasts to a concrete inspected type.
    #[must_use]
    pub fn downcast_ref<T: Inspect>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Downcasts to `T`, looking through `Option` and `Box` layers.
    ///
    /// Returns `Ok(None)` when a `None` is reached before a `T`, and a
    /// `type` error when the innermost value is not a `T`.
    pub fn downcast_target<T: Inspect>(&self) -> Result<Option<&T>, ValidationError> {
        let mut current = self;
        loop {
            if let Some(found) = current.downcast_ref::<T>() {
                return Ok(Some(found));
            }
            match current.indirection() {
                Indirection::Direct => {
                    return Err(ValidationError::new(
                        "type",
                        format!("unexpected type, want {}", std::any::type_name::<T>()),
                    ));
                }
                Indirection::Inner(inner) => current = inner,
                Indirection::Absent => return Ok(None),
            }
        }
    }
}

impl fmt::Debug for dyn Inspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value(), f)
    }
}

/// One layer of `Option`/`Box` indirection, as seen by typed rules.
#[derive(Debug, Clone, Copy)]
pub enum Indirection<'a> {
    /// Not a pointer.
    Direct,
    /// A pointer to the next layer.
    Inner(&'a (dyn Inspect + 'static)),
    /// `None`.
    Absent,
}

// ============================================================================
// SHAPE
// ============================================================================

/// The closed set of ways validation can treat a value.
pub enum Shape<'a> {
    /// Nothing to validate (`None`).
    Absent,
    /// A struct; its declared bindings (if any) drive validation.
    Container(&'a dyn Container),
    /// A scalar carrying value-level rules.
    Value(Vec<Arc<dyn Rule>>),
    /// Elements to validate, keyed by index.
    Sequence(Vec<&'a dyn Inspect>),
    /// Entries to validate, keyed by the rendered map key.
    Mapping(Vec<(String, &'a dyn Inspect)>),
    /// No applicable rules.
    Opaque,
}

impl fmt::Debug for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Container(c) => f.debug_tuple("Container").field(&c.container_meta().name).finish(),
            Self::Value(rules) => f.debug_tuple("Value").field(rules).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(&items.len()).finish(),
            Self::Mapping(entries) => f.debug_tuple("Mapping").field(&entries.len()).finish(),
            Self::Opaque => f.write_str("Opaque"),
        }
    }
}

// ============================================================================
// CONTAINERS
// ============================================================================

/// Static description of a struct, generated by the derive.
#[derive(Debug)]
pub struct ContainerMeta {
    pub name: &'static str,
    pub fields: &'static [FieldMeta],
}

impl ContainerMeta {
    /// Looks a field up by its Rust identifier.
    #[must_use]
    pub fn field(&self, ident: &str) -> Option<&'static FieldMeta> {
        self.fields.iter().find(|f| f.ident == ident)
    }
}

/// One struct field as the traversals see it.
#[derive(Debug)]
pub struct FieldMeta {
    /// Rust identifier, as named by bindings.
    pub ident: &'static str,
    /// Serialized name: the error key and schema property name.
    pub key: &'static str,
    /// `#[serde(skip)]` / `#[serde(skip_serializing)]`.
    pub skip_serializing: bool,
    /// `#[inspect(skip_docs)]`: omitted from generated schemas.
    pub skip_docs: bool,
    /// `#[inspect(no_rules)]`: intentionally unbound.
    pub no_rules: bool,
    /// False for `#[inspect(skip)]` fields, which the traversals never visit.
    pub inspectable: bool,
    /// Set for `#[serde(flatten)]` fields.
    pub flatten: Option<Flatten>,
}

/// Type-level hooks of a flattened field's struct type.
#[derive(Debug, Clone, Copy)]
pub struct Flatten {
    pub meta: fn() -> &'static ContainerMeta,
    pub declared: fn(&Context) -> Option<Declared>,
}

/// A container's declared bindings together with its field table.
#[derive(Debug, Clone)]
pub struct Declared {
    pub meta: &'static ContainerMeta,
    pub rules: Vec<FieldRules>,
}

impl Declared {
    #[must_use]
    pub fn new(meta: &'static ContainerMeta, rules: Vec<FieldRules>) -> Self {
        Self { meta, rules }
    }
}

/// Struct-level hooks generated by `#[derive(Inspect)]`.
pub trait Structure: Inspect + Sized {
    /// The static field table.
    fn meta() -> &'static ContainerMeta;

    /// Declared bindings, or `None` if the type declares no rules.
    fn declared(ctx: &Context) -> Option<Declared>;

    /// Borrows a field by its Rust identifier.
    fn field_ref(&self, ident: &str) -> Option<&dyn Inspect>;

    /// Schema of one field. Flattened fields return their raw properties.
    fn field_schema(
        generator: &SchemaGenerator,
        this: Option<&Self>,
        ident: &str,
    ) -> Result<Schema, SchemaError>;
}

/// Object-safe view of a [`Structure`].
pub trait Container {
    fn container_meta(&self) -> &'static ContainerMeta;

    fn declared_rules(&self, ctx: &Context) -> Option<Declared>;

    fn field(&self, ident: &str) -> Option<&dyn Inspect>;

    /// The struct itself, for rules that read sibling fields.
    fn as_inspect(&self) -> &dyn Inspect;
}

impl<T: Structure> Container for T {
    fn container_meta(&self) -> &'static ContainerMeta {
        T::meta()
    }

    fn declared_rules(&self, ctx: &Context) -> Option<Declared> {
        T::declared(ctx)
    }

    fn field(&self, ident: &str) -> Option<&dyn Inspect> {
        self.field_ref(ident)
    }

    fn as_inspect(&self) -> &dyn Inspect {
        self
    }
}

// ============================================================================
// DECLARATORS
// ============================================================================

/// Field bindings of a struct. Selected with `#[inspect(rules)]`.
pub trait RuleSet {
    fn rules() -> Vec<FieldRules>;
}

/// Field bindings chosen from a [`Context`]. Selected with
/// `#[inspect(context_rules)]`.
pub trait ContextRuleSet {
    fn rules(ctx: &Context) -> Vec<FieldRules>;
}

/// Rules applying to every instance of a newtype or unit enum, wherever it
/// appears. Selected with `#[inspect(value_rules)]`.
pub trait ValueRules {
    fn value_rules() -> Vec<Arc<dyn Rule>>;
}

/// In-place cleanup run before validation. Selected with
/// `#[inspect(normalize)]`.
pub trait Normalize {
    fn normalize(&mut self);
}

/// Like [`Normalize`], with access to the [`Context`]. Selected with
/// `#[inspect(context_normalize)]`.
pub trait ContextNormalize {
    fn normalize(&mut self, ctx: &Context);
}
