//! Generic value view
//!
//! Validation walks values whose shape is only known at runtime. Two traits
//! expose that shape:
//!
//! - [`Inspect`]: the live view of a value: its [`Kind`], absence, zero-ness,
//!   length, pointee and named fields. Object safe; the traversal only ever
//!   sees `&dyn Inspect`.
//! - [`Describe`]: the declared view of a type, available without a value.
//!   Used when an optional field is absent but the rules on the fields of the
//!   type it would hold must still be checked.
//!
//! Both are implemented here for the standard library types and
//! `serde_json::Value`, and generated for named structs by
//! `#[derive(Record)]`.
//!
//! # Examples
//!
//! ```rust
//! use ruletag::value::{Inspect, Kind};
//!
//! let name: Option<String> = None;
//! assert_eq!(name.kind(), Kind::Optional);
//! assert!(name.is_absent());
//!
//! let tags = vec!["a", "b"];
//! assert_eq!((&tags as &dyn Inspect).length(), Ok(2));
//! ```

mod impls;
mod json;

use std::fmt;

use crate::error::ValueError;

// ============================================================================
// KIND
// ============================================================================

/// Structural classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Numbers, booleans, characters and other scalar values.
    Primitive,
    /// Text.
    Text,
    /// A value that may hold nothing (`Option<T>`).
    Optional,
    /// A pointer that always holds a value (`Box<T>`, `Arc<T>`, `&T`).
    Reference,
    /// An ordered sequence (`Vec<T>`, slices, arrays).
    Sequence,
    /// A keyed mapping (`HashMap`, `BTreeMap`, sets).
    Mapping,
    /// A value whose concrete type is only known at runtime.
    Any,
    /// A value with named fields.
    Record,
}

impl Kind {
    /// True for the kinds that point at another value: optional, reference and any.
    pub fn is_pointer(self) -> bool {
        matches!(self, Kind::Optional | Kind::Reference | Kind::Any)
    }

    /// True for the kinds that have a length.
    pub fn is_measurable(self) -> bool {
        matches!(self, Kind::Text | Kind::Sequence | Kind::Mapping)
    }

    /// Lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Primitive => "primitive",
            Kind::Text => "text",
            Kind::Optional => "optional",
            Kind::Reference => "reference",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
            Kind::Any => "any",
            Kind::Record => "record",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// DECLARED SHAPE
// ============================================================================

/// The declared structure of a type, independent of any value.
///
/// Pointees and field lists are stored as function pointers so that
/// self-referential types can describe themselves without recursing.
#[derive(Clone, Copy)]
pub struct Shape {
    type_name: &'static str,
    kind: Kind,
    pointee: Option<fn() -> Shape>,
    fields: Option<fn() -> Vec<FieldDecl>>,
}

impl Shape {
    /// Shape of a type with no pointee and no fields.
    pub fn leaf<T: ?Sized>(kind: Kind) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            kind,
            pointee: None,
            fields: None,
        }
    }

    /// Shape of an optional, reference or any type pointing at `pointee`.
    pub fn pointer<T: ?Sized>(kind: Kind, pointee: fn() -> Shape) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            kind,
            pointee: Some(pointee),
            fields: None,
        }
    }

    /// Shape of a record type with the given declared fields.
    pub fn record<T: ?Sized>(fields: fn() -> Vec<FieldDecl>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            kind: Kind::Record,
            pointee: None,
            fields: Some(fields),
        }
    }

    /// Fully qualified name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Kind of the described type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Declared pointee, for pointer kinds whose target type is known.
    pub fn pointee(&self) -> Option<Shape> {
        self.pointee.map(|pointee| pointee())
    }

    /// Declared fields, in declaration order. Empty for non-records.
    pub fn fields(&self) -> Vec<FieldDecl> {
        self.fields.map(|fields| fields()).unwrap_or_default()
    }

    /// Follows declared pointees until a non-pointer shape.
    ///
    /// Returns `None` when a pointer kind has no declared target, as with
    /// `Box<dyn Inspect>`.
    pub fn resolve(self) -> Option<Shape> {
        let mut shape = self;
        while shape.kind.is_pointer() {
            shape = shape.pointee()?;
        }
        Some(shape)
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("has_pointee", &self.pointee.is_some())
            .finish()
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.kind == other.kind
    }
}

/// One declared field of a record type.
#[derive(Clone, Copy)]
pub struct FieldDecl {
    name: &'static str,
    rules: &'static str,
    shape: fn() -> Shape,
}

impl FieldDecl {
    /// Creates a field declaration.
    pub const fn new(name: &'static str, rules: &'static str, shape: fn() -> Shape) -> Self {
        Self { name, rules, shape }
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw rule text attached to the field, empty if none.
    pub fn rules(&self) -> &'static str {
        self.rules
    }

    /// Declared shape of the field's type.
    pub fn shape(&self) -> Shape {
        (self.shape)()
    }
}

impl fmt::Debug for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .finish()
    }
}

// ============================================================================
// LIVE VIEW
// ============================================================================

/// One named field of a record value.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    name: &'static str,
    rules: &'static str,
    value: &'a dyn Inspect,
}

impl<'a> Field<'a> {
    /// Creates a field view.
    pub fn new(name: &'static str, rules: &'static str, value: &'a dyn Inspect) -> Self {
        Self { name, rules, value }
    }

    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw rule text attached to the field, empty if none.
    pub fn rules(&self) -> &'static str {
        self.rules
    }

    /// View of the field's value.
    pub fn value(&self) -> &'a dyn Inspect {
        self.value
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("kind", &self.value.kind())
            .finish()
    }
}

/// Live view over a value of any type.
///
/// The kind returned by [`kind`](Inspect::kind) is fixed for a given value.
/// [`pointee`](Inspect::pointee) is only meaningful for pointer kinds and
/// yields either nothing (absent) or exactly one view.
pub trait Inspect {
    /// Structural kind of this value.
    fn kind(&self) -> Kind;

    /// True only for an optional, reference or any holding nothing.
    fn is_absent(&self) -> bool {
        false
    }

    /// True for the empty/default value of the concrete type.
    fn is_zero(&self) -> bool;

    /// Length for text, sequence and mapping kinds; `None` otherwise.
    ///
    /// Text length counts Unicode scalar values.
    fn len(&self) -> Option<usize> {
        None
    }

    /// The pointed-to value for a present pointer kind.
    fn pointee(&self) -> Option<&dyn Inspect> {
        None
    }

    /// Named fields in declaration order. Empty unless the kind is record.
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    /// The text content for text kinds.
    fn as_text(&self) -> Option<&str> {
        None
    }

    /// Declared shape of this value's type.
    fn shape(&self) -> Shape;
}

impl dyn Inspect + '_ {
    /// Follows pointees until a non-pointer kind.
    ///
    /// Returns `None` if any link of the chain is absent.
    pub fn resolve(&self) -> Option<&dyn Inspect> {
        let mut current: &dyn Inspect = self;
        while current.kind().is_pointer() {
            if current.is_absent() {
                return None;
            }
            current = current.pointee()?;
        }
        Some(current)
    }

    /// Length of the resolved value.
    ///
    /// Calling this on a kind without a length is a usage error.
    pub fn length(&self) -> Result<usize, ValueError> {
        let resolved = self.resolve().ok_or(ValueError::Absent)?;
        resolved.len().ok_or(ValueError::NotMeasurable {
            kind: resolved.kind(),
        })
    }
}

/// Declared view of a type, available without a value.
pub trait Describe {
    /// Declared shape of this type.
    fn shape() -> Shape;

    /// Declared fields in declaration order. Empty unless this is a record.
    fn declared_fields() -> Vec<FieldDecl> {
        Vec::new()
    }
}
