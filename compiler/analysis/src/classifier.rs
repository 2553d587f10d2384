//! Field Type Classification
//!
//! Decides the schema shape of a Go type: scalar, message reference, repeated,
//! map, any, or unsupported. Pointers are transparent everywhere. Named types
//! that are not structs classify by what they are defined as, so
//! `type Status string` is a `string` and `type Tags []string` is repeated.

use std::collections::HashSet;

use types::{BasicKind, GoType, StructType, TypeId, TypeLookup};

/// Map a Go basic type to its schema scalar.
///
/// `int` widens to `int64` and the floats take their schema names; every
/// other basic type keeps its Go name.
pub fn scalar_name(kind: BasicKind) -> &'static str {
    match kind {
        BasicKind::Int => "int64",
        BasicKind::Float32 => "float",
        BasicKind::Float64 => "double",
        other => other.as_str(),
    }
}

/// Normalise a Go field name for the schema.
///
/// Two-character names are lower-cased entirely (`ID` → `id`); otherwise only
/// the first character is lower-cased.
pub fn field_name(name: &str) -> String {
    if name.chars().count() == 2 {
        return name.to_lowercase();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A reference to the message a field points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef<'a> {
    /// Canonical name the message is keyed by
    pub name: String,
    /// True for an in-place struct literal
    pub anonymous: bool,
    /// Struct body, if the type was collected
    pub body: Option<&'a StructType>,
}

/// What a collection element or map value resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element<'a> {
    /// Schema scalar
    Scalar(&'static str),
    /// Message reference
    Message(MessageRef<'a>),
    /// The any sentinel
    Any,
}

/// The schema shape of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Schema scalar
    Scalar(&'static str),
    /// Message reference
    Message(MessageRef<'a>),
    /// The any sentinel
    Any,
    /// Slice or array of an element
    Repeated(Element<'a>),
    /// Map with a scalar key
    Map {
        /// Scalar key type
        key: &'static str,
        /// Value type
        value: Element<'a>,
    },
    /// Not representable; the field is dropped
    Unsupported,
}

impl<'a> Classification<'a> {
    /// The message this field refers to, at any depth.
    pub fn message(&self) -> Option<&MessageRef<'a>> {
        match self {
            Classification::Message(m)
            | Classification::Repeated(Element::Message(m))
            | Classification::Map { value: Element::Message(m), .. } => Some(m),
            _ => None,
        }
    }
}

impl<'a> From<Element<'a>> for Classification<'a> {
    fn from(element: Element<'a>) -> Self {
        match element {
            Element::Scalar(s) => Classification::Scalar(s),
            Element::Message(m) => Classification::Message(m),
            Element::Any => Classification::Any,
        }
    }
}

/// Classifies types against a set of collected definitions.
pub struct Classifier<'a, L: TypeLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: TypeLookup + ?Sized> Classifier<'a, L> {
    /// Create a classifier over `lookup`.
    pub fn new(lookup: &'a L) -> Self { Self { lookup } }

    /// Classify a declared field type.
    pub fn classify(&self, ty: &'a GoType) -> Classification<'a> {
        let mut seen = HashSet::new();
        let (shape, context) = self.resolve(ty, &mut seen);
        match shape {
            GoType::Slice(elem) | GoType::Array { elem, .. } => self
                .element(elem, context, &mut seen)
                .map(Classification::Repeated)
                .unwrap_or(Classification::Unsupported),
            GoType::Map { key, value } => {
                let Some(key) = self.scalar(key) else {
                    return Classification::Unsupported;
                };
                match self.element(value, context, &mut seen) {
                    Some(value) => Classification::Map { key, value },
                    None => Classification::Unsupported,
                }
            }
            other => self.leaf(other, context).map(Classification::from).unwrap_or(Classification::Unsupported),
        }
    }

    /// The message a top-level definition produces, if any.
    ///
    /// A defined struct type is its own message. Any other definition,
    /// aliases included, produces the message its innermost element resolves
    /// to; an in-place struct literal there is named after the definition.
    pub fn definition_message(&self, id: &'a TypeId, alias: bool, ty: &'a GoType) -> Option<MessageRef<'a>> {
        if !alias {
            if let GoType::Struct(body) = self.lookup.underlying(ty) {
                return Some(MessageRef { name: id.name.clone(), anonymous: false, body: Some(body) });
            }
        }
        let mut seen = HashSet::new();
        seen.insert(id);
        match self.element(ty, Some(id.name.as_str()), &mut seen)? {
            Element::Message(message) => Some(message),
            _ => None,
        }
    }

    /// Peel pointers, aliases and non-struct named types.
    ///
    /// Returns the first structural shape reached, or a named reference that
    /// is a struct, unknown, or already visited. The second value is the
    /// innermost definition name passed through, so a struct literal behind
    /// `type Point = struct{...}` is named `Point`.
    fn resolve(&self, ty: &'a GoType, seen: &mut HashSet<&'a TypeId>) -> (&'a GoType, Option<&'a str>) {
        let mut current = ty;
        let mut context = None;
        loop {
            match current {
                GoType::Pointer(inner) => current = inner,
                GoType::Named(id) => {
                    if !seen.insert(id) {
                        return (current, context);
                    }
                    let Some(def) = self.lookup.lookup(id) else {
                        return (current, context);
                    };
                    if !def.alias && self.lookup.underlying(&def.ty).is_struct() {
                        return (current, context);
                    }
                    context = Some(def.name());
                    current = &def.ty;
                }
                _ => return (current, context),
            }
        }
    }

    /// Strip collection decoration down to the innermost element.
    fn element(
        &self,
        ty: &'a GoType,
        mut context: Option<&'a str>,
        seen: &mut HashSet<&'a TypeId>,
    ) -> Option<Element<'a>> {
        let mut current = ty;
        loop {
            let (shape, inner_context) = self.resolve(current, seen);
            if inner_context.is_some() {
                context = inner_context;
            }
            match shape {
                GoType::Slice(elem) | GoType::Array { elem, .. } => current = elem,
                GoType::Map { value, .. } => current = value,
                other => return self.leaf(other, context),
            }
        }
    }

    fn leaf(&self, shape: &'a GoType, context: Option<&'a str>) -> Option<Element<'a>> {
        match shape {
            GoType::Basic(kind) => Some(Element::Scalar(scalar_name(*kind))),
            GoType::Struct(body) => Some(Element::Message(match context {
                Some(name) => MessageRef { name: name.to_string(), anonymous: false, body: Some(body) },
                None => MessageRef { name: shape.to_string(), anonymous: true, body: Some(body) },
            })),
            GoType::Named(id) => {
                let body = match self.lookup.underlying(shape) {
                    GoType::Struct(body) => Some(body),
                    _ => None,
                };
                Some(Element::Message(MessageRef { name: id.name.clone(), anonymous: false, body }))
            }
            GoType::Interface { empty: true } => Some(Element::Any),
            _ => None,
        }
    }

    fn scalar(&self, ty: &'a GoType) -> Option<&'static str> {
        match self.resolve(ty, &mut HashSet::new()).0 {
            GoType::Basic(kind) => Some(scalar_name(*kind)),
            _ => None,
        }
    }
}
