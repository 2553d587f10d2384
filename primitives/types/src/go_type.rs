//! Structural Go types.
//!
//! A [`GoType`] is the lowered form of a Go type expression. Named references
//! carry a [`TypeId`] (import path plus name) so they can be looked up in a
//! [`crate::TypeLookup`]; everything else is structural. The [`fmt::Display`]
//! rendering follows Go's own type strings and doubles as the identity of
//! anonymous struct literals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::BasicKind;

/// Package-qualified identity of a named Go type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId {
    /// Import path of the declaring package (empty for universe-scope names)
    pub package: String,
    /// Declared type name
    pub name: String,
}

impl TypeId {
    /// Create a new type identity.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self { package: package.into(), name: name.into() }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

/// A lowered Go type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoType {
    /// A predeclared basic type.
    Basic(BasicKind),
    /// A reference to a declared type, possibly from another package.
    Named(TypeId),
    /// `*T`
    Pointer(Box<GoType>),
    /// `[]T`
    Slice(Box<GoType>),
    /// `[N]T`; the length expression is kept as source text.
    Array {
        /// Length expression as written
        len: String,
        /// Element type
        elem: Box<GoType>,
    },
    /// `map[K]V`
    Map {
        /// Key type
        key: Box<GoType>,
        /// Value type
        value: Box<GoType>,
    },
    /// A struct literal.
    Struct(StructType),
    /// An interface literal. Only emptiness is tracked.
    Interface {
        /// True for `interface{}` and `any`
        empty: bool,
    },
    /// A function type.
    Func,
    /// A channel type.
    Chan(Box<GoType>),
}

impl GoType {
    /// Wrap this type in a pointer.
    pub fn pointer(self) -> Self { GoType::Pointer(Box::new(self)) }

    /// Wrap this type in a slice.
    pub fn slice(self) -> Self { GoType::Slice(Box::new(self)) }

    /// Build a map type.
    pub fn map(key: GoType, value: GoType) -> Self {
        GoType::Map { key: Box::new(key), value: Box::new(value) }
    }

    /// Build a named type reference.
    pub fn named(package: impl Into<String>, name: impl Into<String>) -> Self {
        GoType::Named(TypeId::new(package, name))
    }

    /// The empty interface, `any`.
    pub fn any() -> Self { GoType::Interface { empty: true } }

    /// True if this is a struct literal.
    pub fn is_struct(&self) -> bool { matches!(self, GoType::Struct(_)) }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Basic(kind) => write!(f, "{}", kind),
            GoType::Named(id) => write!(f, "{}", id),
            GoType::Pointer(elem) => write!(f, "*{}", elem),
            GoType::Slice(elem) => write!(f, "[]{}", elem),
            GoType::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            GoType::Map { key, value } => write!(f, "map[{}]{}", key, value),
            GoType::Struct(st) => write!(f, "{}", st),
            GoType::Interface { empty: true } => f.write_str("interface{}"),
            GoType::Interface { empty: false } => f.write_str("interface{...}"),
            GoType::Func => f.write_str("func(...)"),
            GoType::Chan(elem) => write!(f, "chan {}", elem),
        }
    }
}

/// The fields of a struct literal, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    /// Declared fields, exported and unexported alike
    pub fields: Vec<StructField>,
}

impl StructType {
    /// Create a struct type from its fields.
    pub fn new(fields: Vec<StructField>) -> Self { Self { fields } }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("struct{")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if field.embedded {
                write!(f, "{}", field.ty)?;
            } else {
                write!(f, "{} {}", field.name, field.ty)?;
            }
            if !field.tag.is_empty() {
                write!(f, " {:?}", field.tag)?;
            }
        }
        f.write_str("}")
    }
}

/// A single struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    /// Field name; for embedded fields this is the bare type name
    pub name: String,
    /// Declared field type
    pub ty: GoType,
    /// Whether the field is embedded
    pub embedded: bool,
    /// Raw struct tag without its quotes (empty when absent)
    pub tag: String,
}

impl StructField {
    /// Create a named, untagged field.
    pub fn new(name: impl Into<String>, ty: GoType) -> Self {
        Self { name: name.into(), ty, embedded: false, tag: String::new() }
    }

    /// Attach a raw struct tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Whether Go would export this field.
    pub fn is_exported(&self) -> bool { is_exported(&self.name) }
}

/// Go's export rule: the identifier starts with an upper-case letter.
pub fn is_exported(ident: &str) -> bool { ident.chars().next().is_some_and(|c| c.is_uppercase()) }
