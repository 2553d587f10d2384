//! Top-level type definitions and lookup.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{is_exported, GoType, TypeId};

/// A top-level `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Identity of the declared name
    pub id: TypeId,
    /// True for `type A = B` aliases
    pub alias: bool,
    /// Right-hand side of the declaration
    pub ty: GoType,
}

impl TypeDefinition {
    /// Declare a defined type (`type Name T`).
    pub fn new(id: TypeId, ty: GoType) -> Self { Self { id, alias: false, ty } }

    /// Declare an alias (`type Name = T`).
    pub fn alias(id: TypeId, ty: GoType) -> Self { Self { id, alias: true, ty } }

    /// The bare declared name.
    pub fn name(&self) -> &str { &self.id.name }

    /// Whether the declared name is exported.
    pub fn is_exported(&self) -> bool { is_exported(&self.id.name) }
}

/// Read-only access to a set of collected definitions.
pub trait TypeLookup {
    /// All definitions in collection order.
    fn definitions(&self) -> &[TypeDefinition];

    /// Find a definition by identity.
    fn lookup(&self, id: &TypeId) -> Option<&TypeDefinition>;

    /// Exported definitions in collection order.
    fn exported(&self) -> Vec<&TypeDefinition> {
        self.definitions().iter().filter(|def| def.is_exported()).collect()
    }

    /// Follow named references until a structural type is reached.
    ///
    /// Unknown names and reference cycles stop the walk at the last named
    /// type seen.
    fn underlying<'a>(&'a self, ty: &'a GoType) -> &'a GoType {
        let mut current = ty;
        let mut seen: HashSet<&TypeId> = HashSet::new();
        while let GoType::Named(id) = current {
            if !seen.insert(id) {
                break;
            }
            match self.lookup(id) {
                Some(def) => current = &def.ty,
                None => break,
            }
        }
        current
    }
}

/// An ordered, indexed collection of definitions.
///
/// The first definition pushed for an identity is the one returned by
/// lookups; later duplicates are kept in order but shadowed.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    definitions: Vec<TypeDefinition>,
    index: HashMap<TypeId, usize>,
}

impl TypeSet {
    /// Create an empty set.
    pub fn new() -> Self { Self::default() }

    /// Append a definition.
    pub fn push(&mut self, def: TypeDefinition) {
        self.index.entry(def.id.clone()).or_insert(self.definitions.len());
        self.definitions.push(def);
    }

    /// Number of definitions held.
    pub fn len(&self) -> usize { self.definitions.len() }

    /// True if no definitions were collected.
    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

impl FromIterator<TypeDefinition> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeDefinition>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for def in iter {
            set.push(def);
        }
        set
    }
}

impl Extend<TypeDefinition> for TypeSet {
    fn extend<I: IntoIterator<Item = TypeDefinition>>(&mut self, iter: I) {
        for def in iter {
            self.push(def);
        }
    }
}

impl TypeLookup for TypeSet {
    fn definitions(&self) -> &[TypeDefinition] { &self.definitions }

    fn lookup(&self, id: &TypeId) -> Option<&TypeDefinition> {
        self.index.get(id).map(|&i| &self.definitions[i])
    }
}
