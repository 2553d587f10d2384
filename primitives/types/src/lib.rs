#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Go Type Model
//!
//! This crate defines the declaration-level view of Go source types that the
//! collector produces and the analysis passes consume. It captures just enough
//! structure to recognise pointers, collections, maps, struct literals,
//! interfaces and package-qualified names; it is not a type checker.
//!
//! Values in this crate are immutable once the collector hands them over.

/// Predeclared Go basic types.
pub mod basic;
/// Exported top-level type definitions and the lookup interface over them.
pub mod definition;
/// Structural Go types: named references, wrappers and struct literals.
pub mod go_type;

pub use basic::BasicKind;
pub use definition::{TypeDefinition, TypeLookup, TypeSet};
pub use go_type::{is_exported, GoType, StructField, StructType, TypeId};
