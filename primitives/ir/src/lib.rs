#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! go2proto Intermediate Representation (IR)
//!
//! This crate defines the schema-message graph that sits between the Go
//! collector and the proto3 emitter. Messages are owned by a single
//! name-keyed [`MessageMap`]; every cross-reference between messages is a
//! lookup by name, never a pointer.

pub mod schema_ir;

// Re-export the main IR types for convenience
pub use schema_ir::*;
