#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! go2proto Message Analysis
//!
//! Turns collected Go type definitions into a resolved message graph:
//! the graph builder discovers messages and classifies their fields, then the
//! naming passes promote anonymous struct literals to hierarchical names.
//!
//! Nothing here fails. Types and fields that have no schema form are left
//! out and logged at debug level.

use ir::MessageMap;
use types::TypeLookup;

pub mod builder;
pub mod classifier;
pub mod naming;

pub use builder::GraphBuilder;
pub use classifier::{field_name, scalar_name, Classification, Classifier, Element, MessageRef};
pub use naming::{resolve_names, LinkParents, PropagateNames, ResolveNames};

/// A transformation over the message map.
///
/// Passes run to completion over the whole map, one after another.
pub trait MessagePass {
    /// Name of the pass
    fn name(&self) -> &str;

    /// Description of what this pass does
    fn description(&self) -> &str;

    /// Execute this pass on the message map
    fn run(&self, map: &mut MessageMap);
}

/// Build the message graph for `lookup` and resolve every final name.
pub fn analyze<L: TypeLookup + ?Sized>(lookup: &L) -> MessageMap {
    let mut map = GraphBuilder::new(lookup).build();
    resolve_names(&mut map);
    map
}
