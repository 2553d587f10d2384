//! Anonymous Message Naming
//!
//! Struct literals are keyed by their literal text until these passes give
//! them a name derived from where they were declared: `Outer_Inner` for a
//! literal under field `Inner` of `Outer`, `Outer_Inner_Deep` one level down.
//!
//! The passes must run in order over the whole map before anything reads the
//! final names.

use std::collections::{BTreeMap, HashSet};

use ir::MessageMap;
use tracing::{debug, warn};

use crate::MessagePass;

/// Pass 1: record the enclosing message and field of every struct literal.
///
/// Fields are scanned last to first, so when one literal appears under
/// several fields of a message the earliest field's name is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkParents;

impl MessagePass for LinkParents {
    fn name(&self) -> &str { "link-parents" }

    fn description(&self) -> &str { "Link anonymous messages to the field that declares them" }

    fn run(&self, map: &mut MessageMap) {
        let mut links = Vec::new();
        for message in map.iter() {
            for field in message.fields.iter().rev().filter(|f| f.is_anonymous) {
                links.push((field.type_name.clone(), message.canonical_name.clone(), field.native_field_name.clone()));
            }
        }
        for (child, parent, field_name) in links {
            if child == parent {
                continue;
            }
            if let Some(message) = map.get_mut(&child) {
                message.parent = Some(parent);
                message.parental_field_name = Some(field_name);
            }
        }
    }
}

/// Pass 2: compute final names by walking parent links.
///
/// Each chain is walked once, without recursion, and named parents first. A
/// promoted name that clashes with a name already taken gets a numeric
/// suffix before any of its children are named, so they inherit it. A chain
/// that loops back on itself is cut at the repeated message, which keeps its
/// canonical name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveNames;

impl ResolveNames {
    fn final_names(map: &MessageMap) -> BTreeMap<String, String> {
        let mut resolved: BTreeMap<String, String> = BTreeMap::new();
        let mut taken: HashSet<String> = HashSet::new();
        for message in map.iter().filter(|m| m.parent.is_none()) {
            taken.insert(message.type_name.clone());
            resolved.insert(message.canonical_name.clone(), message.type_name.clone());
        }

        for key in map.keys() {
            let mut chain: Vec<String> = Vec::new();
            let mut cursor = key;
            while !resolved.contains_key(&cursor) {
                match map.get(&cursor).and_then(|m| m.parent.clone()) {
                    Some(parent) if !chain.contains(&cursor) => {
                        chain.push(cursor);
                        cursor = parent;
                    }
                    Some(_) => {
                        warn!(message = %cursor, "Anonymous nesting cycle; keeping canonical name");
                        let name = Self::claim(&mut taken, cursor.clone());
                        resolved.insert(cursor, name);
                        break;
                    }
                    None => {
                        resolved.insert(cursor.clone(), cursor);
                        break;
                    }
                }
            }
            for child in chain.into_iter().rev() {
                if resolved.contains_key(&child) {
                    continue;
                }
                let Some(message) = map.get(&child) else {
                    continue;
                };
                let (Some(parent), Some(field)) = (&message.parent, &message.parental_field_name) else {
                    continue;
                };
                let parent_name = resolved.get(parent).cloned().unwrap_or_else(|| parent.clone());
                let name = Self::claim(&mut taken, format!("{}_{}", parent_name, field));
                resolved.insert(child, name);
            }
        }
        resolved
    }

    /// Take `name`, or the first free `name_N` from 2 upwards.
    fn claim(taken: &mut HashSet<String>, name: String) -> String {
        if taken.insert(name.clone()) {
            return name;
        }
        let mut suffix = 2;
        let unique = loop {
            let candidate = format!("{}_{}", name, suffix);
            if taken.insert(candidate.clone()) {
                break candidate;
            }
            suffix += 1;
        };
        warn!(name = %name, renamed = %unique, "Promoted message name collides; adding suffix");
        unique
    }
}

impl MessagePass for ResolveNames {
    fn name(&self) -> &str { "resolve-names" }

    fn description(&self) -> &str { "Compute hierarchical names for anonymous messages" }

    fn run(&self, map: &mut MessageMap) {
        let mut resolved = Self::final_names(map);
        for message in map.iter_mut() {
            if let Some(name) = resolved.remove(&message.canonical_name) {
                message.type_name = name;
            }
        }
    }
}

/// Pass 3: point anonymous fields at the final names of their messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropagateNames;

impl MessagePass for PropagateNames {
    fn name(&self) -> &str { "propagate-names" }

    fn description(&self) -> &str { "Rewrite field references to renamed anonymous messages" }

    fn run(&self, map: &mut MessageMap) {
        let finals: BTreeMap<String, String> =
            map.iter().map(|m| (m.canonical_name.clone(), m.type_name.clone())).collect();
        for message in map.iter_mut() {
            for field in message.fields.iter_mut().filter(|f| f.is_anonymous) {
                if let Some(name) = finals.get(&field.type_name) {
                    field.type_name = name.clone();
                }
            }
        }
    }
}

/// Run the three naming passes in order.
pub fn resolve_names(map: &mut MessageMap) {
    let passes: [&dyn MessagePass; 3] = [&LinkParents, &ResolveNames, &PropagateNames];
    for pass in passes {
        debug!(pass = pass.name(), "Running naming pass");
        pass.run(map);
    }
}
