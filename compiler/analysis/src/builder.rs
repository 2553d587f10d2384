//! Message Graph Construction
//!
//! Walks the exported definitions in collection order and builds one
//! [`Message`] per distinct canonical name. Struct literals met along the way
//! become messages of their own, keyed by their literal text, and are named
//! later by the naming passes.

use ir::{Field, Message, MessageMap, ANY_TYPE};
use tracing::debug;
use types::{StructType, TypeLookup};

use crate::classifier::{Classification, Classifier, Element, MessageRef};

/// Builds the message map for a set of collected definitions.
pub struct GraphBuilder<'a, L: TypeLookup + ?Sized> {
    lookup: &'a L,
    classifier: Classifier<'a, L>,
}

impl<'a, L: TypeLookup + ?Sized> GraphBuilder<'a, L> {
    /// Create a builder over `lookup`.
    pub fn new(lookup: &'a L) -> Self { Self { lookup, classifier: Classifier::new(lookup) } }

    /// Build messages for every exported definition that resolves to a struct.
    ///
    /// The first definition of a canonical name wins; definitions that do
    /// not resolve to a struct produce nothing.
    pub fn build(&self) -> MessageMap {
        let mut map = MessageMap::new();
        for def in self.lookup.exported() {
            match self.classifier.definition_message(&def.id, def.alias, &def.ty) {
                Some(MessageRef { name, body: Some(body), .. }) => self.add(&mut map, name, body),
                _ => debug!(definition = %def.id, "Definition has no struct shape"),
            }
        }
        map
    }

    fn add(&self, map: &mut MessageMap, name: String, body: &'a StructType) {
        let mut pending = vec![(name, body)];
        while let Some((name, body)) = pending.pop() {
            if map.contains(&name) {
                continue;
            }
            let mut message = Message::new(name.as_str());
            for field in body.fields.iter().filter(|f| f.is_exported()) {
                let classification = self.classifier.classify(&field.ty);
                if let Some(MessageRef { name, anonymous: true, body: Some(body) }) = classification.message() {
                    if !map.contains(name) {
                        pending.push((name.clone(), *body));
                    }
                }
                match to_field(&field.name, &classification) {
                    Some(mut schema_field) => {
                        schema_field.native_type_name = field.ty.to_string();
                        schema_field.tags = field.tag.clone();
                        message.push_field(schema_field);
                    }
                    None => debug!(message = %name, field = %field.name, ty = %field.ty, "Dropping unsupported field"),
                }
            }
            debug!(message = %name, fields = message.fields.len(), "Discovered message");
            map.insert_if_absent(message);
        }
    }
}

/// Build a schema field from a classification.
///
/// Message references carry their canonical name until the naming passes
/// rewrite anonymous ones.
pub fn to_field(native_name: &str, classification: &Classification<'_>) -> Option<Field> {
    let mut field = Field {
        native_field_name: native_name.to_string(),
        field_name: crate::classifier::field_name(native_name),
        is_anonymous: classification.message().is_some_and(|m| m.anonymous),
        ..Field::default()
    };
    match classification {
        Classification::Scalar(scalar) => field.type_name = (*scalar).to_string(),
        Classification::Message(message) => field.type_name = message.name.clone(),
        Classification::Any => field.type_name = ANY_TYPE.to_string(),
        Classification::Repeated(element) => {
            field.is_repeated = true;
            field.type_name = element_type_name(element);
        }
        Classification::Map { key, value } => {
            field.is_map = true;
            field.map_key = Some((*key).to_string());
            field.type_name = element_type_name(value);
        }
        Classification::Unsupported => return None,
    }
    Some(field)
}

fn element_type_name(element: &Element<'_>) -> String {
    match element {
        Element::Scalar(s) => (*s).to_string(),
        Element::Message(m) => m.name.clone(),
        Element::Any => ANY_TYPE.to_string(),
    }
}
