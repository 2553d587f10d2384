//! Schema message graph
//!
//! [`Message`] and [`Field`] are built by the graph builder, renamed by the
//! naming passes and read by the emitter. [`SchemaIR`] is the finished,
//! serialisable form handed to the emitter and to `--dump-ir`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The portable fallback type for untyped (`interface{}`/`any`) fields.
pub const ANY_TYPE: &str = "google.protobuf.Any";

/// A schema message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Canonical name this message is keyed by in the [`MessageMap`]
    pub canonical_name: String,
    /// Final emitted name; rewritten during anonymous promotion
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Canonical name of the enclosing message for promoted anonymous structs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Native name of the parent field this message was declared under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parental_field_name: Option<String>,
}

impl Message {
    /// Create a message whose final name starts out as its canonical name.
    pub fn new(canonical_name: impl Into<String>) -> Self {
        let canonical_name = canonical_name.into();
        Self {
            type_name: canonical_name.clone(),
            canonical_name,
            fields: Vec::new(),
            parent: None,
            parental_field_name: None,
        }
    }

    /// Append a field, assigning it the next ordinal.
    pub fn push_field(&mut self, mut field: Field) {
        field.order = self.fields.len() as u32 + 1;
        self.fields.push(field);
    }

    /// Whether any field carries a metadata tag.
    pub fn has_tags(&self) -> bool { self.fields.iter().any(|f| !f.tags.is_empty()) }

    /// Whether any field resolved to the any sentinel.
    pub fn uses_any(&self) -> bool { self.fields.iter().any(Field::is_any) }

    /// Look up a field by its emitted name.
    pub fn field(&self, field_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }
}

/// A field of a schema message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Declared Go type as written; carried into the IR dump for diagnostics
    pub native_type_name: String,
    /// Declared Go field name
    pub native_field_name: String,
    /// True if the declared type is an in-place struct literal
    pub is_anonymous: bool,
    /// Emitted field name
    pub field_name: String,
    /// Emitted type name (scalar, message reference or [`ANY_TYPE`])
    pub type_name: String,
    /// Emitted with the `repeated` marker
    pub is_repeated: bool,
    /// Emitted as a `map<key, value>`
    pub is_map: bool,
    /// Scalar key type of a map field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_key: Option<String>,
    /// 1-based ordinal position
    pub order: u32,
    /// Raw metadata tag, possibly empty
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub tags: String,
}

impl Field {
    /// Whether the field resolved to the any sentinel.
    pub fn is_any(&self) -> bool { self.type_name == ANY_TYPE }
}

/// The resolution-time working set: canonical name to message.
///
/// Keys never change once inserted, so lookups by canonical name stay valid
/// while final names are rewritten.
#[derive(Debug, Clone, Default)]
pub struct MessageMap {
    messages: BTreeMap<String, Message>,
}

impl MessageMap {
    /// Create an empty map.
    pub fn new() -> Self { Self::default() }

    /// Insert a message unless its canonical name is already taken.
    ///
    /// Returns false if an earlier message wins.
    pub fn insert_if_absent(&mut self, message: Message) -> bool {
        if self.messages.contains_key(&message.canonical_name) {
            return false;
        }
        self.messages.insert(message.canonical_name.clone(), message);
        true
    }

    /// Whether a message is keyed under `canonical_name`.
    pub fn contains(&self, canonical_name: &str) -> bool {
        self.messages.contains_key(canonical_name)
    }

    /// Look up a message by canonical name.
    pub fn get(&self, canonical_name: &str) -> Option<&Message> {
        self.messages.get(canonical_name)
    }

    /// Look up a message mutably by canonical name.
    pub fn get_mut(&mut self, canonical_name: &str) -> Option<&mut Message> {
        self.messages.get_mut(canonical_name)
    }

    /// Canonical names in sorted order.
    pub fn keys(&self) -> Vec<String> { self.messages.keys().cloned().collect() }

    /// Iterate messages in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> { self.messages.values() }

    /// Iterate messages mutably in canonical-name order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Message> { self.messages.values_mut() }

    /// Number of messages.
    pub fn len(&self) -> usize { self.messages.len() }

    /// True if nothing was discovered.
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    /// Consume the map, yielding messages in canonical-name order.
    pub fn into_messages(self) -> Vec<Message> { self.messages.into_values().collect() }
}

/// The finished schema: messages sorted by final name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIR {
    messages: Vec<Message>,
}

impl SchemaIR {
    /// Build a schema, sorting messages by final name.
    pub fn new(mut messages: Vec<Message>) -> Self {
        messages.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        Self { messages }
    }

    /// Messages in emission order.
    pub fn messages(&self) -> &[Message] { &self.messages }

    /// Consume the schema, yielding its messages.
    pub fn into_messages(self) -> Vec<Message> { self.messages }

    /// Find a message by final name.
    pub fn get(&self, type_name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.type_name == type_name)
    }

    /// Number of messages.
    pub fn len(&self) -> usize { self.messages.len() }

    /// True if the schema has no messages.
    pub fn is_empty(&self) -> bool { self.messages.is_empty() }

    /// Whether any field anywhere carries a metadata tag.
    pub fn has_tags(&self) -> bool { self.messages.iter().any(Message::has_tags) }

    /// Whether any field anywhere resolved to the any sentinel.
    pub fn uses_any(&self) -> bool { self.messages.iter().any(Message::uses_any) }

    /// Save the schema to a JSON file with pretty formatting
    ///
    /// Missing parent directories are created. Serialization failures are
    /// reported as [`std::io::Error`]s.
    pub fn to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        // Ensure file ends with a newline (POSIX standard)
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }
}
