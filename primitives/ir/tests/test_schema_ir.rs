//! Unit tests for the schema IR

use go2proto_ir::*;
use tempfile::TempDir;

fn scalar(name: &str, ty: &str) -> Field {
    Field {
        native_type_name: ty.to_string(),
        native_field_name: name.to_string(),
        field_name: name.to_lowercase(),
        type_name: ty.to_string(),
        ..Field::default()
    }
}

#[test]
fn test_push_field_assigns_dense_ordinals() {
    let mut message = Message::new("Person");
    message.push_field(scalar("Name", "string"));
    message.push_field(scalar("Age", "int64"));
    message.push_field(scalar("Nick", "string"));

    let orders: Vec<u32> = message.fields.iter().map(|f| f.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
    assert_eq!(message.type_name, "Person");
    assert_eq!(message.field("age").map(|f| f.type_name.as_str()), Some("int64"));
}

#[test]
fn test_message_map_first_seen_wins() {
    let mut map = MessageMap::new();
    let mut first = Message::new("Address");
    first.push_field(scalar("Street", "string"));

    assert!(map.insert_if_absent(first));
    assert!(!map.insert_if_absent(Message::new("Address")));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("Address").map(|m| m.fields.len()), Some(1));
}

#[test]
fn test_message_map_keys_are_stable_across_renames() {
    let mut map = MessageMap::new();
    map.insert_if_absent(Message::new("struct{X int}"));
    map.insert_if_absent(Message::new("Outer"));

    if let Some(inner) = map.get_mut("struct{X int}") {
        inner.type_name = "Outer_Inner".to_string();
    }

    assert!(map.contains("struct{X int}"));
    assert_eq!(map.get("struct{X int}").map(|m| m.type_name.as_str()), Some("Outer_Inner"));
    assert_eq!(map.keys(), vec!["Outer".to_string(), "struct{X int}".to_string()]);
}

#[test]
fn test_schema_sorts_by_final_name() {
    let mut zed = Message::new("struct{A int}");
    zed.type_name = "Alpha_Inner".to_string();
    let schema = SchemaIR::new(vec![Message::new("Person"), zed, Message::new("Address")]);

    let names: Vec<&str> = schema.messages().iter().map(|m| m.type_name.as_str()).collect();
    assert_eq!(names, vec!["Address", "Alpha_Inner", "Person"]);
    assert!(schema.get("Alpha_Inner").is_some());
}

#[test]
fn test_schema_flags() {
    let mut tagged = Message::new("Tagged");
    tagged.push_field(scalar("Name", "string"));
    let mut any = Message::new("Loose");
    any.push_field(scalar("Payload", ANY_TYPE));

    let plain = SchemaIR::new(vec![tagged.clone()]);
    assert!(!plain.has_tags());
    assert!(!plain.uses_any());

    tagged.fields[0].tags = r#"json:"name""#.to_string();
    let schema = SchemaIR::new(vec![tagged, any]);
    assert!(schema.has_tags());
    assert!(schema.uses_any());
}

#[test]
fn test_schema_file_roundtrip() {
    let mut person = Message::new("Person");
    person.push_field(Field {
        is_map: true,
        map_key: Some("string".to_string()),
        ..scalar("Homes", "Address")
    });
    let schema = SchemaIR::new(vec![person, Message::new("Address")]);

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("schema.ir.json");
    schema.to_file(&path).expect("Failed to write schema");

    let content = std::fs::read_to_string(&path).expect("Failed to read schema");
    assert!(content.ends_with('\n'));
    assert!(content.contains("\"map_key\": \"string\""));

    let loaded: SchemaIR = serde_json::from_str(&content).expect("Failed to parse schema");
    assert_eq!(loaded, schema);
}
