use go2proto_codegen::{EmitOptions, ProtoEmitter, ANY_IMPORT, TAGGER_IMPORT};
use ir::{Field, Message, SchemaIR, ANY_TYPE};
use tempfile::NamedTempFile;

fn field(name: &str, ty: &str) -> Field {
    Field { field_name: name.into(), native_field_name: name.into(), type_name: ty.into(), ..Field::default() }
}

fn message(name: &str, fields: Vec<Field>) -> Message {
    let mut message = Message::new(name);
    for field in fields {
        message.push_field(field);
    }
    message
}

fn people() -> SchemaIR {
    SchemaIR::new(vec![
        message(
            "Person",
            vec![
                field("name", "string"),
                field("home", "Address"),
                Field { is_repeated: true, ..field("tags", "string") },
            ],
        ),
        message("Address", vec![field("street", "string"), field("city", "string")]),
    ])
}

#[test]
fn test_renders_people_schema() {
    let text = ProtoEmitter::default().render(&people()).expect("Failed to render");

    let expected = "syntax = \"proto3\";

package proto;

message Address {
  string street = 1;
  string city = 2;
}

message Person {
  string name = 1;
  Address home = 2;
  repeated string tags = 3;
}
";
    assert_eq!(text, expected);
}

#[test]
fn test_tags_require_flag_and_presence() {
    let tagged = SchemaIR::new(vec![message(
        "User",
        vec![Field { tags: r#"json:"email""#.into(), ..field("email", "string") }],
    )]);

    let plain = ProtoEmitter::new(EmitOptions { use_tags: false }).render(&tagged).expect("Failed to render");
    assert!(!plain.contains("import"));
    assert!(!plain.contains("tagger.tags"));

    let with_tags = ProtoEmitter::new(EmitOptions { use_tags: true }).render(&tagged).expect("Failed to render");
    assert!(with_tags.contains("package proto;\n\nimport \"tagger/tagger.proto\";\n\nmessage User {"));
    assert!(with_tags.contains(r#"  string email = 1 [(tagger.tags) = "json:\"email\""];"#));

    let untagged = ProtoEmitter::new(EmitOptions { use_tags: true }).render(&people()).expect("Failed to render");
    assert!(!untagged.contains(TAGGER_IMPORT));
}

#[test]
fn test_any_import_ignores_tag_flag() {
    let schema = SchemaIR::new(vec![message("Envelope", vec![field("payload", ANY_TYPE)])]);

    for use_tags in [false, true] {
        let emitter = ProtoEmitter::new(EmitOptions { use_tags });
        assert_eq!(emitter.imports(&schema), vec![ANY_IMPORT]);
        let text = emitter.render(&schema).expect("Failed to render");
        assert!(text.contains("import \"google/protobuf/any.proto\";"));
        assert!(text.contains("  google.protobuf.Any payload = 1;"));
    }
    assert!(ProtoEmitter::default().imports(&people()).is_empty());
}

#[test]
fn test_both_imports_in_order() {
    let schema = SchemaIR::new(vec![message(
        "Event",
        vec![Field { tags: "k:v".into(), ..field("id", "string") }, field("data", ANY_TYPE)],
    )]);

    let emitter = ProtoEmitter::new(EmitOptions { use_tags: true });
    assert_eq!(emitter.imports(&schema), vec![TAGGER_IMPORT, ANY_IMPORT]);
}

#[test]
fn test_output_is_deterministic_and_sorted() {
    let schema = people();
    let reversed = SchemaIR::new(schema.messages().iter().rev().cloned().collect());

    let first = ProtoEmitter::default().render(&schema).expect("Failed to render");
    let second = ProtoEmitter::default().render(&reversed).expect("Failed to render");
    assert_eq!(first, second);
    assert!(first.find("message Address").expect("Address") < first.find("message Person").expect("Person"));
    assert!(first.ends_with("}\n"));
    assert!(!first.ends_with("\n\n"));
}

#[test]
fn test_write_output_to_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    ProtoEmitter::default().write_output(file.as_file_mut(), &people()).expect("Failed to write output");

    let content = std::fs::read_to_string(file.path()).expect("Failed to read output");
    assert_eq!(content, ProtoEmitter::default().render(&people()).expect("Failed to render"));
}
