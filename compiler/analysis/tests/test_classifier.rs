use analysis::{field_name, scalar_name, Classification, Classifier, Element};
use types::{BasicKind, GoType, StructField, StructType, TypeDefinition, TypeId, TypeLookup, TypeSet};

const PKG: &str = "example.com/model";

fn basic(kind: BasicKind) -> GoType { GoType::Basic(kind) }

fn named(name: &str) -> GoType { GoType::named(PKG, name) }

fn def(name: &str, ty: GoType) -> TypeDefinition { TypeDefinition::new(TypeId::new(PKG, name), ty) }

fn fixture() -> TypeSet {
    vec![
        def("Person", GoType::Struct(StructType::new(vec![StructField::new("Name", basic(BasicKind::String))]))),
        def("Status", basic(BasicKind::String)),
        def("Tags", basic(BasicKind::String).slice()),
        def("Index", GoType::map(basic(BasicKind::String), named("Person"))),
        def(
            "Rows",
            GoType::Struct(StructType::new(vec![StructField::new("ID", basic(BasicKind::Int))])).slice(),
        ),
        def("IDs", basic(BasicKind::Int).slice()),
        TypeDefinition::alias(TypeId::new(PKG, "Human"), named("Person")),
        def("Loop", named("Loop").slice()),
        TypeDefinition::alias(
            TypeId::new(PKG, "Point"),
            GoType::Struct(StructType::new(vec![StructField::new("X", basic(BasicKind::Int))])),
        ),
        TypeDefinition::alias(
            TypeId::new(PKG, "Grid"),
            GoType::Struct(StructType::new(vec![StructField::new("Y", basic(BasicKind::String))])).slice(),
        ),
    ]
    .into_iter()
    .collect()
}

fn message_name(classification: &Classification<'_>) -> Option<String> {
    classification.message().map(|m| m.name.clone())
}

#[test]
fn test_scalar_table() {
    assert_eq!(scalar_name(BasicKind::Int), "int64");
    assert_eq!(scalar_name(BasicKind::Float32), "float");
    assert_eq!(scalar_name(BasicKind::Float64), "double");
    assert_eq!(scalar_name(BasicKind::Int32), "int32");
    assert_eq!(scalar_name(BasicKind::Uint8), "uint8");
    assert_eq!(scalar_name(BasicKind::Bool), "bool");
}

#[test]
fn test_field_name_normalisation() {
    assert_eq!(field_name("ID"), "id");
    assert_eq!(field_name("Name"), "name");
    assert_eq!(field_name("URL"), "uRL");
    assert_eq!(field_name("X"), "x");
    assert_eq!(field_name("HTTPServer"), "hTTPServer");
}

#[test]
fn test_scalars_and_named_scalars() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    assert_eq!(classifier.classify(&basic(BasicKind::Int)), Classification::Scalar("int64"));
    let status = named("Status");
    assert_eq!(classifier.classify(&status), Classification::Scalar("string"));
    let pointer = basic(BasicKind::Float32).pointer();
    assert_eq!(classifier.classify(&pointer), Classification::Scalar("float"));
}

#[test]
fn test_collections() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    let tags = named("Tags");
    assert_eq!(classifier.classify(&tags), Classification::Repeated(Element::Scalar("string")));

    let people = named("Person").pointer().slice();
    let classification = classifier.classify(&people);
    assert!(matches!(classification, Classification::Repeated(Element::Message(_))));
    assert_eq!(message_name(&classification), Some("Person".to_string()));

    let grid = basic(BasicKind::Int).slice().slice();
    assert_eq!(classifier.classify(&grid), Classification::Repeated(Element::Scalar("int64")));

    let bytes = GoType::Array { len: "32".into(), elem: Box::new(basic(BasicKind::Uint8)) };
    assert_eq!(classifier.classify(&bytes), Classification::Repeated(Element::Scalar("uint8")));
}

#[test]
fn test_maps() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    let homes = GoType::map(basic(BasicKind::String), named("Person"));
    let classification = classifier.classify(&homes);
    assert!(matches!(classification, Classification::Map { key: "string", value: Element::Message(_) }));
    assert_eq!(message_name(&classification), Some("Person".to_string()));

    let keyed_by_status = GoType::map(named("Status"), basic(BasicKind::Float64));
    assert_eq!(
        classifier.classify(&keyed_by_status),
        Classification::Map { key: "string", value: Element::Scalar("double") }
    );

    let index = named("Index");
    assert_eq!(message_name(&classifier.classify(&index)), Some("Person".to_string()));

    let bad_key = GoType::map(named("Person"), basic(BasicKind::String));
    assert_eq!(classifier.classify(&bad_key), Classification::Unsupported);
}

#[test]
fn test_any_and_unsupported_shapes() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    assert_eq!(classifier.classify(&GoType::any()), Classification::Any);
    assert_eq!(classifier.classify(&GoType::any().slice()), Classification::Repeated(Element::Any));
    assert_eq!(classifier.classify(&GoType::Func), Classification::Unsupported);
    let chan = GoType::Chan(Box::new(basic(BasicKind::Int)));
    assert_eq!(classifier.classify(&chan), Classification::Unsupported);
    assert_eq!(classifier.classify(&GoType::Interface { empty: false }), Classification::Unsupported);
}

#[test]
fn test_message_references() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    let person = named("Person").pointer();
    let classification = classifier.classify(&person);
    let reference = classification.message().expect("Person should be a message");
    assert_eq!(reference.name, "Person");
    assert!(!reference.anonymous);
    assert!(reference.body.is_some());

    let human = named("Human");
    assert_eq!(message_name(&classifier.classify(&human)), Some("Person".to_string()));

    let external = GoType::named("time", "Time");
    let classification = classifier.classify(&external);
    let reference = classification.message().expect("external types are referenced by name");
    assert_eq!(reference.name, "Time");
    assert!(reference.body.is_none());

    let literal = GoType::Struct(StructType::new(vec![StructField::new("X", basic(BasicKind::Int))]));
    let classification = classifier.classify(&literal);
    let reference = classification.message().expect("struct literals are messages");
    assert_eq!(reference.name, "struct{X int}");
    assert!(reference.anonymous);
}

#[test]
fn test_definition_messages() {
    let set = fixture();
    let classifier = Classifier::new(&set);
    let message_for = |name: &str| {
        let def = set.definitions().iter().find(|d| d.name() == name).expect("definition exists");
        classifier.definition_message(&def.id, def.alias, &def.ty).map(|m| (m.name, m.anonymous))
    };

    assert_eq!(message_for("Person"), Some(("Person".to_string(), false)));
    assert_eq!(message_for("Rows"), Some(("Rows".to_string(), false)));
    assert_eq!(message_for("Human"), Some(("Person".to_string(), false)));
    assert_eq!(message_for("Index"), Some(("Person".to_string(), false)));
    assert_eq!(message_for("IDs"), None);
    assert_eq!(message_for("Status"), None);
    assert_eq!(message_for("Loop"), Some(("Loop".to_string(), false)));
    assert_eq!(message_for("Point"), Some(("Point".to_string(), false)));
    assert_eq!(message_for("Grid"), Some(("Grid".to_string(), false)));
}

#[test]
fn test_alias_to_struct_literal_is_named_after_the_alias() {
    let set = fixture();
    let classifier = Classifier::new(&set);

    let point = named("Point");
    let classification = classifier.classify(&point);
    let reference = classification.message().expect("Point should be a message");
    assert_eq!(reference.name, "Point");
    assert!(!reference.anonymous);
    assert!(reference.body.is_some());

    let grid = named("Grid").pointer();
    let classification = classifier.classify(&grid);
    assert!(matches!(classification, Classification::Repeated(Element::Message(_))));
    assert_eq!(message_name(&classification).as_deref(), Some("Grid"));
}
