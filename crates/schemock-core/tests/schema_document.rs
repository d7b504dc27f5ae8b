use schemock_core::{
    Check, Definitions, Error, LiteralValue, Schema, SchemaKind, StringFormat,
    schema_document_json_schema, validate_schema, validate_schema_document,
};
use serde_json::json;

#[test]
fn document_parses_into_schema_tree() {
    let document = json!({
        "root": {
            "type": "object",
            "fields": [
                { "name": "id", "schema": { "type": "format", "format": "uuid" } },
                {
                    "name": "count",
                    "schema": {
                        "type": "number",
                        "checks": [
                            { "check": "greater_than", "value": 10.0, "inclusive": true },
                            { "check": "less_than", "value": 20.0, "inclusive": true }
                        ]
                    }
                },
                { "name": "tag", "schema": { "type": "enum", "values": ["a", "b", 3] } }
            ]
        }
    });

    let parsed = validate_schema_document(&document).expect("valid document");
    let SchemaKind::Object { fields } = parsed.root.kind() else {
        panic!("expected object root");
    };
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].name, "id");
    assert!(matches!(
        fields[0].schema.kind(),
        SchemaKind::Format {
            format: StringFormat::Uuid,
            ..
        }
    ));
    assert_eq!(fields[1].schema.checks().len(), 2);
    assert!(matches!(
        fields[1].schema.checks()[0],
        Check::GreaterThan { inclusive: true, .. }
    ));
    let SchemaKind::Enum { values } = fields[2].schema.kind() else {
        panic!("expected enum");
    };
    assert_eq!(values[2], LiteralValue::Int(3));
    assert!(parsed.definitions.is_empty());
}

#[test]
fn document_missing_type_tag_is_rejected() {
    let document = json!({ "root": { "fields": [] } });
    let result = validate_schema_document(&document);
    assert!(matches!(result, Err(Error::Document(_))));
}

#[test]
fn builder_trees_serialize_with_type_tags() {
    let schema = Schema::array(Schema::string().min_length(2)).max_length(4);
    let value = serde_json::to_value(&schema).expect("serialize");
    assert_eq!(value["type"], "array");
    assert_eq!(value["element"]["type"], "string");
    assert_eq!(value["element"]["checks"][0]["check"], "min_length");
    assert_eq!(value["checks"][0]["value"], 4);

    let back: Schema = serde_json::from_value(value).expect("deserialize");
    assert!(back.same_type(&schema));
}

#[test]
fn json_schema_mentions_document_fields() {
    let root = schema_document_json_schema();
    let value = serde_json::to_value(&root).expect("serialize json schema");
    let properties = value["properties"].as_object().expect("properties");
    assert!(properties.contains_key("root"));
    assert!(properties.contains_key("definitions"));
}

#[test]
fn unresolved_lazy_reference_fails_validation() {
    let schema = Schema::object([("next", Schema::lazy("Node"))]);
    let result = validate_schema(&schema, &Definitions::new());
    assert!(matches!(result, Err(Error::UnresolvedDefinition(name)) if name == "Node"));

    let definitions = Definitions::new().with("Node", schema.clone());
    validate_schema(&schema, &definitions).expect("resolved");
}

#[test]
fn empty_union_and_duplicate_fields_are_invalid() {
    let empty = Schema::union(Vec::new());
    assert!(matches!(
        validate_schema(&empty, &Definitions::new()),
        Err(Error::InvalidSchema { .. })
    ));

    let duplicated = Schema::object([("a", Schema::string()), ("a", Schema::number())]);
    let err = validate_schema(&duplicated, &Definitions::new()).unwrap_err();
    assert!(err.to_string().contains("duplicate field name: a"));
}

#[test]
fn enum_members_must_be_text_or_numbers() {
    let schema = Schema::enumeration([LiteralValue::Bool(true)]);
    assert!(matches!(
        validate_schema(&schema, &Definitions::new()),
        Err(Error::InvalidSchema { .. })
    ));
}
