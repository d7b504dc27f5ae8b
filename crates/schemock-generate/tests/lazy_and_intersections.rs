use serde_json::json;

use schemock_core::{Definitions, Schema};
use schemock_generate::{GenerateOptions, GeneratedValue, GenerationError, MockGenerator, generate};

fn options(seed: u64) -> GenerateOptions {
    GenerateOptions::default().with_seed(seed)
}

fn json_value_definitions() -> Definitions {
    Definitions::new().with(
        "Json",
        Schema::union(vec![
            Schema::string(),
            Schema::number(),
            Schema::boolean(),
            Schema::null(),
            Schema::array(Schema::lazy("Json")),
            Schema::record(Schema::string(), Schema::lazy("Json")),
        ]),
    )
}

#[test]
fn unresolved_reference_is_an_error() {
    let schema = Schema::object([("child", Schema::lazy("Missing"))]);
    let err = generate(&schema, &options(1)).expect_err("unresolved");
    assert!(matches!(
        &err,
        GenerationError::UnresolvedReference { name, .. } if name == "Missing"
    ));
    assert_eq!(err.path(), Some("$.child"));
}

#[test]
fn non_container_recursion_cannot_terminate() {
    let definitions = Definitions::new().with(
        "Chain",
        Schema::tuple(vec![Schema::string(), Schema::lazy("Chain")]),
    );
    let err = MockGenerator::new(options(1))
        .with_definitions(definitions)
        .generate(&Schema::lazy("Chain"))
        .expect_err("unterminated");
    assert!(matches!(
        err,
        GenerationError::UnsupportedLazyTermination { ref found, .. } if found == "tuple"
    ));
}

#[test]
fn json_like_unions_collapse_to_empty_object() {
    let value = MockGenerator::new(options(1))
        .with_definitions(json_value_definitions())
        .generate(&Schema::object([("payload", Schema::lazy("Json"))]))
        .expect("generate");
    assert_eq!(value.to_json(), json!({"payload": {}}));
}

#[test]
fn recursive_trees_never_exceed_the_depth_limit() {
    let definitions = Definitions::new().with(
        "Tree",
        Schema::object([
            ("label", Schema::string()),
            ("children", Schema::array(Schema::lazy("Tree"))),
        ]),
    );
    fn depth(value: &GeneratedValue) -> usize {
        value
            .get("children")
            .and_then(GeneratedValue::as_array)
            .map_or(0, |children| 1 + children.iter().map(depth).max().unwrap_or(0))
    }

    for limit in [0, 1, 3] {
        let mut opts = options(limit as u64);
        opts.lazy_depth_limit = limit;
        let value = MockGenerator::new(opts)
            .with_definitions(definitions.clone())
            .generate(&Schema::lazy("Tree"))
            .expect("generate");
        if limit == 0 {
            assert_eq!(value.to_json(), json!({}));
        } else {
            assert!(depth(&value) <= limit, "limit {limit}: depth {}", depth(&value));
        }
    }
}

#[test]
fn object_intersection_merges_fields() {
    let base = Schema::object([("id", Schema::uuid()), ("name", Schema::string())]);
    let extra = Schema::object([
        ("name", Schema::string().min_length(4).max_length(4)),
        ("active", Schema::boolean()),
    ]);
    let value = generate(&base.and(extra), &options(2)).expect("generate");
    let GeneratedValue::Object(fields) = &value else {
        panic!("expected object");
    };
    let keys: Vec<&str> = fields.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["id", "name", "active"]);
    assert_eq!(value.get("name").and_then(GeneratedValue::len), Some(4));
}

#[test]
fn any_side_defers_and_formats_keep_checks() {
    let schema = Schema::any().and(Schema::int().min(3.0).max(3.0));
    assert_eq!(generate(&schema, &options(1)).expect("generate"), GeneratedValue::Int(3));

    let email = Schema::string().and(Schema::email());
    let value = generate(&email, &options(1)).expect("generate");
    assert!(value.as_str().expect("text").contains('@'));
}

#[test]
fn union_intersections_pick_compatible_branches() {
    let schema = Schema::union(vec![Schema::string(), Schema::boolean()])
        .and(Schema::union(vec![Schema::boolean(), Schema::number()]));
    for seed in 0..10 {
        let value = generate(&schema, &options(seed)).expect("generate");
        assert!(matches!(value, GeneratedValue::Bool(_)));
    }

    let impossible = Schema::union(vec![Schema::string()]).and(Schema::number());
    assert!(matches!(
        generate(&impossible, &options(1)),
        Err(GenerationError::IncompatibleTypes { .. })
    ));
}

#[test]
fn union_branches_fall_back_to_value_merging() {
    let schema = Schema::union(vec![
        Schema::record(Schema::string(), Schema::int()),
        Schema::boolean(),
    ])
    .and(Schema::object([("userId", Schema::literal(7))]));
    for seed in 0..10 {
        let value = generate(&schema, &options(seed)).expect("generate");
        assert!(matches!(value, GeneratedValue::Object(_)));
        assert_eq!(value.get("userId"), Some(&GeneratedValue::Int(7)));
    }
}

#[test]
fn maps_and_sets_need_identical_element_types() {
    let schema = Schema::map(Schema::string(), Schema::int())
        .and(Schema::map(Schema::string(), Schema::string()));
    assert!(matches!(
        generate(&schema, &options(1)),
        Err(GenerationError::IncompatibleIntersection { .. })
    ));

    let same = Schema::set(Schema::boolean()).max_size(2).and(Schema::set(Schema::boolean()));
    let value = generate(&same, &options(1)).expect("generate");
    assert!(matches!(value, GeneratedValue::Set(items) if items.len() <= 2));
}

#[test]
fn lazy_operands_merge_generated_values() {
    let definitions = Definitions::new().with(
        "Named",
        Schema::object([("name", Schema::literal("ada"))]),
    );
    let schema = Schema::lazy("Named").and(Schema::object([("age", Schema::literal(36))]));
    let value = MockGenerator::new(options(1))
        .with_definitions(definitions)
        .generate(&schema)
        .expect("generate");
    assert_eq!(value.to_json(), json!({"name": "ada", "age": 36}));
}
