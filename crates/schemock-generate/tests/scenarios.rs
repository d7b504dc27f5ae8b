use serde_json::json;

use schemock_core::{DEFAULT_CONSISTENCY_KEY, Definitions, Schema};
use schemock_generate::{GenerateOptions, GeneratedValue, GenerationError, MockGenerator, generate};

#[test]
fn object_with_uuid_and_bounded_int() {
    let schema = Schema::object([
        ("id", Schema::uuid()),
        ("count", Schema::int().min(10.0).max(20.0)),
    ]);
    let value = generate(&schema, &GenerateOptions::default().with_seed(1)).expect("generate");

    let id = value.get("id").and_then(GeneratedValue::as_str).expect("id");
    assert!(uuid::Uuid::parse_str(id).is_ok());
    let count = value.get("count").and_then(GeneratedValue::as_i64).expect("count");
    assert!((10..=20).contains(&count), "count {count} out of range");
}

#[test]
fn array_length_follows_declared_bounds() {
    let schema = Schema::array(Schema::string()).min_length(3).max_length(5);
    for seed in 0..20 {
        let value = generate(&schema, &GenerateOptions::default().with_seed(seed))
            .expect("generate");
        let len = value.as_array().expect("array").len();
        assert!((3..=5).contains(&len), "seed {seed}: length {len}");
    }
}

#[test]
fn disjoint_enums_have_empty_intersection() {
    let schema = Schema::enumeration(["a", "b"]).and(Schema::enumeration(["c", "d"]));
    let result = generate(&schema, &GenerateOptions::default().with_seed(1));
    assert!(matches!(
        result,
        Err(GenerationError::EmptyIntersection { .. })
    ));
}

#[test]
fn consistent_ids_match_per_element() {
    let user_id = Schema::uuid().with_meta(DEFAULT_CONSISTENCY_KEY, "UserId");
    let schema = Schema::array(Schema::object([
        ("userId", user_id.clone()),
        ("user", Schema::object([("id", user_id)])),
    ]))
    .length(4);
    let options = GenerateOptions::default()
        .with_seed(9)
        .with_consistency_key(DEFAULT_CONSISTENCY_KEY);

    let result = MockGenerator::new(options)
        .generate_with_report(&schema)
        .expect("generate");
    let items = result.value.as_array().expect("array");
    assert_eq!(items.len(), 4);

    let mut seen = Vec::new();
    for item in items {
        let outer = item.get("userId").expect("userId");
        let inner = item.get("user").and_then(|user| user.get("id")).expect("user.id");
        assert_eq!(outer, inner);
        seen.push(outer.clone());
    }
    seen.dedup();
    assert_eq!(seen.len(), 4, "elements should not share ids");
    assert_eq!(result.report.replay_count, 4);
}

#[test]
fn self_referential_object_terminates_at_depth_limit() {
    let definitions = Definitions::new().with(
        "Node",
        Schema::object([("outer", Schema::lazy("Node"))]),
    );
    let mut options = GenerateOptions::default().with_seed(3);
    options.lazy_depth_limit = 2;

    let result = MockGenerator::new(options)
        .with_definitions(definitions)
        .generate_with_report(&Schema::lazy("Node"))
        .expect("generate");

    assert_eq!(result.value.to_json(), json!({"outer": {"outer": {}}}));
    assert_eq!(result.report.lazy_terminations, 1);
}
