use std::collections::BTreeMap;

use schemock_core::{DEFAULT_CONSISTENCY_KEY, Definitions, Schema, SchemaRegistry};
use schemock_generate::{GenerateOptions, GeneratedValue, MockGenerator, multi_generate};

fn consistent_options(seed: u64) -> GenerateOptions {
    GenerateOptions::default()
        .with_seed(seed)
        .with_consistency_key(DEFAULT_CONSISTENCY_KEY)
}

#[test]
fn multi_generate_shares_values_across_entries() {
    let user_id = Schema::uuid().with_meta(DEFAULT_CONSISTENCY_KEY, "UserId");
    let mut schemas = BTreeMap::new();
    schemas.insert("account".to_string(), Schema::object([("owner", user_id.clone())]));
    schemas.insert("user".to_string(), Schema::object([("id", user_id)]));

    let values = multi_generate(&schemas, &consistent_options(11)).expect("generate");
    let owner = values["account"].get("owner").expect("owner");
    let id = values["user"].get("id").expect("id");
    assert_eq!(owner, id);
}

#[test]
fn consistency_is_off_without_a_key() {
    let user_id = Schema::uuid().with_meta(DEFAULT_CONSISTENCY_KEY, "UserId");
    let schema = Schema::object([("a", user_id.clone()), ("b", user_id)]);
    let result = MockGenerator::new(GenerateOptions::default().with_seed(2))
        .generate_with_report(&schema)
        .expect("generate");
    assert_ne!(result.value.get("a"), result.value.get("b"));
    assert_eq!(result.report.replay_count, 0);
}

#[test]
fn explicit_registry_links_unrelated_nodes() {
    let left = Schema::int().min(0.0).max(1_000_000.0);
    let right = Schema::int().min(0.0).max(1_000_000.0);
    let mut registry = SchemaRegistry::new();
    registry.insert(&left, "Shared").insert(&right, "Shared");
    let schema = Schema::object([("left", left), ("right", right)]);

    let value = MockGenerator::new(consistent_options(5))
        .with_registry(registry)
        .generate(&schema)
        .expect("generate");
    assert_eq!(value.get("left"), value.get("right"));
}

#[test]
fn deeper_occurrences_replay_the_outer_slot() {
    // Pinned at depth 0 by the first occurrence, so every element of the
    // array sees the same value.
    let tenant = Schema::uuid().with_meta(DEFAULT_CONSISTENCY_KEY, "Tenant");
    let schema = Schema::object([
        ("tenant", tenant.clone()),
        ("members", Schema::array(Schema::object([("tenant", tenant)])).length(3)),
    ]);
    let value = MockGenerator::new(consistent_options(8))
        .generate(&schema)
        .expect("generate");

    let tenant = value.get("tenant").expect("tenant");
    let members = value.get("members").and_then(GeneratedValue::as_array).expect("members");
    assert_eq!(members.len(), 3);
    for member in members {
        assert_eq!(member.get("tenant"), Some(tenant));
    }
}

#[test]
fn definitions_participate_in_consistency() {
    let definitions = Definitions::new().with(
        "Owner",
        Schema::object([(
            "id",
            Schema::uuid().with_meta(DEFAULT_CONSISTENCY_KEY, "OwnerId"),
        )]),
    );
    let schema = Schema::object([("first", Schema::lazy("Owner")), ("second", Schema::lazy("Owner"))]);
    let value = MockGenerator::new(consistent_options(4))
        .with_definitions(definitions)
        .generate(&schema)
        .expect("generate");

    let first = value.get("first").and_then(|owner| owner.get("id"));
    let second = value.get("second").and_then(|owner| owner.get("id"));
    assert!(first.is_some());
    assert_eq!(first, second);
}
