use chrono::{TimeZone, Utc};
use regex::Regex;

use schemock_core::{NumberFormat, Schema};
use schemock_generate::{GenerateOptions, GeneratedValue, GenerationError, SizeBounds, generate};

fn options(seed: u64) -> GenerateOptions {
    GenerateOptions::default().with_seed(seed)
}

#[test]
fn string_length_and_affixes_are_honored() {
    let schema = Schema::string()
        .min_length(12)
        .max_length(16)
        .starts_with("usr_")
        .ends_with("!");
    for seed in 0..25 {
        let value = generate(&schema, &options(seed)).expect("generate");
        let text = value.as_str().expect("text");
        let len = text.chars().count();
        assert!((12..=16).contains(&len), "seed {seed}: {text:?}");
        assert!(text.starts_with("usr_") && text.ends_with('!'));
    }
}

#[test]
fn numbers_stay_inside_bounds() {
    let exclusive = Schema::number().gt(0.0).lt(1.0);
    let multiple = Schema::int().min(1.0).max(100.0).multiple_of(7.0);
    let uint = Schema::number().number_format(NumberFormat::Uint32).max(3.0);
    for seed in 0..25 {
        let value = generate(&exclusive, &options(seed)).expect("generate");
        let float = value.as_f64().expect("number");
        assert!(float > 0.0 && float < 1.0, "seed {seed}: {float}");

        let value = generate(&multiple, &options(seed)).expect("generate");
        let int = value.as_i64().expect("int");
        assert!((7..=98).contains(&int) && int % 7 == 0, "seed {seed}: {int}");

        let value = generate(&uint, &options(seed)).expect("generate");
        assert!((0..=3).contains(&value.as_i64().expect("int")));
    }
}

#[test]
fn big_ints_and_dates_respect_bounds() {
    let big = Schema::big_int().big_min(i128::from(u64::MAX)).big_max(i128::from(u64::MAX) + 10);
    let start = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2030, 1, 31, 0, 0, 0).unwrap();
    let date = Schema::date().min_date(start).max_date(end);
    for seed in 0..10 {
        let value = generate(&big, &options(seed)).expect("generate");
        let GeneratedValue::BigInt(number) = value else {
            panic!("expected big int, got {}", value.type_name());
        };
        assert!(number >= i128::from(u64::MAX) && number <= i128::from(u64::MAX) + 10);

        let value = generate(&date, &options(seed)).expect("generate");
        let instant = value.as_date().expect("date");
        assert!(instant >= start && instant <= end);
    }
}

#[test]
fn conflicting_bounds_report_the_path() {
    let schema = Schema::object([("name", Schema::string().min_length(10).max_length(5))]);
    let err = generate(&schema, &options(1)).expect_err("conflict");
    assert!(matches!(err, GenerationError::ConstraintConflict { .. }));
    assert_eq!(err.path(), Some("$.name"));

    let merged = Schema::number().min(10.0).and(Schema::number().max(5.0));
    assert!(matches!(
        generate(&merged, &options(1)),
        Err(GenerationError::ConstraintConflict { .. })
    ));
}

#[test]
fn affixes_longer_than_max_conflict() {
    let schema = Schema::string().max_length(3).starts_with("prefix");
    assert!(matches!(
        generate(&schema, &options(2)),
        Err(GenerationError::ConstraintConflict { .. })
    ));
}

#[test]
fn formats_produce_recognizable_values() {
    let schema = Schema::object([
        ("email", Schema::email()),
        ("url", Schema::url()),
        ("v7", Schema::format(schemock_core::StringFormat::UuidV7)),
        ("phone", Schema::format(schemock_core::StringFormat::E164)),
        ("code", Schema::string().regex("^[A-Z]{3}-[0-9]{4}$")),
    ]);
    let value = generate(&schema, &options(4)).expect("generate");

    let email = value.get("email").and_then(GeneratedValue::as_str).expect("email");
    assert!(email.contains('@'));
    let url = value.get("url").and_then(GeneratedValue::as_str).expect("url");
    assert!(url.starts_with("https://"));
    let v7 = value.get("v7").and_then(GeneratedValue::as_str).expect("v7");
    assert_eq!(uuid::Uuid::parse_str(v7).expect("uuid").get_version_num(), 7);
    let phone = value.get("phone").and_then(GeneratedValue::as_str).expect("phone");
    assert!(Regex::new(r"^\+[1-9][0-9]{6,14}$").unwrap().is_match(phone));
    let code = value.get("code").and_then(GeneratedValue::as_str).expect("code");
    assert!(Regex::new(r"^[A-Z]{3}-[0-9]{4}$").unwrap().is_match(code));
}

#[test]
fn invalid_pattern_is_an_error() {
    let schema = Schema::string().regex("[a-");
    assert!(matches!(
        generate(&schema, &options(1)),
        Err(GenerationError::InvalidPattern { .. })
    ));
}

#[test]
fn containers_match_declared_shapes() {
    let mut opts = options(5);
    opts.map = SizeBounds::new(2, 2);
    let schema = Schema::object([
        ("pair", Schema::tuple(vec![Schema::string(), Schema::boolean()])),
        (
            "rest",
            Schema::tuple_with_rest(vec![Schema::int()], Schema::string()),
        ),
        ("tags", Schema::set(Schema::int().min(0.0).max(10_000.0)).size(3)),
        ("lookup", Schema::map(Schema::uuid(), Schema::int())),
    ]);
    let value = generate(&schema, &opts).expect("generate");

    let pair = value.get("pair").and_then(GeneratedValue::as_array).expect("pair");
    assert_eq!(pair.len(), 2);
    assert!(matches!(pair[1], GeneratedValue::Bool(_)));

    let rest = value.get("rest").and_then(GeneratedValue::as_array).expect("rest");
    assert!(rest.len() >= 2);
    assert!(rest[1..].iter().all(|item| item.as_str().is_some()));

    let Some(GeneratedValue::Set(tags)) = value.get("tags") else {
        panic!("expected set");
    };
    assert_eq!(tags.len(), 3);

    let Some(GeneratedValue::Map(lookup)) = value.get("lookup") else {
        panic!("expected map");
    };
    assert_eq!(lookup.len(), 2);
}

#[test]
fn records_use_enum_keys_exhaustively() {
    let schema = Schema::record(Schema::enumeration(["low", "mid", "high"]), Schema::int());
    let value = generate(&schema, &options(6)).expect("generate");
    let GeneratedValue::Object(fields) = value else {
        panic!("expected object");
    };
    let keys: Vec<&str> = fields.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, ["low", "mid", "high"]);
}

#[test]
fn record_keys_must_be_key_like() {
    let schema = Schema::record(Schema::boolean(), Schema::string());
    let err = generate(&schema, &options(1)).expect_err("invalid key");
    assert!(matches!(
        &err,
        GenerationError::InvalidKeyType { found, .. } if found == "boolean"
    ));

    let numeric = Schema::record(Schema::int().min(0.0).max(1_000_000.0), Schema::boolean());
    let value = generate(&numeric, &options(1)).expect("generate");
    let GeneratedValue::Object(fields) = value else {
        panic!("expected object");
    };
    assert!(fields.iter().all(|(key, _)| key.parse::<i64>().is_ok()));
}

#[test]
fn template_literal_concatenates_parts() {
    let schema = Schema::template_literal(vec![
        "user-".into(),
        Schema::int().min(1.0).max(9.0).into(),
        "@".into(),
        Schema::literal("example.com").into(),
    ]);
    let value = generate(&schema, &options(8)).expect("generate");
    let text = value.as_str().expect("text");
    assert!(Regex::new(r"^user-[1-9]@example\.com$").unwrap().is_match(text));
}

#[test]
fn wrappers_follow_configured_probabilities() {
    let mut always = options(1);
    always.optional_probability = 1.0;
    always.nullable_probability = 1.0;
    always.default_probability = 1.0;
    let schema = Schema::object([
        ("maybe", Schema::string().optional()),
        ("exact", Schema::string().exact_optional()),
        ("nothing", Schema::string().nullable()),
        ("fallback", Schema::int().default_value(42)),
    ]);
    let value = generate(&schema, &always).expect("generate");
    assert_eq!(value.get("maybe"), Some(&GeneratedValue::Undefined));
    assert_eq!(value.get("exact"), None);
    assert_eq!(value.get("nothing"), Some(&GeneratedValue::Null));
    assert_eq!(value.get("fallback"), Some(&GeneratedValue::Int(42)));
    assert_eq!(
        value.to_json(),
        serde_json::json!({"nothing": null, "fallback": 42})
    );

    let mut never = options(1);
    never.optional_probability = 0.0;
    never.nullable_probability = 0.0;
    never.default_probability = 0.0;
    let value = generate(&schema, &never).expect("generate");
    assert!(value.get("maybe").and_then(GeneratedValue::as_str).is_some());
    assert!(value.get("exact").and_then(GeneratedValue::as_str).is_some());
    assert!(value.get("fallback").and_then(GeneratedValue::as_i64).is_some());
}

#[test]
fn non_optional_strips_optional_wrappers() {
    let mut opts = options(2);
    opts.optional_probability = 1.0;
    let schema = Schema::string().optional().non_optional();
    let value = generate(&schema, &opts).expect("generate");
    assert!(value.as_str().is_some());
}

#[test]
fn exact_optional_array_items_are_never_holes() {
    let mut opts = options(3);
    opts.optional_probability = 1.0;
    let schema = Schema::array(Schema::int().exact_optional()).length(4);
    let value = generate(&schema, &opts).expect("generate");
    let items = value.as_array().expect("array");
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|item| item.as_i64().is_some()));
}

#[test]
fn exact_optional_items_behind_other_wrappers_are_generated() {
    let mut opts = options(4);
    opts.optional_probability = 1.0;
    opts.nullable_probability = 0.0;
    opts.default_probability = 0.0;
    let element = Schema::string().exact_optional();
    let wrapped = [
        element.nullable(),
        element.default_value("fallback"),
        element.catch("caught"),
        Schema::union(vec![element.clone(), element.readonly()]),
    ];
    for schema in wrapped {
        let value = generate(&Schema::array(schema).length(3), &opts).expect("generate");
        let items = value.as_array().expect("array");
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.as_str().is_some()), "{items:?}");
    }

    let set = Schema::set(Schema::int().exact_optional().nullable()).size(2);
    let value = generate(&set, &opts).expect("generate");
    assert!(matches!(value, GeneratedValue::Set(ref items)
        if items.iter().all(|item| item.as_i64().is_some())));
}

#[test]
fn object_fields_inside_array_items_still_drop() {
    let mut opts = options(5);
    opts.optional_probability = 1.0;
    let schema = Schema::array(Schema::object([
        ("id", Schema::int()),
        ("nickname", Schema::string().exact_optional()),
    ]))
    .length(2);
    let value = generate(&schema, &opts).expect("generate");
    for item in value.as_array().expect("array") {
        assert!(item.get("id").is_some());
        assert_eq!(item.get("nickname"), None);
    }
}

#[test]
fn integer_multiples_of_fractional_steps() {
    let schema = Schema::int().min(0.0).max(10.0).multiple_of(2.5);
    for seed in 0..40 {
        let value = generate(&schema, &options(seed)).expect("generate");
        let int = value.as_i64().expect("int");
        assert!([0, 5, 10].contains(&int), "seed {seed}: {int}");
    }

    let none = Schema::int().min(1.0).max(4.0).multiple_of(2.5);
    assert!(matches!(
        generate(&none, &options(1)),
        Err(GenerationError::ConstraintConflict { .. })
    ));
}

#[test]
fn non_finite_number_bounds_conflict() {
    for schema in [
        Schema::number().min(f64::NAN),
        Schema::number().max(f64::INFINITY),
        Schema::int().gt(f64::NAN),
    ] {
        assert!(matches!(
            generate(&schema, &options(1)),
            Err(GenerationError::ConstraintConflict { .. })
        ));
    }
}

#[test]
fn catch_replaces_undefined() {
    let schema = Schema::undefined().catch("recovered");
    let value = generate(&schema, &options(1)).expect("generate");
    assert_eq!(value.as_str(), Some("recovered"));
}
