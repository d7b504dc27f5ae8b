use serde_json::json;
use sha2::{Digest, Sha256};

use schemock_core::{Schema, validate_schema_document};
use schemock_generate::{
    GenerateOptions, GenerationError, LocaleKey, MockGenerator, SizeBounds, generate,
};

fn digest(value: &serde_json::Value) -> String {
    let bytes = serde_json::to_vec(value).expect("serialize");
    hex::encode(Sha256::digest(&bytes))
}

fn catalog_schema() -> Schema {
    Schema::object([
        ("id", Schema::uuid()),
        ("email", Schema::email()),
        ("name", Schema::string().min_length(5).max_length(20)),
        ("score", Schema::number().min(0.0).max(1.0)),
        ("tags", Schema::array(Schema::enumeration(["a", "b", "c"])).max_length(4)),
        ("createdAt", Schema::date()),
        ("nickname", Schema::string().optional()),
    ])
}

#[test]
fn same_seed_produces_identical_output() {
    let options = GenerateOptions::default().with_seed(42);
    let first = generate(&catalog_schema(), &options).expect("generate");
    let second = generate(&catalog_schema(), &options).expect("generate");
    assert_eq!(digest(&first.to_json()), digest(&second.to_json()));

    let other = generate(&catalog_schema(), &GenerateOptions::default().with_seed(43))
        .expect("generate");
    assert_ne!(digest(&first.to_json()), digest(&other.to_json()));
}

#[test]
fn reports_are_reproducible() {
    let generator = MockGenerator::new(GenerateOptions::default().with_seed(7));
    let first = generator.generate_with_report(&catalog_schema()).expect("generate");
    let second = generator.generate_with_report(&catalog_schema()).expect("generate");
    assert_eq!(first.report, second.report);
    assert_eq!(first.report.seed, 7);
    assert_eq!(first.report.generator_usage.get("object"), Some(&1));
    assert_eq!(first.report.generator_usage.get("format.uuid"), Some(&1));
}

#[test]
fn options_load_from_toml() {
    let options = GenerateOptions::from_toml_str(
        r#"
seed = 99
locale = "pt_BR"
optional_probability = 0.0
consistency_key = "consistent"

[array]
min = 2
max = 2
"#,
    )
    .expect("options");
    assert_eq!(options.seed, Some(99));
    assert_eq!(options.locale_key().expect("locale"), LocaleKey::PtBr);
    assert_eq!(options.array, SizeBounds::new(2, 2));
    assert_eq!(options.map, SizeBounds::default());
    assert_eq!(options.lazy_depth_limit, 5);

    let value = generate(&Schema::array(Schema::string()), &options).expect("generate");
    assert_eq!(value.as_array().map(<[_]>::len), Some(2));
}

#[test]
fn options_load_from_json() {
    let options = GenerateOptions::from_json_value(&json!({"seed": 1, "strict": true}))
        .expect("options");
    assert!(options.strict);
    assert_eq!(options.locale, "en_US");
}

#[test]
fn invalid_options_are_rejected() {
    let result = GenerateOptions::from_toml_str("nullable_probability = 1.5");
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));

    let result = GenerateOptions::from_json_value(&json!({"locale": "fr_FR"}));
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));

    let result = GenerateOptions::from_json_value(&json!({"set": {"min": 4, "max": 1}}));
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));

    let result = GenerateOptions::from_toml_str("seed = \"nope\"");
    assert!(matches!(result, Err(GenerationError::Toml(_))));

    let mut options = GenerateOptions::default();
    options.consistency_key = Some("  ".to_string());
    let result = MockGenerator::new(options).generate(&Schema::string());
    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
}

#[test]
fn schema_documents_drive_generation() {
    let document = validate_schema_document(&json!({
        "root": {
            "type": "object",
            "fields": [
                {"name": "id", "schema": {"type": "format", "format": "uuid"}},
                {"name": "count", "schema": {
                    "type": "number",
                    "checks": [
                        {"check": "number_format", "format": "safe_int"},
                        {"check": "greater_than", "value": 10, "inclusive": true},
                        {"check": "less_than", "value": 20, "inclusive": true}
                    ]
                }},
                {"name": "next", "schema": {"type": "lazy", "reference": "Node"}}
            ]
        },
        "definitions": {
            "Node": {"type": "object", "fields": [
                {"name": "next", "schema": {"type": "lazy", "reference": "Node"}}
            ]}
        }
    }))
    .expect("valid document");

    let value = MockGenerator::new(GenerateOptions::default().with_seed(1))
        .with_definitions(document.definitions.clone())
        .generate(&document.root)
        .expect("generate");
    let count = value.get("count").and_then(|count| count.as_i64()).expect("count");
    assert!((10..=20).contains(&count));
    assert!(value.get("next").is_some());
}
