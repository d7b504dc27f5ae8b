use std::env;
use std::path::PathBuf;

use schemock_core::validate_schema_document;
use schemock_generate::{GenerateOptions, LogFormat, MockGenerator, init_logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Text)?;

    let mut args = env::args().skip(1);
    let mut schema_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut count = 1_usize;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next().map(PathBuf::from),
            "--count" => {
                count = args
                    .next()
                    .ok_or("missing --count value")?
                    .parse()?;
            }
            _ => {
                if schema_path.is_none() {
                    schema_path = Some(PathBuf::from(arg));
                } else {
                    return Err("unexpected argument".into());
                }
            }
        }
    }

    let schema_path = schema_path.ok_or("missing schema document path")?;
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&schema_path)?)?;
    let document = validate_schema_document(&raw)?;

    let options = match config_path {
        Some(path) => GenerateOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => GenerateOptions::default(),
    };
    let base_seed = options.seed.unwrap_or(0);

    for index in 0..count {
        let generator = MockGenerator::new(options.clone().with_seed(base_seed + index as u64))
            .with_definitions(document.definitions.clone());
        let value = generator.generate(&document.root)?;
        println!("{}", serde_json::to_string_pretty(&value.to_json())?);
    }
    Ok(())
}
