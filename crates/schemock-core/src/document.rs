use jsonschema::JSONSchema;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definitions::Definitions;
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::validation::validate_schema;

/// Serialized form of a schema tree plus the definitions its lazy nodes use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    pub root: Schema,
    #[serde(default)]
    pub definitions: Definitions,
}

/// Emit the JSON Schema of the schema document format.
pub fn schema_document_json_schema() -> RootSchema {
    schema_for!(SchemaDocument)
}

/// Validate a raw JSON document, then parse and structurally check it.
pub fn validate_schema_document(document: &Value) -> Result<SchemaDocument> {
    let json_schema = serde_json::to_value(schema_document_json_schema())?;
    let compiled =
        JSONSchema::compile(&json_schema).map_err(|err| Error::Document(err.to_string()))?;

    if let Err(errors) = compiled.validate(document) {
        let messages: Vec<String> = errors
            .map(|error| format!("{}: {}", pointer_or_root(&error.instance_path.to_string()), error))
            .collect();
        return Err(Error::Document(messages.join("; ")));
    }

    let parsed: SchemaDocument = serde_json::from_value(document.clone())?;
    validate_schema(&parsed.root, &parsed.definitions)?;
    Ok(parsed)
}

fn pointer_or_root(pointer: &str) -> &str {
    if pointer.is_empty() { "/" } else { pointer }
}
