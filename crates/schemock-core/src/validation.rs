use std::collections::HashSet;

use crate::definitions::Definitions;
use crate::error::{Error, Result};
use crate::schema::{LiteralValue, Schema, SchemaKind, TemplatePart};

/// Validate structural invariants of a schema tree and its definitions.
///
/// This checks:
/// - unions, discriminated unions, enums, and literals are non-empty
/// - enum members are strings or numbers
/// - definition names, lazy references, transform ids, and discriminators are non-empty
/// - every lazy reference resolves to a definition
/// - object field names are unique
pub fn validate_schema(schema: &Schema, definitions: &Definitions) -> Result<()> {
    for (name, body) in definitions.iter() {
        if name.trim().is_empty() {
            return Err(Error::invalid("$defs", "definition name is empty"));
        }
        validate_node(body, definitions, &format!("$defs.{name}"))?;
    }
    validate_node(schema, definitions, "$")
}

fn validate_node(schema: &Schema, definitions: &Definitions, path: &str) -> Result<()> {
    match schema.kind() {
        SchemaKind::Literal { values } if values.is_empty() => {
            return Err(Error::invalid(path, "literal has no values"));
        }
        SchemaKind::Enum { values } => {
            if values.is_empty() {
                return Err(Error::invalid(path, "enum has no values"));
            }
            if let Some(value) = values
                .iter()
                .find(|value| !matches!(value, LiteralValue::Text(_)) && !value.is_numeric())
            {
                return Err(Error::invalid(
                    path,
                    format!("enum member `{value}` is not a string or number"),
                ));
            }
        }
        SchemaKind::Union { options } if options.is_empty() => {
            return Err(Error::invalid(path, "union has no options"));
        }
        SchemaKind::DiscriminatedUnion {
            discriminator,
            options,
        } => {
            if options.is_empty() {
                return Err(Error::invalid(path, "discriminated union has no options"));
            }
            if discriminator.trim().is_empty() {
                return Err(Error::invalid(path, "discriminator is empty"));
            }
        }
        SchemaKind::Lazy { reference } => {
            if reference.trim().is_empty() {
                return Err(Error::invalid(path, "lazy reference is empty"));
            }
            if !definitions.contains(reference) {
                return Err(Error::UnresolvedDefinition(reference.clone()));
            }
        }
        SchemaKind::Transform { id } if id.trim().is_empty() => {
            return Err(Error::invalid(path, "transform id is empty"));
        }
        SchemaKind::Object { fields } => {
            let mut names = HashSet::new();
            for field in fields {
                if !names.insert(field.name.as_str()) {
                    return Err(Error::invalid(
                        path,
                        format!("duplicate field name: {}", field.name),
                    ));
                }
                validate_node(&field.schema, definitions, &format!("{path}.{}", field.name))?;
            }
            return Ok(());
        }
        SchemaKind::TemplateLiteral { parts } => {
            for (index, part) in parts.iter().enumerate() {
                if let TemplatePart::Schema(child) = part {
                    validate_node(child, definitions, &format!("{path}[{index}]"))?;
                }
            }
            return Ok(());
        }
        _ => {}
    }

    for (index, child) in schema.children().into_iter().enumerate() {
        validate_node(child, definitions, &format!("{path}<{index}>"))?;
    }
    Ok(())
}
