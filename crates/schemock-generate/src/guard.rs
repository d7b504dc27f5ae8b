//! Recursion guard for lazy (self-referential) definitions.

use std::collections::HashSet;

use schemock_core::{Definitions, Schema, SchemaKind};

use crate::value::GeneratedValue;

/// Minimum option count for a union to be treated as a JSON-like value.
const JSON_LIKE_MIN_OPTIONS: usize = 4;

/// Whether `schema` is a recursive JSON-value union: enough options, each a
/// primitive or an array/record whose element is lazy, with at least one
/// such recursive branch.
pub fn is_json_like(schema: &Schema) -> bool {
    let SchemaKind::Union { options } = schema.kind() else {
        return false;
    };
    if options.len() < JSON_LIKE_MIN_OPTIONS {
        return false;
    }

    let mut recursive = false;
    for option in options {
        match option.kind() {
            SchemaKind::Array { element } if is_lazy(element) => recursive = true,
            SchemaKind::Record { value, .. } if is_lazy(value) => recursive = true,
            kind if kind.is_primitive() => {}
            _ => return false,
        }
    }
    recursive
}

fn is_lazy(schema: &Schema) -> bool {
    matches!(schema.kind(), SchemaKind::Lazy { .. })
}

/// Empty value that ends recursion for the shape of `schema`, looking
/// through wrappers and further lazy references.
pub fn terminal_value(schema: &Schema, definitions: &Definitions) -> Option<GeneratedValue> {
    let mut visited = HashSet::new();
    let mut current = schema;
    loop {
        match current.kind() {
            SchemaKind::Object { .. } | SchemaKind::Record { .. } => {
                return Some(GeneratedValue::Object(Vec::new()));
            }
            SchemaKind::Array { .. } => return Some(GeneratedValue::Array(Vec::new())),
            SchemaKind::Map { .. } => return Some(GeneratedValue::Map(Vec::new())),
            SchemaKind::Set { .. } => return Some(GeneratedValue::Set(Vec::new())),
            SchemaKind::Optional { inner }
            | SchemaKind::ExactOptional { inner }
            | SchemaKind::Nullable { inner }
            | SchemaKind::Readonly { inner }
            | SchemaKind::NonOptional { inner }
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Prefault { inner, .. }
            | SchemaKind::Catch { inner, .. }
            | SchemaKind::Success { inner } => current = inner,
            SchemaKind::Lazy { reference } => {
                if !visited.insert(reference.as_str()) {
                    return None;
                }
                current = definitions.get(reference)?;
            }
            _ => return None,
        }
    }
}
