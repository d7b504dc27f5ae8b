use schemock_core::{Field, LiteralValue, Schema, SchemaKind, TemplatePart};
use serde_json::Value;
use tracing::debug;

use crate::constraints::{Bounds, container_size, length_bounds, size_bounds};
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::generators::{apply_transform, generate_item, generate_slot, generate_value};
use crate::guard;
use crate::model::SizeBounds;
use crate::value::{GeneratedValue, Slot, upsert_field};

/// Extra attempts per entry when de-duplicating keys and set items.
const MAX_DUPLICATE_RETRIES: usize = 10;

fn pick_len(
    ctx: &mut GenerationContext<'_>,
    explicit: Bounds<usize>,
    config: SizeBounds,
    cursor: &Cursor,
) -> Result<usize, GenerationError> {
    let (min, max) =
        container_size(explicit, config).map_err(|conflict| conflict.at(&cursor.path))?;
    Ok(ctx.provider.int(min as i64, max as i64) as usize)
}

pub(crate) fn array(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    element: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let config = ctx.options.array;
    let len = pick_len(ctx, length_bounds(schema.checks()), config, cursor)?;
    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        items.push(generate_item(ctx, element, &cursor.index(index))?);
    }
    Ok(GeneratedValue::Array(items))
}

pub(crate) fn tuple(
    ctx: &mut GenerationContext<'_>,
    items: &[Schema],
    rest: Option<&Schema>,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        values.push(generate_item(ctx, item, &cursor.index(index))?);
    }
    if let Some(rest) = rest {
        let config = ctx.options.array;
        let extra = pick_len(ctx, Bounds::default(), config, cursor)?;
        for offset in 0..extra {
            let index = items.len() + offset;
            values.push(generate_item(ctx, rest, &cursor.index(index))?);
        }
    }
    Ok(GeneratedValue::Array(values))
}

pub(crate) fn object(
    ctx: &mut GenerationContext<'_>,
    fields: &[Field],
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        match generate_slot(ctx, &field.schema, &cursor.field(&field.name))? {
            Slot::Omit => {}
            slot => upsert_field(&mut values, &field.name, slot.into_value()),
        }
    }
    Ok(GeneratedValue::Object(values))
}

pub(crate) fn record(
    ctx: &mut GenerationContext<'_>,
    key: &Schema,
    value: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let shape = key_shape(ctx, key);
    if let SchemaKind::Literal { values } | SchemaKind::Enum { values } = shape.kind() {
        return exhaustive_record(ctx, values, value, cursor);
    }
    reject_key_kind(shape.kind(), cursor)?;

    let config = ctx.options.record;
    let len = pick_len(ctx, Bounds::default(), config, cursor)?;
    let mut fields: Vec<(String, GeneratedValue)> = Vec::with_capacity(len);
    let mut attempts = 0;
    while fields.len() < len && attempts < len * MAX_DUPLICATE_RETRIES {
        attempts += 1;
        let index = fields.len();
        let generated_key = generate_item(ctx, key, &cursor.key(index))?;
        let name = record_key(&generated_key, cursor)?;
        if fields.iter().any(|(existing, _)| *existing == name) {
            continue;
        }
        let item = generate_item(ctx, value, &cursor.index(index))?;
        fields.push((name, item));
    }
    if fields.len() < len {
        ctx.warn(
            "duplicate_keys",
            format!("record produced {} of {len} unique keys", fields.len()),
            cursor,
        );
    }
    Ok(GeneratedValue::Object(fields))
}

/// One entry per allowed key, in declaration order.
fn exhaustive_record(
    ctx: &mut GenerationContext<'_>,
    keys: &[LiteralValue],
    value: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let mut fields = Vec::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        let name = record_key(&GeneratedValue::from(key), cursor)?;
        let item = generate_item(ctx, value, &cursor.index(index))?;
        upsert_field(&mut fields, &name, item);
    }
    Ok(GeneratedValue::Object(fields))
}

/// Key schema with wrappers and lazy references looked through.
fn key_shape(ctx: &GenerationContext<'_>, key: &Schema) -> Schema {
    let mut current = key.clone();
    for _ in 0..16 {
        let next = match current.kind() {
            SchemaKind::Readonly { inner }
            | SchemaKind::NonOptional { inner }
            | SchemaKind::Success { inner } => inner.clone(),
            SchemaKind::Lazy { reference } => match ctx.definitions.get(reference) {
                Some(target) => target.clone(),
                None => break,
            },
            _ => break,
        };
        current = next;
    }
    current
}

fn reject_key_kind(kind: &SchemaKind, cursor: &Cursor) -> Result<(), GenerationError> {
    match kind {
        SchemaKind::BigInt
        | SchemaKind::Boolean
        | SchemaKind::Date
        | SchemaKind::Null
        | SchemaKind::Undefined
        | SchemaKind::Void
        | SchemaKind::Nan
        | SchemaKind::Array { .. }
        | SchemaKind::Tuple { .. }
        | SchemaKind::Object { .. }
        | SchemaKind::Record { .. }
        | SchemaKind::Map { .. }
        | SchemaKind::Set { .. } => Err(GenerationError::InvalidKeyType {
            path: cursor.path.clone(),
            found: kind.type_name().to_string(),
        }),
        _ => Ok(()),
    }
}

fn record_key(value: &GeneratedValue, cursor: &Cursor) -> Result<String, GenerationError> {
    match value {
        GeneratedValue::Text(text) | GeneratedValue::Symbol(text) => Ok(text.clone()),
        GeneratedValue::Int(_) | GeneratedValue::Float(_) => Ok(value.text_form()),
        other => Err(GenerationError::InvalidKeyType {
            path: cursor.path.clone(),
            found: other.type_name().to_string(),
        }),
    }
}

pub(crate) fn map(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    key: &Schema,
    value: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let config = ctx.options.map;
    let len = pick_len(ctx, size_bounds(schema.checks()), config, cursor)?;
    let mut entries: Vec<(GeneratedValue, GeneratedValue)> = Vec::with_capacity(len);
    let mut attempts = 0;
    while entries.len() < len && attempts < len * MAX_DUPLICATE_RETRIES {
        attempts += 1;
        let index = entries.len();
        let generated_key = generate_item(ctx, key, &cursor.key(index))?;
        if entries.iter().any(|(existing, _)| *existing == generated_key) {
            continue;
        }
        let item = generate_item(ctx, value, &cursor.index(index))?;
        entries.push((generated_key, item));
    }
    if entries.len() < len {
        ctx.warn(
            "duplicate_keys",
            format!("map produced {} of {len} unique keys", entries.len()),
            cursor,
        );
    }
    Ok(GeneratedValue::Map(entries))
}

pub(crate) fn set(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    element: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let config = ctx.options.set;
    let len = pick_len(ctx, size_bounds(schema.checks()), config, cursor)?;
    let mut items: Vec<GeneratedValue> = Vec::with_capacity(len);
    let mut attempts = 0;
    while items.len() < len && attempts < len * MAX_DUPLICATE_RETRIES {
        attempts += 1;
        let item = generate_item(ctx, element, &cursor.index(items.len()))?;
        if !items.contains(&item) {
            items.push(item);
        }
    }
    if items.len() < len {
        ctx.warn(
            "duplicate_items",
            format!("set produced {} of {len} unique items", items.len()),
            cursor,
        );
    }
    Ok(GeneratedValue::Set(items))
}

pub(crate) fn union(
    ctx: &mut GenerationContext<'_>,
    options: &[Schema],
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    if options.is_empty() {
        ctx.fallback("empty_union", "union declares no options", cursor)?;
        return Ok(Slot::Value(GeneratedValue::Undefined));
    }
    let index = ctx.provider.pick_index(options.len());
    generate_slot(ctx, &options[index], cursor)
}

pub(crate) fn optional(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    if ctx.provider.boolean(ctx.options.optional_probability) {
        return Ok(Slot::Value(GeneratedValue::Undefined));
    }
    generate_slot(ctx, inner, cursor)
}

pub(crate) fn exact_optional(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    if !cursor.required && ctx.provider.boolean(ctx.options.optional_probability) {
        return Ok(Slot::Omit);
    }
    generate_slot(ctx, inner, cursor)
}

pub(crate) fn nullable(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    if ctx.provider.boolean(ctx.options.nullable_probability) {
        return Ok(Slot::Null);
    }
    generate_slot(ctx, inner, cursor)
}

pub(crate) fn default(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    value: &Value,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    if ctx.provider.boolean(ctx.options.default_probability) {
        return Ok(Slot::Value(GeneratedValue::from_json(value)));
    }
    generate_slot(ctx, inner, cursor)
}

pub(crate) fn non_optional(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    let mut current = inner;
    while let SchemaKind::Optional { inner } | SchemaKind::ExactOptional { inner } =
        current.kind()
    {
        current = inner;
    }
    generate_slot(ctx, current, cursor)
}

pub(crate) fn lazy(
    ctx: &mut GenerationContext<'_>,
    reference: &str,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    let definitions = ctx.definitions;
    let target = definitions
        .get(reference)
        .ok_or_else(|| GenerationError::UnresolvedReference {
            path: cursor.path.clone(),
            name: reference.to_string(),
        })?;

    if guard::is_json_like(target) {
        return Ok(Slot::Value(GeneratedValue::Object(Vec::new())));
    }

    if cursor.lazy_depth >= ctx.options.lazy_depth_limit {
        return match guard::terminal_value(target, definitions) {
            Some(value) => {
                ctx.report.record_lazy_termination();
                debug!(
                    reference,
                    depth = cursor.lazy_depth,
                    path = %cursor.path,
                    "lazy depth limit reached"
                );
                Ok(Slot::Value(value))
            }
            None => Err(GenerationError::UnsupportedLazyTermination {
                path: cursor.path.clone(),
                found: target.type_name().to_string(),
            }),
        };
    }

    generate_slot(ctx, target, &cursor.lazy())
}

pub(crate) fn pipe(
    ctx: &mut GenerationContext<'_>,
    input: &Schema,
    output: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    match output.kind() {
        SchemaKind::Transform { id } => {
            let value = generate_value(ctx, input, cursor)?;
            apply_transform(ctx, id, value, cursor).map(Slot::Value)
        }
        _ => generate_slot(ctx, output, cursor),
    }
}

pub(crate) fn bare_transform(
    ctx: &mut GenerationContext<'_>,
    id: &str,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    ctx.warn(
        "transform_without_input",
        format!("transform '{id}' has no input schema; applying it to undefined"),
        cursor,
    );
    apply_transform(ctx, id, GeneratedValue::Undefined, cursor).map(Slot::Value)
}

pub(crate) fn catch(
    ctx: &mut GenerationContext<'_>,
    inner: &Schema,
    value: &Value,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    match generate_slot(ctx, inner, cursor)? {
        Slot::Omit | Slot::Value(GeneratedValue::Undefined) => {
            Ok(Slot::Value(GeneratedValue::from_json(value)))
        }
        slot => Ok(slot),
    }
}

pub(crate) fn template_literal(
    ctx: &mut GenerationContext<'_>,
    parts: &[TemplatePart],
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let mut text = String::new();
    for part in parts {
        match part {
            TemplatePart::Text(literal) => text.push_str(literal),
            TemplatePart::Schema(schema) => {
                text.push_str(&generate_value(ctx, schema, cursor)?.text_form())
            }
        }
    }
    Ok(GeneratedValue::Text(text))
}
