//! Per-variant synthesis strategies and the recursive dispatcher.

pub(crate) mod composite;
pub(crate) mod formats;
pub(crate) mod intersection;
pub(crate) mod primitives;

use schemock_core::{Check, Schema, SchemaKind};
use tracing::debug;

use crate::constraints::duplicate_overwriting;
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::hook::OverrideContext;
use crate::value::{GeneratedValue, Slot};

/// Generates one schema slot: consistency replay, then the override hook,
/// then variant dispatch. Values produced for named nodes fill empty
/// consistency slots.
pub(crate) fn generate_slot(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    let name = ctx.consistency_name(schema);
    if let Some(name) = name {
        ctx.store.pin(name, cursor.array_path.len());
        if let Some(value) = ctx.store.replay(name, &cursor.array_path) {
            let value = value.clone();
            ctx.report.record_replay();
            debug!(consistency_name = name, path = %cursor.path, "consistency replay");
            return Ok(Slot::Value(value));
        }
    }

    let slot = match run_hook(ctx, schema, cursor) {
        Some(value) => Slot::Value(value),
        None => dispatch(ctx, schema, cursor)?,
    };

    if let Some(name) = name
        && let Some(value) = slot.recorded()
    {
        ctx.store.record(name, &cursor.array_path, value);
    }
    Ok(slot)
}

/// Generates a slot and collapses omissions to `undefined`.
pub(crate) fn generate_value(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    generate_slot(ctx, schema, cursor).map(Slot::into_value)
}

/// Generates a container element. An exact-optional omission cannot leave a
/// hole in an array, set, map, or record, so every exact-optional wrapper
/// reached from the element yields its inner value.
pub(crate) fn generate_item(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    generate_value(ctx, schema, &cursor.required())
}

fn run_hook(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Option<GeneratedValue> {
    let hook = ctx.hook?;
    let mut hook_ctx = OverrideContext {
        provider: &mut *ctx.provider,
        options: ctx.options,
        path: &cursor.path,
        array_path: &cursor.array_path,
    };
    let value = hook.generate(schema, &mut hook_ctx)?;
    ctx.report.record_generator_usage("override");
    Some(value)
}

fn dispatch(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    for name in duplicate_overwriting(schema.checks()) {
        ctx.warn(
            "multiple_overwrite_checks",
            format!("only the last {name} check applies"),
            cursor,
        );
    }

    let slot = match schema.kind() {
        SchemaKind::String => Slot::Value(primitives::string(ctx, schema, cursor)?),
        SchemaKind::Format { format, pattern } => Slot::Value(formats::format(
            ctx,
            schema,
            *format,
            pattern.as_deref(),
            cursor,
        )?),
        SchemaKind::Number => Slot::Value(primitives::number(ctx, schema, cursor)?),
        SchemaKind::BigInt => Slot::Value(primitives::big_int(ctx, schema, cursor)?),
        SchemaKind::Boolean => Slot::Value(GeneratedValue::Bool(ctx.provider.boolean(0.5))),
        SchemaKind::Date => Slot::Value(primitives::date(ctx, schema, cursor)?),
        SchemaKind::Null => Slot::Null,
        SchemaKind::Undefined | SchemaKind::Void => Slot::Value(GeneratedValue::Undefined),
        SchemaKind::Symbol => Slot::Value(GeneratedValue::Symbol(ctx.provider.word())),
        SchemaKind::Nan => Slot::Value(GeneratedValue::Float(f64::NAN)),
        SchemaKind::Any | SchemaKind::Unknown => {
            Slot::Value(GeneratedValue::Text(ctx.provider.word()))
        }
        SchemaKind::Never => Slot::Value(primitives::never(ctx, cursor)?),
        SchemaKind::Custom { name } => Slot::Value(primitives::custom(ctx, name, cursor)?),
        SchemaKind::Literal { values } | SchemaKind::Enum { values } => {
            Slot::Value(primitives::pick_literal(ctx, values, cursor)?)
        }
        SchemaKind::TemplateLiteral { parts } => {
            Slot::Value(composite::template_literal(ctx, parts, cursor)?)
        }
        SchemaKind::Array { element } => {
            Slot::Value(composite::array(ctx, schema, element, cursor)?)
        }
        SchemaKind::Tuple { items, rest } => {
            Slot::Value(composite::tuple(ctx, items, rest.as_ref(), cursor)?)
        }
        SchemaKind::Object { fields } => Slot::Value(composite::object(ctx, fields, cursor)?),
        SchemaKind::Record { key, value } => {
            Slot::Value(composite::record(ctx, key, value, cursor)?)
        }
        SchemaKind::Map { key, value } => {
            Slot::Value(composite::map(ctx, schema, key, value, cursor)?)
        }
        SchemaKind::Set { element } => Slot::Value(composite::set(ctx, schema, element, cursor)?),
        SchemaKind::Union { options } | SchemaKind::DiscriminatedUnion { options, .. } => {
            composite::union(ctx, options, cursor)?
        }
        SchemaKind::Intersection { left, right } => {
            intersection::generate(ctx, left, right, cursor)?
        }
        SchemaKind::Optional { inner } => composite::optional(ctx, inner, cursor)?,
        SchemaKind::ExactOptional { inner } => composite::exact_optional(ctx, inner, cursor)?,
        SchemaKind::Nullable { inner } => composite::nullable(ctx, inner, cursor)?,
        SchemaKind::Default { inner, value } | SchemaKind::Prefault { inner, value } => {
            composite::default(ctx, inner, value, cursor)?
        }
        SchemaKind::Readonly { inner } | SchemaKind::Success { inner } => {
            generate_slot(ctx, inner, cursor)?
        }
        SchemaKind::NonOptional { inner } => composite::non_optional(ctx, inner, cursor)?,
        SchemaKind::Lazy { reference } => composite::lazy(ctx, reference, cursor)?,
        SchemaKind::Pipe { input, output } => composite::pipe(ctx, input, output, cursor)?,
        SchemaKind::Transform { id } => composite::bare_transform(ctx, id, cursor)?,
        SchemaKind::Catch { inner, value } => composite::catch(ctx, inner, value, cursor)?,
    };

    match schema.kind() {
        SchemaKind::Format { format, .. } => ctx
            .report
            .record_generator_usage(&format!("format.{}", format.as_str())),
        kind => ctx.report.record_generator_usage(kind.type_name()),
    }
    apply_overwrites(ctx, schema, slot, cursor)
}

/// Applies overwrite checks in declaration order.
fn apply_overwrites(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    slot: Slot,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    let Slot::Value(mut value) = slot else {
        return Ok(slot);
    };
    for check in schema.checks() {
        if let Check::Overwrite { transform } = check {
            value = apply_transform(ctx, transform.id(), value, cursor)?;
        }
    }
    Ok(Slot::Value(value))
}

/// Runs a named transform; unknown ids warn, or fail in strict mode.
pub(crate) fn apply_transform(
    ctx: &mut GenerationContext<'_>,
    id: &str,
    value: GeneratedValue,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let transforms = ctx.transforms;
    match transforms.get(id) {
        Some(transform) => {
            ctx.report.record_transform_usage(id);
            Ok(transform.apply(value))
        }
        None if ctx.options.strict => Err(GenerationError::UnknownTransform {
            path: cursor.path.clone(),
            id: id.to_string(),
        }),
        None => {
            ctx.warn(
                "unknown_transform",
                format!("transform '{id}' is not registered"),
                cursor,
            );
            Ok(value)
        }
    }
}
