use schemock_core::{LiteralValue, Schema};

use crate::constraints::{
    NumberPlan, big_int_range, date_range, integer_multiple_range, multiple_range, number_plan,
    string_constraints,
};
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::value::GeneratedValue;

pub(crate) fn string(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let constraints = string_constraints(schema.checks());
    if let Some(pattern) = &constraints.pattern {
        return matching(ctx, pattern, cursor).map(GeneratedValue::Text);
    }

    let range = constraints
        .length_range()
        .map_err(|conflict| conflict.at(&cursor.path))?;
    let fixed = constraints.fixed_len();
    let body = match range {
        None => ctx.provider.word(),
        Some((min, max)) => {
            if fixed > max {
                return Err(GenerationError::ConstraintConflict {
                    path: cursor.path.clone(),
                    message: format!(
                        "prefix, suffix and includes need {fixed} characters but max length is {max}"
                    ),
                });
            }
            let len = ctx.provider.int(min.max(fixed) as i64, max as i64) as usize;
            ctx.provider.text(len - fixed)
        }
    };

    Ok(GeneratedValue::Text(format!(
        "{}{}{body}{}",
        constraints.starts_with.as_deref().unwrap_or(""),
        constraints.includes.concat(),
        constraints.ends_with.as_deref().unwrap_or(""),
    )))
}

pub(crate) fn number(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let conflict = |conflict: crate::constraints::BoundsConflict| conflict.at(&cursor.path);
    let value = match number_plan(schema.checks()).map_err(conflict)? {
        NumberPlan::Int {
            min,
            max,
            multiple_of: None,
        } => GeneratedValue::Int(ctx.provider.int(min, max)),
        NumberPlan::Int {
            min,
            max,
            multiple_of: Some(step),
        } => {
            let (low, high) = integer_multiple_range(min, max, step).map_err(conflict)?;
            GeneratedValue::Int(ctx.provider.int(low, high) * step)
        }
        NumberPlan::Float {
            min,
            max,
            multiple_of: None,
        } => GeneratedValue::Float(ctx.provider.float(min, max)),
        NumberPlan::Float {
            min,
            max,
            multiple_of: Some(step),
        } => {
            let (low, high) = multiple_range(min, max, step).map_err(conflict)?;
            let k = ctx.provider.int(low, high);
            GeneratedValue::Float(k as f64 * step)
        }
    };
    Ok(value)
}

pub(crate) fn big_int(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let (min, max) =
        big_int_range(schema.checks()).map_err(|conflict| conflict.at(&cursor.path))?;
    Ok(GeneratedValue::BigInt(ctx.provider.big_int(min, max)))
}

pub(crate) fn date(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let (min, max) = date_range(schema.checks()).map_err(|conflict| conflict.at(&cursor.path))?;
    Ok(GeneratedValue::Date(ctx.provider.date(min, max)))
}

pub(crate) fn pick_literal(
    ctx: &mut GenerationContext<'_>,
    values: &[LiteralValue],
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    if values.is_empty() {
        ctx.fallback("empty_literal", "literal or enum declares no values", cursor)?;
        return Ok(GeneratedValue::Undefined);
    }
    let index = ctx.provider.pick_index(values.len());
    Ok(GeneratedValue::from(&values[index]))
}

pub(crate) fn never(
    ctx: &mut GenerationContext<'_>,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    ctx.fallback("unsupported_kind", "never has no values", cursor)?;
    Ok(GeneratedValue::Undefined)
}

pub(crate) fn custom(
    ctx: &mut GenerationContext<'_>,
    name: &str,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    ctx.fallback(
        "unsupported_kind",
        format!("custom kind '{name}' is not modeled; using a word"),
        cursor,
    )?;
    Ok(GeneratedValue::Text(ctx.provider.word()))
}

pub(crate) fn matching(
    ctx: &mut GenerationContext<'_>,
    pattern: &str,
    cursor: &Cursor,
) -> Result<String, GenerationError> {
    ctx.provider
        .matching(pattern)
        .map_err(|err| GenerationError::InvalidPattern {
            path: cursor.path.clone(),
            message: err.to_string(),
        })
}
