//! Intersection synthesis.
//!
//! Both operands are merged into a single schema whenever their shapes allow
//! it; the merged node is then generated like any other. Shapes that cannot
//! be merged statically fall back to generating both sides and merging the
//! values.

use schemock_core::{Check, Field, LiteralValue, Schema, SchemaKind, SchemaNode};

use crate::constraints::{
    BoundsConflict, big_int_range, date_range, length_bounds, number_plan, size_bounds,
};
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::generators::{generate_slot, generate_value};
use crate::value::{GeneratedValue, Slot};

/// Nested merges deeper than this are left to value merging.
const MAX_MERGE_DEPTH: usize = 32;

pub(crate) fn generate(
    ctx: &mut GenerationContext<'_>,
    left: &Schema,
    right: &Schema,
    cursor: &Cursor,
) -> Result<Slot, GenerationError> {
    match merge_schemas(left, right, &cursor.path, 0)? {
        Some(merged) => generate_slot(ctx, &merged, cursor),
        None => {
            let left_value = generate_value(ctx, left, cursor)?;
            let right_value = generate_value(ctx, right, cursor)?;
            merge_values(left_value, right_value, &cursor.path).map(Slot::Value)
        }
    }
}

/// Merges two schemas into one whose values satisfy both.
///
/// `Ok(None)` means the pair has no static merge and values must be merged
/// after generation.
pub(crate) fn merge_schemas(
    left: &Schema,
    right: &Schema,
    path: &str,
    depth: usize,
) -> Result<Option<Schema>, GenerationError> {
    if depth > MAX_MERGE_DEPTH {
        return Ok(None);
    }
    let left = unwrap(left);
    let right = unwrap(right);

    if let SchemaKind::Intersection { left: a, right: b } = left.kind() {
        return match merge_schemas(a, b, path, depth + 1)? {
            Some(merged) => merge_schemas(&merged, &right, path, depth + 1),
            None => Ok(None),
        };
    }
    if let SchemaKind::Intersection { left: a, right: b } = right.kind() {
        return match merge_schemas(a, b, path, depth + 1)? {
            Some(merged) => merge_schemas(&left, &merged, path, depth + 1),
            None => Ok(None),
        };
    }

    match (left.kind(), right.kind()) {
        (SchemaKind::Any | SchemaKind::Unknown, _) => Ok(Some(right.clone())),
        (_, SchemaKind::Any | SchemaKind::Unknown) => Ok(Some(left.clone())),
        (
            SchemaKind::Union { options } | SchemaKind::DiscriminatedUnion { options, .. },
            _,
        ) => merge_union(options, &right, path, depth, false),
        (
            _,
            SchemaKind::Union { options } | SchemaKind::DiscriminatedUnion { options, .. },
        ) => merge_union(options, &left, path, depth, true),
        (SchemaKind::Object { fields: a }, SchemaKind::Object { fields: b }) => {
            Ok(Some(merge_objects(a, b, &left, &right)))
        }
        (SchemaKind::Array { element: a }, SchemaKind::Array { element: b }) => {
            let checks = combined_checks(&left, &right);
            length_bounds(left.checks())
                .merge(&length_bounds(right.checks()))
                .map_err(|conflict| conflict.at(path))?;
            Ok(Some(with_checks(
                SchemaKind::Array {
                    element: Schema::intersection(a.clone(), b.clone()),
                },
                checks,
                &left,
                &right,
            )))
        }
        (SchemaKind::Map { key: k1, value: v1 }, SchemaKind::Map { key: k2, value: v2 }) => {
            if !(k1.same_type(k2) && v1.same_type(v2)) {
                return Err(GenerationError::IncompatibleIntersection {
                    path: path.to_string(),
                    message: "maps must share key and value types".to_string(),
                });
            }
            merge_sized(&left, &right, path).map(Some)
        }
        (SchemaKind::Set { element: a }, SchemaKind::Set { element: b }) => {
            if !a.same_type(b) {
                return Err(GenerationError::IncompatibleIntersection {
                    path: path.to_string(),
                    message: "sets must share an element type".to_string(),
                });
            }
            merge_sized(&left, &right, path).map(Some)
        }
        (SchemaKind::Map { .. } | SchemaKind::Set { .. }, _)
        | (_, SchemaKind::Map { .. } | SchemaKind::Set { .. }) => {
            Err(GenerationError::IncompatibleIntersection {
                path: path.to_string(),
                message: format!(
                    "cannot intersect {} with {}",
                    left.type_name(),
                    right.type_name()
                ),
            })
        }
        (
            SchemaKind::Literal { values: a } | SchemaKind::Enum { values: a },
            SchemaKind::Literal { values: b } | SchemaKind::Enum { values: b },
        ) => {
            let values: Vec<LiteralValue> =
                a.iter().filter(|value| b.contains(value)).cloned().collect();
            literal_result(values, &left, &right, path).map(Some)
        }
        (SchemaKind::Literal { values } | SchemaKind::Enum { values }, other)
            if other.is_primitive() =>
        {
            let values = values
                .iter()
                .filter(|value| literal_fits(value, other))
                .cloned()
                .collect();
            literal_result(values, &left, &right, path).map(Some)
        }
        (other, SchemaKind::Literal { values } | SchemaKind::Enum { values })
            if other.is_primitive() =>
        {
            let values = values
                .iter()
                .filter(|value| literal_fits(value, other))
                .cloned()
                .collect();
            literal_result(values, &right, &left, path).map(Some)
        }
        (a, b) if a.is_primitive() && b.is_primitive() => {
            merge_primitives(&left, &right, path).map(Some)
        }
        (a, b) => match (shape(a), shape(b)) {
            (Some(x), Some(y)) if x != y => Err(GenerationError::IncompatibleTypes {
                path: path.to_string(),
                message: format!("cannot intersect {} with {}", a.type_name(), b.type_name()),
            }),
            _ => Ok(None),
        },
    }
}

/// Looks through wrappers. Lazy references stay in place so that recursion
/// keeps counting depth; a lazy operand is merged at the value level.
fn unwrap(schema: &Schema) -> Schema {
    let mut current = schema.clone();
    for _ in 0..MAX_MERGE_DEPTH {
        let next = match current.kind() {
            SchemaKind::Optional { inner }
            | SchemaKind::ExactOptional { inner }
            | SchemaKind::Nullable { inner }
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Prefault { inner, .. }
            | SchemaKind::Readonly { inner }
            | SchemaKind::NonOptional { inner }
            | SchemaKind::Catch { inner, .. }
            | SchemaKind::Success { inner } => inner.clone(),
            _ => break,
        };
        current = next;
    }
    current
}

/// Cross product of union options with the other operand. Pairs without a
/// static merge stay as intersections and are merged by value; only pairs
/// that fail outright are dropped.
fn merge_union(
    options: &[Schema],
    other: &Schema,
    path: &str,
    depth: usize,
    swapped: bool,
) -> Result<Option<Schema>, GenerationError> {
    let mut merged = Vec::new();
    let mut conflict = None;
    for option in options {
        let (left, right) = if swapped { (other, option) } else { (option, other) };
        match merge_schemas(left, right, path, depth + 1) {
            Ok(Some(schema)) => merged.push(schema),
            Ok(None) => merged.push(Schema::intersection(left.clone(), right.clone())),
            Err(GenerationError::IncompatibleTypes { .. }) => {}
            Err(err) => {
                conflict.get_or_insert(err);
            }
        }
    }
    match merged.len() {
        0 => Err(conflict.unwrap_or_else(|| GenerationError::IncompatibleTypes {
            path: path.to_string(),
            message: format!("no union option is compatible with {}", other.type_name()),
        })),
        1 => Ok(merged.pop()),
        _ => Ok(Some(Schema::union(merged))),
    }
}

/// Coarse value shape used to reject pairs that no value merge can satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar,
    Keyed,
    Sequence,
}

fn shape(kind: &SchemaKind) -> Option<Shape> {
    match kind {
        SchemaKind::Undefined | SchemaKind::Void => None,
        SchemaKind::TemplateLiteral { .. } => Some(Shape::Scalar),
        SchemaKind::Object { .. } | SchemaKind::Record { .. } => Some(Shape::Keyed),
        SchemaKind::Array { .. } | SchemaKind::Tuple { .. } => Some(Shape::Sequence),
        kind if kind.is_primitive() => Some(Shape::Scalar),
        _ => None,
    }
}

/// Field union in left-then-right order; shared keys intersect.
fn merge_objects(a: &[Field], b: &[Field], left: &Schema, right: &Schema) -> Schema {
    let mut fields: Vec<Field> = a.to_vec();
    for field in b {
        match fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => {
                existing.schema = Schema::intersection(existing.schema.clone(), field.schema.clone());
            }
            None => fields.push(field.clone()),
        }
    }
    with_checks(
        SchemaKind::Object { fields },
        combined_checks(left, right),
        left,
        right,
    )
}

fn merge_sized(left: &Schema, right: &Schema, path: &str) -> Result<Schema, GenerationError> {
    size_bounds(left.checks())
        .merge(&size_bounds(right.checks()))
        .map_err(|conflict| conflict.at(path))?;
    Ok(with_checks(
        left.kind().clone(),
        combined_checks(left, right),
        left,
        right,
    ))
}

/// Same-kind primitives: checks concatenate and the merged bounds must hold.
fn merge_primitives(left: &Schema, right: &Schema, path: &str) -> Result<Schema, GenerationError> {
    let kind = match (left.kind(), right.kind()) {
        (SchemaKind::String, SchemaKind::String) => SchemaKind::String,
        (format @ SchemaKind::Format { .. }, SchemaKind::String)
        | (SchemaKind::String, format @ SchemaKind::Format { .. }) => format.clone(),
        (SchemaKind::Format { format: a, .. }, SchemaKind::Format { format: b, .. }) if a == b => {
            left.kind().clone()
        }
        (a, b) if a == b => a.clone(),
        (a, b) => {
            return Err(GenerationError::IncompatibleTypes {
                path: path.to_string(),
                message: format!("cannot intersect {} with {}", a.type_name(), b.type_name()),
            });
        }
    };

    let checks = combined_checks(left, right);
    let conflict = |conflict: BoundsConflict| conflict.at(path);
    match kind {
        SchemaKind::String | SchemaKind::Format { .. } => {
            length_bounds(left.checks())
                .merge(&length_bounds(right.checks()))
                .map_err(conflict)?;
        }
        SchemaKind::Number => {
            number_plan(&checks).map_err(conflict)?;
        }
        SchemaKind::BigInt => {
            big_int_range(&checks).map_err(conflict)?;
        }
        SchemaKind::Date => {
            date_range(&checks).map_err(conflict)?;
        }
        _ => {}
    }
    Ok(with_checks(kind, checks, left, right))
}

fn literal_result(
    values: Vec<LiteralValue>,
    left: &Schema,
    right: &Schema,
    path: &str,
) -> Result<Schema, GenerationError> {
    if values.is_empty() {
        return Err(GenerationError::EmptyIntersection {
            path: path.to_string(),
            message: format!(
                "{} and {} share no allowed value",
                left.type_name(),
                right.type_name()
            ),
        });
    }
    let kind = match left.kind() {
        SchemaKind::Literal { .. } => SchemaKind::Literal { values },
        _ => SchemaKind::Enum { values },
    };
    Ok(with_checks(kind, Vec::new(), left, right))
}

fn literal_fits(value: &LiteralValue, kind: &SchemaKind) -> bool {
    match (value, kind) {
        (LiteralValue::Text(_), SchemaKind::String | SchemaKind::Format { .. }) => true,
        (LiteralValue::Int(_) | LiteralValue::Float(_), SchemaKind::Number) => true,
        (LiteralValue::Int(_), SchemaKind::BigInt) => true,
        (LiteralValue::Bool(_), SchemaKind::Boolean) => true,
        (LiteralValue::Null, SchemaKind::Null) => true,
        _ => false,
    }
}

/// Left checks followed by right checks not already declared on the left.
fn combined_checks(left: &Schema, right: &Schema) -> Vec<Check> {
    let mut checks = left.checks().to_vec();
    for check in right.checks() {
        if !checks.contains(check) {
            checks.push(check.clone());
        }
    }
    checks
}

/// New node; metadata from both operands with the left side winning.
fn with_checks(kind: SchemaKind, checks: Vec<Check>, left: &Schema, right: &Schema) -> Schema {
    let mut meta = right.meta.clone();
    meta.extend(left.meta.clone());
    Schema::from_node(SchemaNode { kind, checks, meta })
}

/// Structural merge of two generated values.
pub(crate) fn merge_values(
    left: GeneratedValue,
    right: GeneratedValue,
    path: &str,
) -> Result<GeneratedValue, GenerationError> {
    match (left, right) {
        (GeneratedValue::Undefined, other) | (other, GeneratedValue::Undefined) => Ok(other),
        (GeneratedValue::Object(left), GeneratedValue::Object(right)) => {
            let mut fields = left;
            for (name, value) in right {
                match fields.iter().position(|(existing, _)| *existing == name) {
                    Some(index) => {
                        let current =
                            std::mem::replace(&mut fields[index].1, GeneratedValue::Undefined);
                        fields[index].1 = merge_values(current, value, &format!("{path}.{name}"))?;
                    }
                    None => fields.push((name, value)),
                }
            }
            Ok(GeneratedValue::Object(fields))
        }
        (GeneratedValue::Array(left), GeneratedValue::Array(right)) => Ok(GeneratedValue::Array(
            left.into_iter().filter(|item| right.contains(item)).collect(),
        )),
        (left, right) if left == right => Ok(left),
        (left, right) => Err(GenerationError::IncompatibleTypes {
            path: path.to_string(),
            message: format!(
                "generated {} and {} cannot be merged",
                left.type_name(),
                right.type_name()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(left: &Schema, right: &Schema) -> Result<Option<Schema>, GenerationError> {
        merge_schemas(left, right, "$", 0)
    }

    #[test]
    fn any_defers_to_other_side() {
        let string = Schema::string().min_length(3);
        let merged = merge(&Schema::any(), &string).unwrap().unwrap();
        assert!(merged.ptr_eq(&string));
    }

    #[test]
    fn string_bounds_conflict() {
        let result = merge(&Schema::string().min_length(10), &Schema::string().max_length(5));
        assert!(matches!(
            result,
            Err(GenerationError::ConstraintConflict { .. })
        ));
    }

    #[test]
    fn format_wins_over_string() {
        let merged = merge(&Schema::string().max_length(64), &Schema::email())
            .unwrap()
            .unwrap();
        assert!(matches!(merged.kind(), SchemaKind::Format { .. }));
        assert_eq!(merged.checks().len(), 1);
    }

    #[test]
    fn enum_values_intersect() {
        let merged = merge(
            &Schema::enumeration(["a", "b", "c"]),
            &Schema::enumeration(["b", "c", "d"]),
        )
        .unwrap()
        .unwrap();
        let SchemaKind::Enum { values } = merged.kind() else {
            panic!("expected enum, got {}", merged.type_name());
        };
        assert_eq!(values, &vec![LiteralValue::from("b"), LiteralValue::from("c")]);

        let empty = merge(&Schema::enumeration(["a"]), &Schema::enumeration(["z"]));
        assert!(matches!(
            empty,
            Err(GenerationError::EmptyIntersection { .. })
        ));
    }

    #[test]
    fn literal_filters_by_primitive_kind() {
        let merged = merge(&Schema::enumeration([1, 2]), &Schema::number())
            .unwrap()
            .unwrap();
        assert!(matches!(merged.kind(), SchemaKind::Enum { values } if values.len() == 2));
        assert!(matches!(
            merge(&Schema::literal("x"), &Schema::number()),
            Err(GenerationError::EmptyIntersection { .. })
        ));
    }

    #[test]
    fn objects_merge_shared_fields() {
        let left = Schema::object([("id", Schema::uuid()), ("name", Schema::string())]);
        let right = Schema::object([("name", Schema::string().min_length(2)), ("age", Schema::int())]);
        let merged = merge(&left, &right).unwrap().unwrap();
        let SchemaKind::Object { fields } = merged.kind() else {
            panic!("expected object");
        };
        let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "age"]);
        assert!(matches!(fields[1].schema.kind(), SchemaKind::Intersection { .. }));
    }

    #[test]
    fn mismatched_sets_are_incompatible() {
        let result = merge(&Schema::set(Schema::string()), &Schema::set(Schema::number()));
        assert!(matches!(
            result,
            Err(GenerationError::IncompatibleIntersection { .. })
        ));
    }

    #[test]
    fn union_keeps_compatible_options() {
        let union = Schema::union(vec![Schema::string(), Schema::number(), Schema::boolean()]);
        let merged = merge(&union, &Schema::number().min(5.0)).unwrap().unwrap();
        assert!(matches!(merged.kind(), SchemaKind::Number));

        let none = merge(&Schema::union(vec![Schema::string()]), &Schema::boolean());
        assert!(matches!(none, Err(GenerationError::IncompatibleTypes { .. })));
    }

    #[test]
    fn union_options_without_static_merge_survive() {
        let union = Schema::union(vec![
            Schema::record(Schema::string(), Schema::int()),
            Schema::boolean(),
        ]);
        let object = Schema::object([("userId", Schema::int())]);
        let merged = merge(&union, &object).unwrap().unwrap();
        let SchemaKind::Intersection { left, right } = merged.kind() else {
            panic!("expected intersection, got {}", merged.type_name());
        };
        assert!(matches!(left.kind(), SchemaKind::Record { .. }));
        assert!(right.ptr_eq(&object));
    }

    #[test]
    fn union_reports_conflict_when_no_option_survives() {
        let union = Schema::union(vec![Schema::string().min_length(10), Schema::boolean()]);
        let result = merge(&union, &Schema::string().max_length(5));
        assert!(matches!(
            result,
            Err(GenerationError::ConstraintConflict { .. })
        ));
    }

    #[test]
    fn scalars_never_merge_with_objects() {
        let result = merge(&Schema::boolean(), &Schema::object([("a", Schema::int())]));
        assert!(matches!(result, Err(GenerationError::IncompatibleTypes { .. })));
        assert!(merge(&Schema::undefined(), &Schema::array(Schema::int())).unwrap().is_none());
    }

    #[test]
    fn values_merge_structurally() {
        let left = GeneratedValue::Object(vec![("a".into(), GeneratedValue::Int(1))]);
        let right = GeneratedValue::Object(vec![("b".into(), GeneratedValue::Bool(true))]);
        let merged = merge_values(left, right, "$").unwrap();
        assert_eq!(merged.len(), Some(2));

        let mismatch = merge_values(GeneratedValue::Int(1), GeneratedValue::Int(2), "$");
        assert!(matches!(
            mismatch,
            Err(GenerationError::IncompatibleTypes { .. })
        ));
    }
}
