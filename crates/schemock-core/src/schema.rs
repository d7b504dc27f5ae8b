use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checks::{Check, StringFormat};

/// Shared handle to an immutable schema node.
///
/// Cloning is cheap and keeps node identity: two clones of the same handle
/// are the same node for consistency registration.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Schema(Arc<SchemaNode>);

/// Identity of a schema node allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A schema node: variant, declared checks, and metadata attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: SchemaKind,
    /// Declared checks in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<Check>,
    /// Free-form metadata attributes (consistency keys live here).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, Value>,
}

/// Closed set of schema variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaKind {
    String,
    /// String with a well-known format and optional declared pattern.
    Format {
        format: StringFormat,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Number,
    BigInt,
    Boolean,
    Date,
    Null,
    Undefined,
    Void,
    Symbol,
    Nan,
    Any,
    Unknown,
    Never,
    Literal {
        values: Vec<LiteralValue>,
    },
    Enum {
        values: Vec<LiteralValue>,
    },
    TemplateLiteral {
        parts: Vec<TemplatePart>,
    },
    Array {
        element: Schema,
    },
    Tuple {
        items: Vec<Schema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest: Option<Schema>,
    },
    Object {
        fields: Vec<Field>,
    },
    Record {
        key: Schema,
        value: Schema,
    },
    Map {
        key: Schema,
        value: Schema,
    },
    Set {
        element: Schema,
    },
    Union {
        options: Vec<Schema>,
    },
    DiscriminatedUnion {
        discriminator: String,
        options: Vec<Schema>,
    },
    Intersection {
        left: Schema,
        right: Schema,
    },
    Optional {
        inner: Schema,
    },
    /// Optional key that is dropped instead of holding `undefined`.
    ExactOptional {
        inner: Schema,
    },
    Nullable {
        inner: Schema,
    },
    Default {
        inner: Schema,
        value: Value,
    },
    Prefault {
        inner: Schema,
        value: Value,
    },
    Readonly {
        inner: Schema,
    },
    NonOptional {
        inner: Schema,
    },
    /// Deferred reference to a named definition.
    Lazy {
        reference: String,
    },
    Pipe {
        input: Schema,
        output: Schema,
    },
    /// Named transform applied to the value produced upstream.
    Transform {
        id: String,
    },
    Catch {
        inner: Schema,
        value: Value,
    },
    Success {
        inner: Schema,
    },
    /// Variant not modeled by this crate.
    Custom {
        name: String,
    },
}

/// Object field in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

/// Template literal segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TemplatePart {
    Text(String),
    Schema(Schema),
}

/// Literal or enum member value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, LiteralValue::Int(_) | LiteralValue::Float(_))
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => f.write_str("null"),
            LiteralValue::Bool(value) => write!(f, "{value}"),
            LiteralValue::Int(value) => write!(f, "{value}"),
            LiteralValue::Float(value) => write!(f, "{value}"),
            LiteralValue::Text(value) => f.write_str(value),
        }
    }
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self::from_node(SchemaNode {
            kind,
            checks: Vec::new(),
            meta: BTreeMap::new(),
        })
    }

    pub fn from_node(node: SchemaNode) -> Self {
        Self(Arc::new(node))
    }

    pub fn node(&self) -> &SchemaNode {
        &self.0
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.0.kind
    }

    pub fn checks(&self) -> &[Check] {
        &self.0.checks
    }

    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as usize)
    }

    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Same variant and checks, ignoring metadata.
    pub fn same_type(&self, other: &Schema) -> bool {
        self.ptr_eq(other) || (self.kind() == other.kind() && self.checks() == other.checks())
    }

    /// String metadata attribute, if present.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.0.meta.get(key).and_then(Value::as_str)
    }

    /// Returns a new node with `check` appended.
    pub fn with_check(&self, check: Check) -> Schema {
        let mut node = self.node().clone();
        node.checks.push(check);
        Schema::from_node(node)
    }

    /// Returns a new node carrying the metadata attribute.
    pub fn with_meta(&self, key: impl Into<String>, value: impl Into<Value>) -> Schema {
        let mut node = self.node().clone();
        node.meta.insert(key.into(), value.into());
        Schema::from_node(node)
    }

    /// Short variant name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Direct children of the node (lazy references are not followed).
    pub fn children(&self) -> Vec<&Schema> {
        match self.kind() {
            SchemaKind::TemplateLiteral { parts } => parts
                .iter()
                .filter_map(|part| match part {
                    TemplatePart::Schema(schema) => Some(schema),
                    TemplatePart::Text(_) => None,
                })
                .collect(),
            SchemaKind::Array { element } | SchemaKind::Set { element } => vec![element],
            SchemaKind::Tuple { items, rest } => items.iter().chain(rest.iter()).collect(),
            SchemaKind::Object { fields } => fields.iter().map(|field| &field.schema).collect(),
            SchemaKind::Record { key, value } | SchemaKind::Map { key, value } => vec![key, value],
            SchemaKind::Union { options } | SchemaKind::DiscriminatedUnion { options, .. } => {
                options.iter().collect()
            }
            SchemaKind::Intersection { left, right } => vec![left, right],
            SchemaKind::Pipe { input, output } => vec![input, output],
            SchemaKind::Optional { inner }
            | SchemaKind::ExactOptional { inner }
            | SchemaKind::Nullable { inner }
            | SchemaKind::Default { inner, .. }
            | SchemaKind::Prefault { inner, .. }
            | SchemaKind::Readonly { inner }
            | SchemaKind::NonOptional { inner }
            | SchemaKind::Catch { inner, .. }
            | SchemaKind::Success { inner } => vec![inner],
            _ => Vec::new(),
        }
    }
}

impl SchemaKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Format { .. } => "format",
            SchemaKind::Number => "number",
            SchemaKind::BigInt => "big_int",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Null => "null",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Void => "void",
            SchemaKind::Symbol => "symbol",
            SchemaKind::Nan => "nan",
            SchemaKind::Any => "any",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Never => "never",
            SchemaKind::Literal { .. } => "literal",
            SchemaKind::Enum { .. } => "enum",
            SchemaKind::TemplateLiteral { .. } => "template_literal",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Tuple { .. } => "tuple",
            SchemaKind::Object { .. } => "object",
            SchemaKind::Record { .. } => "record",
            SchemaKind::Map { .. } => "map",
            SchemaKind::Set { .. } => "set",
            SchemaKind::Union { .. } => "union",
            SchemaKind::DiscriminatedUnion { .. } => "discriminated_union",
            SchemaKind::Intersection { .. } => "intersection",
            SchemaKind::Optional { .. } => "optional",
            SchemaKind::ExactOptional { .. } => "exact_optional",
            SchemaKind::Nullable { .. } => "nullable",
            SchemaKind::Default { .. } => "default",
            SchemaKind::Prefault { .. } => "prefault",
            SchemaKind::Readonly { .. } => "readonly",
            SchemaKind::NonOptional { .. } => "non_optional",
            SchemaKind::Lazy { .. } => "lazy",
            SchemaKind::Pipe { .. } => "pipe",
            SchemaKind::Transform { .. } => "transform",
            SchemaKind::Catch { .. } => "catch",
            SchemaKind::Success { .. } => "success",
            SchemaKind::Custom { .. } => "custom",
        }
    }

    /// Scalar variants that map to a single provider call.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaKind::String
                | SchemaKind::Format { .. }
                | SchemaKind::Number
                | SchemaKind::BigInt
                | SchemaKind::Boolean
                | SchemaKind::Date
                | SchemaKind::Null
                | SchemaKind::Undefined
                | SchemaKind::Void
                | SchemaKind::Symbol
                | SchemaKind::Nan
                | SchemaKind::Literal { .. }
                | SchemaKind::Enum { .. }
        )
    }
}

impl Deref for Schema {
    type Target = SchemaNode;

    fn deref(&self) -> &SchemaNode {
        &self.0
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
