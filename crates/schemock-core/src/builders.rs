//! Constructors and chainable refinements for building schema trees in code.
//!
//! Every refinement returns a new node; the receiver is left untouched.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::checks::{Check, NumberFormat, Overwrite, StringFormat};
use crate::schema::{Field, LiteralValue, Schema, SchemaKind, TemplatePart};

impl Schema {
    pub fn string() -> Schema {
        Schema::new(SchemaKind::String)
    }

    /// Formatted string carrying the format's default pattern, if any.
    pub fn format(format: StringFormat) -> Schema {
        Schema::new(SchemaKind::Format {
            format,
            pattern: format.default_pattern().map(str::to_string),
        })
    }

    /// String format known only by its pattern.
    pub fn pattern_format(pattern: impl Into<String>) -> Schema {
        Schema::new(SchemaKind::Format {
            format: StringFormat::Regex,
            pattern: Some(pattern.into()),
        })
    }

    pub fn email() -> Schema {
        Schema::format(StringFormat::Email)
    }

    pub fn url() -> Schema {
        Schema::format(StringFormat::Url)
    }

    pub fn uuid() -> Schema {
        Schema::format(StringFormat::Uuid)
    }

    pub fn number() -> Schema {
        Schema::new(SchemaKind::Number)
    }

    /// Safe integer number.
    pub fn int() -> Schema {
        Schema::number().with_check(Check::NumberFormat {
            format: NumberFormat::SafeInt,
        })
    }

    pub fn big_int() -> Schema {
        Schema::new(SchemaKind::BigInt)
    }

    pub fn boolean() -> Schema {
        Schema::new(SchemaKind::Boolean)
    }

    pub fn date() -> Schema {
        Schema::new(SchemaKind::Date)
    }

    pub fn null() -> Schema {
        Schema::new(SchemaKind::Null)
    }

    pub fn undefined() -> Schema {
        Schema::new(SchemaKind::Undefined)
    }

    pub fn void() -> Schema {
        Schema::new(SchemaKind::Void)
    }

    pub fn symbol() -> Schema {
        Schema::new(SchemaKind::Symbol)
    }

    pub fn nan() -> Schema {
        Schema::new(SchemaKind::Nan)
    }

    pub fn any() -> Schema {
        Schema::new(SchemaKind::Any)
    }

    pub fn unknown() -> Schema {
        Schema::new(SchemaKind::Unknown)
    }

    pub fn never() -> Schema {
        Schema::new(SchemaKind::Never)
    }

    pub fn literal(value: impl Into<LiteralValue>) -> Schema {
        Schema::new(SchemaKind::Literal {
            values: vec![value.into()],
        })
    }

    pub fn enumeration<I, V>(values: I) -> Schema
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralValue>,
    {
        Schema::new(SchemaKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn template_literal(parts: Vec<TemplatePart>) -> Schema {
        Schema::new(SchemaKind::TemplateLiteral { parts })
    }

    pub fn array(element: Schema) -> Schema {
        Schema::new(SchemaKind::Array { element })
    }

    pub fn tuple(items: Vec<Schema>) -> Schema {
        Schema::new(SchemaKind::Tuple { items, rest: None })
    }

    pub fn tuple_with_rest(items: Vec<Schema>, rest: Schema) -> Schema {
        Schema::new(SchemaKind::Tuple {
            items,
            rest: Some(rest),
        })
    }

    pub fn object<I, K>(fields: I) -> Schema
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::new(SchemaKind::Object {
            fields: fields
                .into_iter()
                .map(|(name, schema)| Field {
                    name: name.into(),
                    schema,
                })
                .collect(),
        })
    }

    pub fn record(key: Schema, value: Schema) -> Schema {
        Schema::new(SchemaKind::Record { key, value })
    }

    pub fn map(key: Schema, value: Schema) -> Schema {
        Schema::new(SchemaKind::Map { key, value })
    }

    pub fn set(element: Schema) -> Schema {
        Schema::new(SchemaKind::Set { element })
    }

    pub fn union(options: Vec<Schema>) -> Schema {
        Schema::new(SchemaKind::Union { options })
    }

    pub fn discriminated_union(discriminator: impl Into<String>, options: Vec<Schema>) -> Schema {
        Schema::new(SchemaKind::DiscriminatedUnion {
            discriminator: discriminator.into(),
            options,
        })
    }

    pub fn intersection(left: Schema, right: Schema) -> Schema {
        Schema::new(SchemaKind::Intersection { left, right })
    }

    pub fn lazy(reference: impl Into<String>) -> Schema {
        Schema::new(SchemaKind::Lazy {
            reference: reference.into(),
        })
    }

    pub fn transform(id: impl Into<String>) -> Schema {
        Schema::new(SchemaKind::Transform { id: id.into() })
    }

    pub fn custom(name: impl Into<String>) -> Schema {
        Schema::new(SchemaKind::Custom { name: name.into() })
    }

    pub fn optional(&self) -> Schema {
        Schema::new(SchemaKind::Optional {
            inner: self.clone(),
        })
    }

    pub fn exact_optional(&self) -> Schema {
        Schema::new(SchemaKind::ExactOptional {
            inner: self.clone(),
        })
    }

    pub fn nullable(&self) -> Schema {
        Schema::new(SchemaKind::Nullable {
            inner: self.clone(),
        })
    }

    pub fn nullish(&self) -> Schema {
        self.nullable().optional()
    }

    pub fn default_value(&self, value: impl Into<Value>) -> Schema {
        Schema::new(SchemaKind::Default {
            inner: self.clone(),
            value: value.into(),
        })
    }

    pub fn prefault(&self, value: impl Into<Value>) -> Schema {
        Schema::new(SchemaKind::Prefault {
            inner: self.clone(),
            value: value.into(),
        })
    }

    pub fn readonly(&self) -> Schema {
        Schema::new(SchemaKind::Readonly {
            inner: self.clone(),
        })
    }

    pub fn non_optional(&self) -> Schema {
        Schema::new(SchemaKind::NonOptional {
            inner: self.clone(),
        })
    }

    pub fn catch(&self, value: impl Into<Value>) -> Schema {
        Schema::new(SchemaKind::Catch {
            inner: self.clone(),
            value: value.into(),
        })
    }

    pub fn success(&self) -> Schema {
        Schema::new(SchemaKind::Success {
            inner: self.clone(),
        })
    }

    pub fn pipe(&self, output: Schema) -> Schema {
        Schema::new(SchemaKind::Pipe {
            input: self.clone(),
            output,
        })
    }

    /// Pipes into the named transform.
    pub fn then(&self, transform_id: impl Into<String>) -> Schema {
        self.pipe(Schema::transform(transform_id))
    }

    pub fn and(&self, other: Schema) -> Schema {
        Schema::intersection(self.clone(), other)
    }

    pub fn or(&self, other: Schema) -> Schema {
        Schema::union(vec![self.clone(), other])
    }

    pub fn min_length(&self, value: usize) -> Schema {
        self.with_check(Check::MinLength { value })
    }

    pub fn max_length(&self, value: usize) -> Schema {
        self.with_check(Check::MaxLength { value })
    }

    pub fn length(&self, value: usize) -> Schema {
        self.with_check(Check::Length { value })
    }

    pub fn min_size(&self, value: usize) -> Schema {
        self.with_check(Check::MinSize { value })
    }

    pub fn max_size(&self, value: usize) -> Schema {
        self.with_check(Check::MaxSize { value })
    }

    pub fn size(&self, value: usize) -> Schema {
        self.with_check(Check::Size { value })
    }

    pub fn starts_with(&self, value: impl Into<String>) -> Schema {
        self.with_check(Check::StartsWith {
            value: value.into(),
        })
    }

    pub fn ends_with(&self, value: impl Into<String>) -> Schema {
        self.with_check(Check::EndsWith {
            value: value.into(),
        })
    }

    pub fn includes(&self, value: impl Into<String>) -> Schema {
        self.with_check(Check::Includes {
            value: value.into(),
        })
    }

    pub fn regex(&self, pattern: impl Into<String>) -> Schema {
        self.with_check(Check::Regex {
            pattern: pattern.into(),
        })
    }

    pub fn min(&self, value: f64) -> Schema {
        self.with_check(Check::GreaterThan {
            value,
            inclusive: true,
        })
    }

    pub fn max(&self, value: f64) -> Schema {
        self.with_check(Check::LessThan {
            value,
            inclusive: true,
        })
    }

    pub fn gt(&self, value: f64) -> Schema {
        self.with_check(Check::GreaterThan {
            value,
            inclusive: false,
        })
    }

    pub fn lt(&self, value: f64) -> Schema {
        self.with_check(Check::LessThan {
            value,
            inclusive: false,
        })
    }

    pub fn multiple_of(&self, value: f64) -> Schema {
        self.with_check(Check::MultipleOf { value })
    }

    pub fn number_format(&self, format: NumberFormat) -> Schema {
        self.with_check(Check::NumberFormat { format })
    }

    pub fn big_min(&self, value: i128) -> Schema {
        self.with_check(Check::BigIntGreaterThan {
            value,
            inclusive: true,
        })
    }

    pub fn big_max(&self, value: i128) -> Schema {
        self.with_check(Check::BigIntLessThan {
            value,
            inclusive: true,
        })
    }

    pub fn min_date(&self, value: DateTime<Utc>) -> Schema {
        self.with_check(Check::MinDate { value })
    }

    pub fn max_date(&self, value: DateTime<Utc>) -> Schema {
        self.with_check(Check::MaxDate { value })
    }

    pub fn overwrite(&self, transform: Overwrite) -> Schema {
        self.with_check(Check::Overwrite { transform })
    }

    pub fn to_lowercase(&self) -> Schema {
        self.overwrite(Overwrite::Lowercase)
    }

    pub fn to_uppercase(&self) -> Schema {
        self.overwrite(Overwrite::Uppercase)
    }

    pub fn trim(&self) -> Schema {
        self.overwrite(Overwrite::Trim)
    }

    pub fn slugify(&self) -> Schema {
        self.overwrite(Overwrite::Slugify)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Text(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::Text(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int(value as i64)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Float(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

impl From<&str> for TemplatePart {
    fn from(value: &str) -> Self {
        TemplatePart::Text(value.to_string())
    }
}

impl From<Schema> for TemplatePart {
    fn from(value: Schema) -> Self {
        TemplatePart::Schema(value)
    }
}
