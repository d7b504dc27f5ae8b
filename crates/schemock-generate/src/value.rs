use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};

use schemock_core::LiteralValue;

/// A generated sample value.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    BigInt(i128),
    Text(String),
    Date(DateTime<Utc>),
    /// Symbol carrying its description.
    Symbol(String),
    Array(Vec<GeneratedValue>),
    /// Object fields in insertion order.
    Object(Vec<(String, GeneratedValue)>),
    /// Map entries in insertion order.
    Map(Vec<(GeneratedValue, GeneratedValue)>),
    /// Unique items in insertion order.
    Set(Vec<GeneratedValue>),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, GeneratedValue::Undefined)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            GeneratedValue::BigInt(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[GeneratedValue]> {
        match self {
            GeneratedValue::Array(items) | GeneratedValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            GeneratedValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Field lookup on objects.
    pub fn get(&self, key: &str) -> Option<&GeneratedValue> {
        match self {
            GeneratedValue::Object(fields) => fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Number of items, fields, or entries for containers; characters for text.
    pub fn len(&self) -> Option<usize> {
        match self {
            GeneratedValue::Text(value) => Some(value.chars().count()),
            GeneratedValue::Array(items) | GeneratedValue::Set(items) => Some(items.len()),
            GeneratedValue::Object(fields) => Some(fields.len()),
            GeneratedValue::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            GeneratedValue::Undefined => "undefined",
            GeneratedValue::Null => "null",
            GeneratedValue::Bool(_) => "boolean",
            GeneratedValue::Int(_) | GeneratedValue::Float(_) => "number",
            GeneratedValue::BigInt(_) => "big_int",
            GeneratedValue::Text(_) => "string",
            GeneratedValue::Date(_) => "date",
            GeneratedValue::Symbol(_) => "symbol",
            GeneratedValue::Array(_) => "array",
            GeneratedValue::Object(_) => "object",
            GeneratedValue::Map(_) => "map",
            GeneratedValue::Set(_) => "set",
        }
    }

    /// Text form used when the value is embedded in a template or used as a key.
    pub fn text_form(&self) -> String {
        match self {
            GeneratedValue::Undefined => "undefined".to_string(),
            GeneratedValue::Null => "null".to_string(),
            GeneratedValue::Bool(value) => value.to_string(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => value.to_string(),
            GeneratedValue::BigInt(value) => value.to_string(),
            GeneratedValue::Text(value) | GeneratedValue::Symbol(value) => value.clone(),
            GeneratedValue::Date(value) => value.to_rfc3339_opts(SecondsFormat::Millis, true),
            other => other.to_json().to_string(),
        }
    }

    /// JSON rendering: undefined object fields are dropped, big ints become
    /// strings, dates RFC 3339, maps arrays of `[key, value]` pairs.
    pub fn to_json(&self) -> Value {
        match self {
            GeneratedValue::Undefined | GeneratedValue::Null => Value::Null,
            GeneratedValue::Bool(value) => Value::Bool(*value),
            GeneratedValue::Int(value) => Value::Number((*value).into()),
            GeneratedValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            GeneratedValue::BigInt(value) => Value::String(value.to_string()),
            GeneratedValue::Text(value) | GeneratedValue::Symbol(value) => {
                Value::String(value.clone())
            }
            GeneratedValue::Date(value) => {
                Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            GeneratedValue::Array(items) | GeneratedValue::Set(items) => {
                Value::Array(items.iter().map(GeneratedValue::to_json).collect())
            }
            GeneratedValue::Object(fields) => {
                let mut map = Map::new();
                for (name, value) in fields {
                    if !value.is_undefined() {
                        map.insert(name.clone(), value.to_json());
                    }
                }
                Value::Object(map)
            }
            GeneratedValue::Map(entries) => Value::Array(
                entries
                    .iter()
                    .map(|(key, value)| Value::Array(vec![key.to_json(), value.to_json()]))
                    .collect(),
            ),
        }
    }

    /// Converts a declared JSON value (defaults, catch values).
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => GeneratedValue::Null,
            Value::Bool(value) => GeneratedValue::Bool(*value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => GeneratedValue::Int(value),
                None => GeneratedValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(value) => GeneratedValue::Text(value.clone()),
            Value::Array(items) => {
                GeneratedValue::Array(items.iter().map(GeneratedValue::from_json).collect())
            }
            Value::Object(map) => GeneratedValue::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), GeneratedValue::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&LiteralValue> for GeneratedValue {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Null => GeneratedValue::Null,
            LiteralValue::Bool(value) => GeneratedValue::Bool(*value),
            LiteralValue::Int(value) => GeneratedValue::Int(*value),
            LiteralValue::Float(value) => GeneratedValue::Float(*value),
            LiteralValue::Text(value) => GeneratedValue::Text(value.clone()),
        }
    }
}

/// Outcome of generating one schema slot.
///
/// `Omit` comes from exact-optional wrappers: objects drop the key, other
/// containers regenerate the unwrapped schema. It never reaches output data.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(GeneratedValue),
    Omit,
    Null,
}

impl Slot {
    pub fn into_value(self) -> GeneratedValue {
        match self {
            Slot::Value(value) => value,
            Slot::Omit => GeneratedValue::Undefined,
            Slot::Null => GeneratedValue::Null,
        }
    }

    /// Value a consistency slot records, if any.
    pub fn recorded(&self) -> Option<GeneratedValue> {
        match self {
            Slot::Value(value) => Some(value.clone()),
            Slot::Null => Some(GeneratedValue::Null),
            Slot::Omit => None,
        }
    }

    pub fn is_omitted(&self) -> bool {
        matches!(self, Slot::Omit)
    }
}

/// Inserts a field, replacing an existing field with the same name in place.
pub(crate) fn upsert_field(fields: &mut Vec<(String, GeneratedValue)>, name: &str, value: GeneratedValue) {
    match fields.iter_mut().find(|(existing, _)| existing == name) {
        Some((_, slot)) => *slot = value,
        None => fields.push((name.to_string(), value)),
    }
}
