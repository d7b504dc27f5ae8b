use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A declared check attached to a schema node, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Check {
    /// Minimum string length or array item count.
    MinLength { value: usize },
    /// Maximum string length or array item count.
    MaxLength { value: usize },
    /// Exact string length or array item count.
    Length { value: usize },
    /// Minimum set/map size.
    MinSize { value: usize },
    /// Maximum set/map size.
    MaxSize { value: usize },
    /// Exact set/map size.
    Size { value: usize },
    StartsWith { value: String },
    EndsWith { value: String },
    Includes { value: String },
    /// Regular expression the string must match.
    Regex { pattern: String },
    /// Lower numeric bound.
    GreaterThan { value: f64, inclusive: bool },
    /// Upper numeric bound.
    LessThan { value: f64, inclusive: bool },
    MultipleOf { value: f64 },
    /// Number representation (integer widths, float widths).
    NumberFormat { format: NumberFormat },
    /// Lower big-integer bound.
    BigIntGreaterThan { value: i128, inclusive: bool },
    /// Upper big-integer bound.
    BigIntLessThan { value: i128, inclusive: bool },
    MinDate { value: DateTime<Utc> },
    MaxDate { value: DateTime<Utc> },
    /// Post-processing applied to the parsed value.
    Overwrite { transform: Overwrite },
}

impl Check {
    /// Checks where only the last declared instance is active.
    pub fn is_overwriting(&self) -> bool {
        matches!(
            self,
            Check::StartsWith { .. }
                | Check::EndsWith { .. }
                | Check::Regex { .. }
                | Check::MultipleOf { .. }
                | Check::NumberFormat { .. }
        )
    }

    /// Stable name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Check::MinLength { .. } => "min_length",
            Check::MaxLength { .. } => "max_length",
            Check::Length { .. } => "length",
            Check::MinSize { .. } => "min_size",
            Check::MaxSize { .. } => "max_size",
            Check::Size { .. } => "size",
            Check::StartsWith { .. } => "starts_with",
            Check::EndsWith { .. } => "ends_with",
            Check::Includes { .. } => "includes",
            Check::Regex { .. } => "regex",
            Check::GreaterThan { .. } => "greater_than",
            Check::LessThan { .. } => "less_than",
            Check::MultipleOf { .. } => "multiple_of",
            Check::NumberFormat { .. } => "number_format",
            Check::BigIntGreaterThan { .. } => "big_int_greater_than",
            Check::BigIntLessThan { .. } => "big_int_less_than",
            Check::MinDate { .. } => "min_date",
            Check::MaxDate { .. } => "max_date",
            Check::Overwrite { .. } => "overwrite",
        }
    }
}

/// Numeric representation declared on a number schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    Int,
    SafeInt,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl NumberFormat {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            NumberFormat::Int | NumberFormat::SafeInt | NumberFormat::Int32 | NumberFormat::Uint32
        )
    }

    /// Integer range representable by the format.
    pub fn int_range(self) -> (i64, i64) {
        const MAX_SAFE: i64 = (1 << 53) - 1;
        match self {
            NumberFormat::Int32 => (i32::MIN as i64, i32::MAX as i64),
            NumberFormat::Uint32 => (0, u32::MAX as i64),
            _ => (-MAX_SAFE, MAX_SAFE),
        }
    }

    /// Float range representable by the format.
    pub fn float_range(self) -> (f64, f64) {
        match self {
            NumberFormat::Float32 => (f32::MIN as f64, f32::MAX as f64),
            NumberFormat::Float64 => (f64::MIN, f64::MAX),
            other => {
                let (min, max) = other.int_range();
                (min as f64, max as f64)
            }
        }
    }
}

/// Overwrite-class transform applied after synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overwrite {
    Lowercase,
    Uppercase,
    Trim,
    Slugify,
    /// Named transform resolved by the generator's transform registry.
    Custom { id: String },
}

impl Overwrite {
    pub fn id(&self) -> &str {
        match self {
            Overwrite::Lowercase => "lowercase",
            Overwrite::Uppercase => "uppercase",
            Overwrite::Trim => "trim",
            Overwrite::Slugify => "slugify",
            Overwrite::Custom { id } => id.as_str(),
        }
    }
}

/// Well-known string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Url,
    Jwt,
    Emoji,
    Uuid,
    Guid,
    UuidV4,
    UuidV6,
    UuidV7,
    Nanoid,
    Cuid,
    Cuid2,
    Ulid,
    Xid,
    Ksuid,
    Ipv4,
    Ipv6,
    CidrV4,
    CidrV6,
    Base64,
    Base64Url,
    E164,
    Hostname,
    IsoDate,
    IsoTime,
    IsoDateTime,
    IsoDuration,
    /// A format known only by its declared pattern.
    Regex,
}

impl StringFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::Url => "url",
            StringFormat::Jwt => "jwt",
            StringFormat::Emoji => "emoji",
            StringFormat::Uuid => "uuid",
            StringFormat::Guid => "guid",
            StringFormat::UuidV4 => "uuid_v4",
            StringFormat::UuidV6 => "uuid_v6",
            StringFormat::UuidV7 => "uuid_v7",
            StringFormat::Nanoid => "nanoid",
            StringFormat::Cuid => "cuid",
            StringFormat::Cuid2 => "cuid2",
            StringFormat::Ulid => "ulid",
            StringFormat::Xid => "xid",
            StringFormat::Ksuid => "ksuid",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::CidrV4 => "cidr_v4",
            StringFormat::CidrV6 => "cidr_v6",
            StringFormat::Base64 => "base64",
            StringFormat::Base64Url => "base64_url",
            StringFormat::E164 => "e164",
            StringFormat::Hostname => "hostname",
            StringFormat::IsoDate => "iso_date",
            StringFormat::IsoTime => "iso_time",
            StringFormat::IsoDateTime => "iso_date_time",
            StringFormat::IsoDuration => "iso_duration",
            StringFormat::Regex => "regex",
        }
    }

    /// Pattern a format node declares when built with `Schema::format`.
    pub fn default_pattern(self) -> Option<&'static str> {
        match self {
            StringFormat::Cuid => Some("^c[a-z0-9]{24}$"),
            StringFormat::Cuid2 => Some("^[a-z][a-z0-9]{23}$"),
            StringFormat::Xid => Some("^[0-9a-v]{20}$"),
            StringFormat::Ksuid => Some("^[A-Za-z0-9]{27}$"),
            StringFormat::E164 => Some("^\\+[1-9][0-9]{6,14}$"),
            StringFormat::Hostname => Some("^[a-z][a-z0-9]{2,10}(\\.[a-z]{2,6}){1,2}$"),
            _ => None,
        }
    }
}
