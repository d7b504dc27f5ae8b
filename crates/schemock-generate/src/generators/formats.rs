use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::SecondsFormat;
use schemock_core::{Check, Schema, StringFormat};

use crate::constraints::date_range;
use crate::context::{Cursor, GenerationContext};
use crate::errors::GenerationError;
use crate::generators::primitives::matching;
use crate::provider::UuidVersion;
use crate::value::GeneratedValue;

pub(crate) fn format(
    ctx: &mut GenerationContext<'_>,
    schema: &Schema,
    format: StringFormat,
    pattern: Option<&str>,
    cursor: &Cursor,
) -> Result<GeneratedValue, GenerationError> {
    let provider = &mut *ctx.provider;
    let text = match format {
        StringFormat::Email => provider.email(),
        StringFormat::Url => provider.url(),
        StringFormat::Jwt => provider.jwt(),
        StringFormat::Emoji => provider.emoji(),
        StringFormat::Uuid | StringFormat::Guid => provider.uuid(UuidVersion::Any),
        StringFormat::UuidV4 => provider.uuid(UuidVersion::V4),
        StringFormat::UuidV6 => provider.uuid(UuidVersion::V6),
        StringFormat::UuidV7 => provider.uuid(UuidVersion::V7),
        StringFormat::Nanoid => provider.nanoid(),
        StringFormat::Ulid => provider.ulid(),
        StringFormat::Ipv4 => provider.ipv4(),
        StringFormat::Ipv6 => provider.ipv6(),
        StringFormat::CidrV4 => {
            let ip = provider.ipv4();
            format!("{ip}/{}", provider.int(0, 32))
        }
        StringFormat::CidrV6 => {
            let ip = provider.ipv6();
            format!("{ip}/{}", provider.int(0, 128))
        }
        StringFormat::Base64 => STANDARD.encode(provider.word()),
        StringFormat::Base64Url => URL_SAFE_NO_PAD.encode(provider.word()),
        StringFormat::IsoDate | StringFormat::IsoTime | StringFormat::IsoDateTime => {
            let (min, max) =
                date_range(schema.checks()).map_err(|conflict| conflict.at(&cursor.path))?;
            let instant = provider.date(min, max);
            match format {
                StringFormat::IsoDate => instant.format("%Y-%m-%d").to_string(),
                StringFormat::IsoTime => instant.format("%H:%M:%S").to_string(),
                _ => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            }
        }
        StringFormat::IsoDuration => format!(
            "P{}DT{}H{}M{}S",
            provider.int(0, 30),
            provider.int(0, 23),
            provider.int(0, 59),
            provider.int(0, 59)
        ),
        StringFormat::Cuid
        | StringFormat::Cuid2
        | StringFormat::Xid
        | StringFormat::Ksuid
        | StringFormat::E164
        | StringFormat::Hostname
        | StringFormat::Regex => match pattern.or_else(|| declared_regex(schema)) {
            Some(pattern) => matching(ctx, pattern, cursor)?,
            None => ctx.provider.word(),
        },
    };
    Ok(GeneratedValue::Text(text))
}

/// Last declared regex check, if any.
fn declared_regex(schema: &Schema) -> Option<&str> {
    schema.checks().iter().rev().find_map(|check| match check {
        Check::Regex { pattern } => Some(pattern.as_str()),
        _ => None,
    })
}
