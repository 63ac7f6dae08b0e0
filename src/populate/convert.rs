//! Text to typed value conversion
//!
//! Conversion is lenient: malformed text never produces an error here.
//! Leaf conversions either fall back to a zero value or report `None`,
//! which leaves the field untouched; collection elements that fail to
//! convert are dropped.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, fmt::strtime};
use serde_json::{Map, Value};

use crate::duration;
use crate::populate::descriptor::{FieldKind, TimeKind};
use crate::populate::value::ConfigValue;

/// Whether `text` is one of the truthy spellings `true`, `yes`, `on`, `1`
///
/// Case-insensitive; anything else, including the empty string, is false.
pub fn is_truthy(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

pub fn parse_uint(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

/// Parse a finite decimal
///
/// `NaN` and infinities are rejected. Exponent notation (`1e5`) is accepted.
pub fn parse_finite(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parse a decimal, `0.0` on failure
pub fn parse_float(text: &str) -> f64 {
    parse_finite(text).unwrap_or(0.0)
}

/// Parse a timestamp of the given representation
///
/// With a `layout` the text is read with `strptime`; without one the
/// ISO 8601 forms jiff understands are accepted. An instant written
/// without an offset is taken to be UTC.
pub fn parse_time(kind: TimeKind, text: &str, layout: Option<&str>) -> Option<ConfigValue> {
    let text = text.trim();
    match layout {
        Some(layout) => {
            let parsed = strtime::parse(layout, text).ok()?;
            match kind {
                TimeKind::Instant => parsed
                    .to_timestamp()
                    .ok()
                    .or_else(|| utc(parsed.to_datetime().ok()?))
                    .map(ConfigValue::Instant),
                TimeKind::DateTime => parsed.to_datetime().ok().map(ConfigValue::DateTime),
                TimeKind::Date => parsed.to_date().ok().map(ConfigValue::Date),
            }
        }
        None => match kind {
            TimeKind::Instant => text
                .parse::<Timestamp>()
                .ok()
                .or_else(|| utc(text.parse::<DateTime>().ok()?))
                .map(ConfigValue::Instant),
            TimeKind::DateTime => text.parse::<DateTime>().ok().map(ConfigValue::DateTime),
            TimeKind::Date => text.parse::<Date>().ok().map(ConfigValue::Date),
        },
    }
}

fn utc(datetime: DateTime) -> Option<Timestamp> {
    datetime
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

fn zero_time(kind: TimeKind) -> ConfigValue {
    match kind {
        TimeKind::Instant => ConfigValue::Instant(Timestamp::default()),
        TimeKind::DateTime => ConfigValue::DateTime(DateTime::default()),
        TimeKind::Date => ConfigValue::Date(Date::default()),
    }
}

/// Convert the resolved text of a leaf field
///
/// `None` means the field keeps its current value. Composite kinds are
/// handled by the engine and always yield `None` here.
pub fn scalar(kind: &FieldKind, text: &str, layout: Option<&str>) -> Option<ConfigValue> {
    match kind {
        FieldKind::String => Some(ConfigValue::String(text.to_string())),
        FieldKind::Int => parse_int(text).map(ConfigValue::Int),
        FieldKind::UInt => parse_uint(text).map(ConfigValue::UInt),
        FieldKind::Float => Some(ConfigValue::Float(parse_float(text))),
        FieldKind::Bool => Some(ConfigValue::Bool(is_truthy(text))),
        FieldKind::Duration => Some(ConfigValue::Duration(duration::parse(text))),
        FieldKind::Timestamp(time) => {
            Some(parse_time(*time, text, layout).unwrap_or_else(|| zero_time(*time)))
        }
        FieldKind::Struct(_) | FieldKind::Seq(_) | FieldKind::Map(_) => None,
    }
}

/// Convert one element of a sequence or one value of a map
///
/// `None` drops the element.
pub fn element(kind: &FieldKind, text: &str, layout: Option<&str>) -> Option<ConfigValue> {
    match kind {
        FieldKind::String => Some(ConfigValue::String(text.to_string())),
        FieldKind::Int => parse_int(text).map(ConfigValue::Int),
        FieldKind::UInt => parse_uint(text).map(ConfigValue::UInt),
        FieldKind::Float => parse_finite(text).map(ConfigValue::Float),
        FieldKind::Bool => {
            let text = text.trim();
            (!text.is_empty()).then(|| ConfigValue::Bool(is_truthy(text)))
        }
        FieldKind::Duration => {
            let text = text.trim();
            (!text.is_empty()).then(|| ConfigValue::Duration(duration::parse(text)))
        }
        FieldKind::Timestamp(time) => parse_time(*time, text, layout),
        FieldKind::Struct(_) | FieldKind::Seq(_) | FieldKind::Map(_) => None,
    }
}

/// Split a flattened sequence on `,`, removing every `"`
///
/// An empty value is an empty sequence.
pub fn split_sequence(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.replace('"', "")).collect()
}

/// Number of elements in a flattened sequence, `0` if it is not valid JSON
/// once the brackets are restored
pub fn element_count(raw: &str) -> usize {
    serde_json::from_str::<Vec<Value>>(&format!("[{raw}]"))
        .map(|items| items.len())
        .unwrap_or(0)
}

/// Keys of a flattened mapping, empty if it is not valid JSON once the
/// braces are restored
pub fn object_keys(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    serde_json::from_str::<Map<String, Value>>(&format!("{{{raw}}}"))
        .map(|map| map.into_iter().map(|(key, _)| key).collect())
        .unwrap_or_default()
}

/// Inline `key:value` pairs of a flattened mapping
///
/// Pairs without a `:` or with an empty key are skipped.
pub fn pairs(raw: &str) -> Vec<(String, String)> {
    let strip = |text: &str| text.trim().trim_matches('"').trim().to_string();

    raw.split(',')
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once(':')?;
            let key = strip(key);
            (!key.is_empty()).then(|| (key, strip(value)))
        })
        .collect()
}
