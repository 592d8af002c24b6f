//! Value coercion matching the host framework's loose typing.
//!
//! Publishers and the ad endpoint both hand us JSON whose scalar types are not
//! reliable (`"300"` vs `300`, `0` meaning "unset"). The helpers here coerce
//! those values the way the host runtime does so the adapter's output matches
//! what the endpoint and the auction expect.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value as Json;
use std::fmt;

/// Coerce an optional JSON value to a number.
///
/// Absent values become `NaN`, `null` becomes `0`, booleans become `0`/`1`,
/// strings are parsed with [`string_to_number`], a single-element array
/// coerces its element and every other array or object is `NaN`.
#[must_use]
pub fn to_number(value: Option<&Json>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Json::Null) => 0.0,
        Some(Json::Bool(b)) => f64::from(u8::from(*b)),
        Some(Json::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Json::String(s)) => string_to_number(s),
        Some(Json::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single @ (Json::Number(_) | Json::String(_) | Json::Null)] => {
                if single.is_null() {
                    0.0
                } else {
                    to_number(Some(single))
                }
            }
            _ => f64::NAN,
        },
        Some(Json::Object(_)) => f64::NAN,
    }
}

/// Parse a string the way the host's `Number(string)` does.
///
/// Surrounding whitespace is ignored and a blank string is `0`. Decimal and
/// exponent forms, signed `Infinity`, and unsigned `0x`/`0o`/`0b` integers
/// are accepted. Anything else is `NaN`.
#[must_use]
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return match u128::from_str_radix(&trimmed[2..], radix) {
            Ok(n) if !trimmed[2..].starts_with(['+', '-']) => n as f64,
            _ => f64::NAN,
        };
    }

    // Rust accepts spellings like "inf" and "NaN" that the host rejects.
    let is_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a number the way the host stringifies it (`14.0` is `"14"`).
#[must_use]
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        format!("{n}")
    }
}

/// Render a JSON value the way the host interpolates it into a string.
///
/// Strings are taken verbatim and numbers go through [`number_to_string`].
#[must_use]
pub fn to_display_string(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Number(n) => number_to_string(n.as_f64().unwrap_or(f64::NAN)),
        other => other.to_string(),
    }
}

/// Whether the host would consider this number truthy.
fn is_truthy_number(n: f64) -> bool {
    n != 0.0 && !n.is_nan()
}

/// Visitor turning any JSON scalar into an optional string.
///
/// When `truthy_only` is set, scalars the host treats as falsy (`""`, `0`,
/// `false`) collapse to `None`. Arrays and objects are skipped and read as
/// `None`.
struct ScalarStringVisitor {
    truthy_only: bool,
}

impl ScalarStringVisitor {
    fn keep(&self, value: String, truthy: bool) -> Option<String> {
        if self.truthy_only && !truthy {
            None
        } else {
            Some(value)
        }
    }
}

impl<'de> Visitor<'de> for ScalarStringVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.keep(value.to_string(), !value.is_empty()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let truthy = !value.is_empty();
        Ok(self.keep(value, truthy))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.keep(value.to_string(), value != 0))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.keep(value.to_string(), value != 0))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.keep(number_to_string(value), is_truthy_number(value)))
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(self.keep(value.to_string(), value))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Deserialize a scalar into `Some(text)` only when the host treats it as
/// truthy. Used for publisher-supplied bid params.
///
/// # Errors
///
/// Propagates the underlying deserializer's error.
pub fn deserialize_truthy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarStringVisitor { truthy_only: true })
}

/// Deserialize any scalar into text, keeping falsy values. Used for fields
/// echoed back by the ad endpoint.
///
/// # Errors
///
/// Propagates the underlying deserializer's error.
pub fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(ScalarStringVisitor { truthy_only: false })
}

/// Deserialize a field as `Some(value)` whenever it is present, `null`
/// included. Pair with `#[serde(default)]` so only a missing field is `None`;
/// [`to_number`] treats the two differently.
///
/// # Errors
///
/// Propagates the underlying deserializer's error.
pub fn deserialize_present_value<'de, D>(deserializer: D) -> Result<Option<Json>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::Deserialize;
    Json::deserialize(deserializer).map(Some)
}

/// Deserialize a field that should be a list, reading any other value as
/// `None`. Entries are kept as raw JSON for the caller to filter.
///
/// # Errors
///
/// Propagates the underlying deserializer's error.
pub fn deserialize_lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<Json>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::Deserialize;
    match Json::deserialize(deserializer)? {
        Json::Array(items) => Ok(Some(items)),
        _ => Ok(None),
    }
}
