//! Normalizers turning extracted, loosely typed payloads into domain records.
//!
//! | Normalizer | Input | Output |
//! |------------|-------|--------|
//! | [`signal`] | [`signal::RawSignal`] + grounding chunks | [`crate::TradingSignal`] |
//! | [`news`] | extracted JSON object | `Vec<`[`crate::NewsArticle`]`>` |
//! | [`chat`] | reply text | trimmed text / [`crate::ChatTurn`] |

pub mod chat;
pub mod news;
pub mod signal;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts any JSON scalar as text; numbers keep their JSON rendering.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Accepts a JSON number or a numeric string.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    })
}

/// Nested object that degrades to `None` when the model sent anything else.
pub(crate) fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ Value::Object(_) => Ok(serde_json::from_value(value)
            .map_err(|error| tracing::warn!(%error, "unreadable nested object; using defaults"))
            .ok()),
        other => {
            tracing::warn!(value = %other, "expected nested object; using defaults");
            Ok(None)
        }
    }
}
