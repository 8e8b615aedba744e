//! Lenient field deserializers for stop records.
//!
//! Stored and imported itineraries come from hand-edited files and older
//! versions of the planner, so `null`, missing and empty values are folded
//! into the field defaults instead of failing the whole record.

use serde::{Deserialize, Deserializer};

use super::stop::{DEFAULT_STOP_NAME, TravelMode};

/// `null` reads as the type's default.
pub(super) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(super) fn default_name() -> String {
    DEFAULT_STOP_NAME.to_string()
}

/// `null` and empty names fall back to the placeholder.
pub(super) fn stop_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|n| !n.is_empty()).unwrap_or_else(default_name))
}

/// Empty and unknown modes read as "no mode".
pub(super) fn travel_mode<'de, D>(deserializer: D) -> Result<Option<TravelMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|value| {
        let mode = TravelMode::parse(value);
        if mode.is_none() && !value.is_empty() {
            log::debug!("Ignoring unknown travel mode {value:?}");
        }
        mode
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolLike {
    Bool(bool),
    Text(String),
}

/// Accepts a JSON boolean or the strings `"true"` / `"false"`.
pub(super) fn bool_like<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolLike>::deserialize(deserializer)? {
        None => Ok(false),
        Some(BoolLike::Bool(value)) => Ok(value),
        Some(BoolLike::Text(text)) => parse_bool(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid boolean {text:?}"))),
    }
}

/// Exact `"true"` / `"false"` parsing shared with the KML reader.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
