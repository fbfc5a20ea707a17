//! Lenient field deserializers
//!
//! Canvas section lists coming back from the backend are not trusted to be
//! well formed. A section that is absent, null, or not a list reads as an
//! empty list; entries that are not strings are stringified when scalar and
//! skipped otherwise.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::components::{CanvasComponents, ValueProposition};

pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(list_from_value).unwrap_or_default())
}

pub(crate) fn text_or_list<'de, D>(deserializer: D) -> Result<ValueProposition, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => ValueProposition::Text(text),
        Some(value @ Value::Array(_)) => ValueProposition::List(list_from_value(value)),
        Some(Value::Number(n)) => ValueProposition::Text(n.to_string()),
        _ => ValueProposition::default(),
    })
}

/// Anything but an object reads as an empty canvas
pub(crate) fn components<'de, D>(deserializer: D) -> Result<CanvasComponents, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => {
            CanvasComponents::deserialize(value).unwrap_or_default()
        }
        _ => CanvasComponents::default(),
    })
}

/// Version identifiers: strings as is, numbers stringified
pub(crate) fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Timestamps arrive as RFC 3339 strings or as epoch milliseconds
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        _ => None,
    })
}

fn list_from_value(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(entry_text).collect(),
        _ => Vec::new(),
    }
}

fn entry_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "list")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "text_or_list")]
        vp: ValueProposition,
    }

    fn sample(value: Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn absent_and_null_read_as_empty() {
        assert!(sample(json!({})).items.is_empty());
        assert!(sample(json!({ "items": null })).items.is_empty());
    }

    #[test]
    fn non_list_reads_as_empty() {
        assert!(sample(json!({ "items": "one line" })).items.is_empty());
        assert!(sample(json!({ "items": { "a": 1 } })).items.is_empty());
    }

    #[test]
    fn scalars_are_stringified() {
        let p = sample(json!({ "items": ["a", 2, true, null, {"x": 1}] }));
        assert_eq!(p.items, vec!["a", "2", "true"]);
    }

    #[test]
    fn epoch_millis_timestamp_becomes_rfc3339() {
        #[derive(Deserialize)]
        struct At {
            #[serde(default, deserialize_with = "timestamp")]
            at: Option<String>,
        }
        let at: At = serde_json::from_value(json!({ "at": 0 })).unwrap();
        assert_eq!(at.at.as_deref(), Some("1970-01-01T00:00:00.000Z"));
        let at: At = serde_json::from_value(json!({ "at": "" })).unwrap();
        assert_eq!(at.at, None);
    }

    #[test]
    fn numeric_ids_are_stringified() {
        #[derive(Deserialize)]
        struct Ids {
            #[serde(default, deserialize_with = "id")]
            a: Option<String>,
            #[serde(default, deserialize_with = "id")]
            b: Option<String>,
            #[serde(default, deserialize_with = "id")]
            c: Option<String>,
        }
        let ids: Ids = serde_json::from_value(json!({ "a": "v1_x", "b": 3, "c": [1] })).unwrap();
        assert_eq!(ids.a.as_deref(), Some("v1_x"));
        assert_eq!(ids.b.as_deref(), Some("3"));
        assert_eq!(ids.c, None);
    }

    #[test]
    fn value_proposition_forms() {
        assert_eq!(
            sample(json!({ "vp": "solo" })).vp,
            ValueProposition::Text("solo".into())
        );
        assert_eq!(
            sample(json!({ "vp": ["a", "b"] })).vp,
            ValueProposition::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(sample(json!({ "vp": false })).vp, ValueProposition::default());
    }
}
