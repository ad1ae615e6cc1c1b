//! Loosely typed scalar fields.
//!
//! Screens are fed by hand-edited JSON, so flags and counts arrive as booleans,
//! numbers or strings. A value that cannot be read is treated as unset rather than
//! failing the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// JS-style truthiness, so `1`, `"yes"` and `true` all count as set.
pub(crate) fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Optional flag read with [`truthy`]; `null` is unset.
pub(crate) fn flag<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Null => None,
        v => Some(truthy(&v)),
    })
}

/// Optional positive count from `3`, `3.9` or `"3"`. Zero, negatives and garbage are unset.
pub(crate) fn count<'de, D>(de: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let n = match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.min(usize::MAX as f64) as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "flag")]
        on: Option<bool>,
        #[serde(default, deserialize_with = "count")]
        n: Option<usize>,
    }

    fn parse(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn flags_follow_truthiness() {
        assert_eq!(parse(r#"{"on": true}"#).on, Some(true));
        assert_eq!(parse(r#"{"on": "true"}"#).on, Some(true));
        assert_eq!(parse(r#"{"on": 1}"#).on, Some(true));
        assert_eq!(parse(r#"{"on": 0}"#).on, Some(false));
        assert_eq!(parse(r#"{"on": ""}"#).on, Some(false));
        assert_eq!(parse(r#"{"on": null}"#).on, None);
        assert_eq!(parse(r#"{}"#).on, None);
    }

    #[test]
    fn counts_accept_numbers_and_strings() {
        assert_eq!(parse(r#"{"n": 3}"#).n, Some(3));
        assert_eq!(parse(r#"{"n": "4"}"#).n, Some(4));
        assert_eq!(parse(r#"{"n": 2.7}"#).n, Some(2));
    }

    #[test]
    fn bad_counts_are_unset() {
        for json in [r#"{"n": -1}"#, r#"{"n": 0}"#, r#"{"n": "many"}"#, r#"{"n": [2]}"#] {
            assert_eq!(parse(json).n, None, "{json}");
        }
    }
}
