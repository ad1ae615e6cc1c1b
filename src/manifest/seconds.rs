//! Lenient seconds field: accepts `12`, `12.5` or `"12"`.
//!
//! Zero, missing and unparsable values mean "not set" so the caller's default
//! applies. Negative values survive as `Duration::ZERO` and are later raised to the
//! minimum display floor. Anything longer than a day is clamped to a day.

use std::time::Duration;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const MAX_SECONDS: f64 = 86_400.0;

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

pub(crate) fn from_secs(v: f64) -> Option<Duration> {
    if !v.is_finite() || v == 0.0 {
        return None;
    }
    if v < 0.0 {
        return Some(Duration::ZERO);
    }
    Duration::try_from_secs_f64(v.min(MAX_SECONDS)).ok()
}

pub(crate) fn deserialize<'de, D>(de: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Raw>::deserialize(de)?;
    Ok(match raw {
        Some(Raw::Number(v)) => from_secs(v),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok().and_then(from_secs),
        Some(Raw::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize")]
        d: Option<Duration>,
    }

    fn parse(json: &str) -> Option<Duration> {
        serde_json::from_str::<Probe>(json).unwrap().d
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"d": 12}"#), Some(Duration::from_secs(12)));
        assert_eq!(parse(r#"{"d": "8"}"#), Some(Duration::from_secs(8)));
        assert_eq!(parse(r#"{"d": 1.5}"#), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn zero_missing_and_garbage_are_unset() {
        assert_eq!(parse(r#"{"d": 0}"#), None);
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"d": null}"#), None);
        assert_eq!(parse(r#"{"d": "soon"}"#), None);
        assert_eq!(parse(r#"{"d": [1]}"#), None);
    }

    #[test]
    fn huge_values_are_clamped_to_a_day() {
        assert_eq!(parse(r#"{"d": 1e19}"#), Some(Duration::from_secs(86_400)));
        assert_eq!(parse(r#"{"d": "1e300"}"#), Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn negative_becomes_zero() {
        assert_eq!(parse(r#"{"d": -4}"#), Some(Duration::ZERO));
    }
}
