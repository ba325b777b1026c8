//! Permissive decoding for questionnaire answers.
//!
//! Form answers arrive as JSON numbers, numeric strings, empty strings or
//! `null`. None of these helpers ever fail: anything that is not a usable
//! value decodes to `None`, and the calculation falls back to its default.

use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn loose_number(value: Loose) -> Option<f64> {
    match value {
        Loose::Number(n) => Some(n),
        Loose::Text(s) => s.trim().parse::<f64>().ok(),
        Loose::Other(_) => None,
    }
    .filter(|n| n.is_finite())
}

/// Decode a number from a JSON number or numeric string.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_number(Loose::deserialize(deserializer)?))
}

/// Decode a category answer. Blank strings count as unanswered.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s.trim().to_string(),
        Loose::Number(n) => n.to_string(),
        Loose::Other(_) => return Ok(None),
    };
    Ok(Some(value).filter(|s| !s.is_empty()))
}

/// JavaScript-style `value || default`: absent and zero both take the default.
pub fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 => v,
        _ => default,
    }
}

/// Case-insensitive match of an optional answer against an expected value.
pub fn answer_is(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "text")]
        t: Option<String>,
    }

    fn decode(json: &str) -> Field {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_accepts_numbers_and_numeric_strings() {
        assert_eq!(decode(r#"{"n": 4}"#).n, Some(4.0));
        assert_eq!(decode(r#"{"n": 2.5}"#).n, Some(2.5));
        assert_eq!(decode(r#"{"n": " 12 "}"#).n, Some(12.0));
    }

    #[test]
    fn test_number_garbage_is_absent() {
        assert_eq!(decode(r#"{"n": ""}"#).n, None);
        assert_eq!(decode(r#"{"n": null}"#).n, None);
        assert_eq!(decode(r#"{"n": "abc"}"#).n, None);
        assert_eq!(decode(r#"{"n": true}"#).n, None);
        assert_eq!(decode(r#"{"n": [1, 2]}"#).n, None);
        assert_eq!(decode(r#"{"n": "NaN"}"#).n, None);
        assert_eq!(decode("{}").n, None);
    }

    #[test]
    fn test_text_trims_and_drops_blank() {
        assert_eq!(decode(r#"{"t": " led "}"#).t.as_deref(), Some("led"));
        assert_eq!(decode(r#"{"t": "   "}"#).t, None);
        assert_eq!(decode(r#"{"t": null}"#).t, None);
        assert_eq!(decode(r#"{"t": 5}"#).t.as_deref(), Some("5"));
    }

    #[test]
    fn test_or_default_treats_zero_as_missing() {
        assert_eq!(or_default(None, 6.0), 6.0);
        assert_eq!(or_default(Some(0.0), 6.0), 6.0);
        assert_eq!(or_default(Some(3.0), 6.0), 3.0);
    }

    #[test]
    fn test_answer_is_case_insensitive() {
        assert!(answer_is(Some("YES"), "yes"));
        assert!(!answer_is(Some("no"), "yes"));
        assert!(!answer_is(None, "yes"));
    }
}
