//! Forgiving deserializers for profile documents.
//!
//! Profile JSON was historically written by a browser front end that stored
//! form input verbatim, so numbers may arrive as strings, booleans as
//! `"true"`, and anything may be `null`. These helpers coerce such values to
//! the defaults the calculator expects instead of rejecting the document.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};

/// Parse the leading integer of a string the way a form field would:
/// `"30"`, `" 30 "`, `"30%"` and `"30.5"` all read as 30. Anything else is `None`.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer, a numeric string, or null")
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(Some(v.trunc() as i64))
        } else {
            Ok(None)
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_leading_int(v))
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

/// Non-negative count. Negative, missing or unparseable values become 0.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(IntVisitor)?;
    Ok(value
        .map(|v| v.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0))
}

/// Disability percentage clamped into `0..=100`. Unparseable values become 0,
/// which the combiner then ignores.
pub fn deserialize_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(IntVisitor)?;
    Ok(value.map(|v| v.clamp(0, 100) as u8).unwrap_or(0))
}

/// Severity on the 1..=10 symptom scale. Missing values take the midpoint.
pub fn deserialize_severity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = deserializer.deserialize_any(IntVisitor)?;
    Ok(value.map(|v| v.clamp(1, 10) as u8).unwrap_or(5))
}

/// Record id written either as a number (`Date.now()` style) or a string.
pub fn deserialize_record_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer.deserialize_any(IntVisitor)?.unwrap_or(0))
}

/// Boolean that may arrive as `"true"`/`"false"`, `1`/`0` or `null`.
pub fn deserialize_flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl<'de> Visitor<'de> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a boolean or string 'true'/'false'")
        }

        fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v != 0)
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v != 0)
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(matches!(v.trim().to_lowercase().as_str(), "true" | "yes" | "on" | "1"))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(false)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(false)
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}

/// Optional string where `null` and `""` both mean absent. Integers are kept
/// as their decimal text; floats, booleans, lists and objects read as absent.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number, or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrNumberVisitor)
}

/// Plain string where `null` becomes empty.
pub fn deserialize_string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_string(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamp; missing or unparseable values become `None`.
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserialize_optional_string(deserializer)?;
    Ok(raw
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Generated prose that may come back as a string, a list of strings, or
/// `null`. Lists are joined one item per line.
pub fn deserialize_prose<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProseVisitor;

    impl<'de> Visitor<'de> for ProseVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a list of strings, or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut lines = Vec::new();
            while let Some(item) = seq.next_element::<Option<String>>()? {
                if let Some(line) = item.filter(|l| !l.trim().is_empty()) {
                    lines.push(line.trim().to_string());
                }
            }
            Ok((!lines.is_empty()).then(|| lines.join("\n")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(ProseVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "deserialize_count")]
        count: u32,
        #[serde(default, deserialize_with = "deserialize_rating")]
        rating: u8,
        #[serde(default, deserialize_with = "deserialize_flexible_bool")]
        flag: bool,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        label: Option<String>,
    }

    fn fields(json: &str) -> Fields {
        serde_json::from_str(json).expect("json should parse")
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("30"), Some(30));
        assert_eq!(parse_leading_int(" 30 "), Some(30));
        assert_eq!(parse_leading_int("30%"), Some(30));
        assert_eq!(parse_leading_int("30.9"), Some(30));
        assert_eq!(parse_leading_int("-2"), Some(-2));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let p = fields("{}");
        assert_eq!(p.count, 0);
        assert_eq!(p.rating, 0);
        assert!(!p.flag);
        assert!(p.label.is_none());
    }

    #[test]
    fn test_strings_and_nulls_are_coerced() {
        let p = fields(r#"{"count": "3", "rating": "70", "flag": "true", "label": ""}"#);
        assert_eq!(p.count, 3);
        assert_eq!(p.rating, 70);
        assert!(p.flag);
        assert!(p.label.is_none());

        let p = fields(r#"{"count": null, "rating": null, "flag": null, "label": null}"#);
        assert_eq!(p.count, 0);
        assert_eq!(p.rating, 0);
        assert!(!p.flag);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let p = fields(r#"{"count": -4, "rating": 250}"#);
        assert_eq!(p.count, 0);
        assert_eq!(p.rating, 100);

        let p = fields(r#"{"rating": "not a number", "count": 2.7}"#);
        assert_eq!(p.rating, 0);
        assert_eq!(p.count, 2);
    }

    #[test]
    fn test_optional_string_ignores_other_shapes() {
        let p = fields(r#"{"label": 1.5}"#);
        assert!(p.label.is_none());
        let p = fields(r#"{"label": true}"#);
        assert!(p.label.is_none());
        let p = fields(r#"{"label": ["a"], "count": 1}"#);
        assert!(p.label.is_none());
        assert_eq!(p.count, 1);
        let p = fields(r#"{"label": {"first": "J"}}"#);
        assert!(p.label.is_none());
        let p = fields(r#"{"label": 42}"#);
        assert_eq!(p.label.as_deref(), Some("42"));
    }

    #[test]
    fn test_optional_datetime() {
        #[derive(Deserialize)]
        struct Stamp {
            #[serde(default, deserialize_with = "deserialize_optional_datetime")]
            at: Option<DateTime<Utc>>,
        }

        let s: Stamp = serde_json::from_str(r#"{"at":"2024-03-01T12:00:00.000Z"}"#).expect("parse");
        assert!(s.at.is_some());
        let s: Stamp = serde_json::from_str(r#"{"at":"yesterday"}"#).expect("parse");
        assert!(s.at.is_none());
        let s: Stamp = serde_json::from_str("{}").expect("parse");
        assert!(s.at.is_none());
    }

    #[test]
    fn test_prose_accepts_lists() {
        #[derive(Deserialize)]
        struct Steps {
            #[serde(default, deserialize_with = "deserialize_prose")]
            text: Option<String>,
        }

        let s: Steps = serde_json::from_str(r#"{"text":["Get a sleep study", " ", "See a doctor"]}"#)
            .expect("parse");
        assert_eq!(s.text.as_deref(), Some("Get a sleep study\nSee a doctor"));
        let s: Steps = serde_json::from_str(r#"{"text":null}"#).expect("parse");
        assert!(s.text.is_none());
        let s: Steps = serde_json::from_str(r#"{"text":"Keep a diary"}"#).expect("parse");
        assert_eq!(s.text.as_deref(), Some("Keep a diary"));
    }
}
