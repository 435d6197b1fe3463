//! Lenient decoding for record fields.
//!
//! Records arrive as flat JSON objects written by a dashboard that never
//! validated its inputs, so ids can be numbers or strings, amounts can be
//! numeric strings, and flags can be `0`/`1`. These helpers accept every
//! reasonable spelling and fall back to a neutral value instead of failing
//! the whole record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, Deserializer, Visitor};
use tracing::warn;

/// A scalar field reduced to the forms the decoders care about.
enum Scalar {
    Text(String),
    Integer(i128),
    Float(f64),
    Bool(bool),
    Null,
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Integer(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::Integer(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
        Ok(Scalar::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Scalar, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Scalar, D::Error> {
    deserializer.deserialize_any(ScalarVisitor)
}

fn float_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn scalar_text(value: Scalar) -> Option<String> {
    match value {
        Scalar::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Scalar::Integer(n) => Some(n.to_string()),
        Scalar::Float(f) => Some(float_text(f)),
        Scalar::Bool(_) | Scalar::Null => None,
    }
}

/// Decodes a required record id from a string or a number.
pub(crate) fn record_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text(scalar(deserializer)?).ok_or_else(|| de::Error::custom("record id is empty"))
}

/// Decodes an optional id reference; blank values become `None`.
pub(crate) fn optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(scalar(deserializer)?))
}

/// Decodes free text, trimming it; blank values become `None`.
pub(crate) fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(scalar(deserializer)?))
}

/// Decodes free text, trimming it; blank values become an empty string.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(scalar(deserializer)?).unwrap_or_default())
}

/// Parses an amount the way the record store spells it.
///
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .filter(|d| !d.is_sign_negative() || d.is_zero())
}

/// Decodes a monetary amount, coercing malformed values to zero.
pub(crate) fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let parsed = match scalar(deserializer)? {
        Scalar::Null => return Ok(Decimal::ZERO),
        Scalar::Text(s) => parse_amount(&s).ok_or(s),
        Scalar::Integer(n) => i64::try_from(n)
            .ok()
            .filter(|v| *v >= 0)
            .map(Decimal::from)
            .ok_or_else(|| n.to_string()),
        Scalar::Float(f) => Decimal::from_f64(f)
            .filter(|d| !d.is_sign_negative() || d.is_zero())
            .ok_or_else(|| f.to_string()),
        Scalar::Bool(b) => Err(b.to_string()),
    };

    Ok(parsed.unwrap_or_else(|raw| {
        warn!(raw = %raw, "Malformed amount coerced to zero");
        Decimal::ZERO
    }))
}

/// Parses an ISO-8601 date or timestamp, keeping only the calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts.date());
        }
    }
    None
}

/// Decodes an optional date; anything unparseable becomes `None`.
pub(crate) fn optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    Ok(match scalar(deserializer)? {
        Scalar::Text(s) => {
            let date = parse_date(&s);
            if date.is_none() && !s.trim().is_empty() {
                warn!(raw = %s, "Unparseable record date ignored");
            }
            date
        }
        _ => None,
    })
}

fn scalar_flag(value: Scalar) -> Option<bool> {
    match value {
        Scalar::Bool(b) => Some(b),
        Scalar::Integer(n) => Some(n != 0),
        Scalar::Float(f) => Some(f != 0.0),
        Scalar::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        Scalar::Null => None,
    }
}

/// Decodes an "active" flag; unknown spellings count as active.
pub(crate) fn active_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(scalar_flag(scalar(deserializer)?).unwrap_or(true))
}

/// Decodes a "deleted" flag; unknown spellings count as not deleted.
pub(crate) fn deleted_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(scalar_flag(scalar(deserializer)?).unwrap_or(false))
}

pub(crate) fn enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "record_id")]
        id: String,
        #[serde(default, deserialize_with = "amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "optional_date")]
        date: Option<NaiveDate>,
        #[serde(default = "enabled", deserialize_with = "active_flag")]
        active: bool,
        #[serde(default, deserialize_with = "optional_text")]
        note: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_numeric_and_string_ids_decode_to_same_text() {
        assert_eq!(probe(r#"{"id": 42}"#).id, "42");
        assert_eq!(probe(r#"{"id": "42"}"#).id, "42");
        assert_eq!(probe(r#"{"id": " 42 "}"#).id, "42");
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"id": ""}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(probe(r#"{"id": 1, "amount": 50}"#).amount, dec("50"));
        assert_eq!(probe(r#"{"id": 1, "amount": "125.50"}"#).amount, dec("125.50"));
        assert_eq!(probe(r#"{"id": 1, "amount": 12.5}"#).amount, dec("12.5"));
    }

    #[test]
    fn test_malformed_amounts_coerce_to_zero() {
        assert_eq!(probe(r#"{"id": 1, "amount": "abc"}"#).amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"id": 1, "amount": null}"#).amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"id": 1, "amount": true}"#).amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"id": 1, "amount": -20}"#).amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"id": 1, "amount": "-5.00"}"#).amount, Decimal::ZERO);
        assert_eq!(probe(r#"{"id": 1}"#).amount, Decimal::ZERO);
    }

    #[test]
    fn test_dates_accept_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(probe(r#"{"id": 1, "date": "2025-03-14"}"#).date, expected);
        assert_eq!(
            probe(r#"{"id": 1, "date": "2025-03-14T08:30:00Z"}"#).date,
            expected
        );
        assert_eq!(
            probe(r#"{"id": 1, "date": "2025-03-14T08:30:00.000"}"#).date,
            expected
        );
        assert_eq!(probe(r#"{"id": 1, "date": "14/03/2025"}"#).date, None);
        assert_eq!(probe(r#"{"id": 1, "date": 20250314}"#).date, None);
    }

    #[test]
    fn test_active_flag_spellings() {
        assert!(probe(r#"{"id": 1}"#).active);
        assert!(probe(r#"{"id": 1, "active": 1}"#).active);
        assert!(!probe(r#"{"id": 1, "active": 0}"#).active);
        assert!(!probe(r#"{"id": 1, "active": "false"}"#).active);
        assert!(probe(r#"{"id": 1, "active": "YES"}"#).active);
        assert!(probe(r#"{"id": 1, "active": "unknown"}"#).active);
    }

    #[test]
    fn test_blank_text_becomes_none() {
        assert_eq!(probe(r#"{"id": 1, "note": "   "}"#).note, None);
        assert_eq!(
            probe(r#"{"id": 1, "note": " Fees "}"#).note,
            Some("Fees".to_string())
        );
    }

    #[test]
    fn test_parse_amount_rejects_negative_but_keeps_zero() {
        assert_eq!(parse_amount("0"), Some(Decimal::ZERO));
        assert_eq!(parse_amount("-0"), Some(Decimal::ZERO));
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("1e3"), Some(dec("1000")));
        assert_eq!(parse_amount(""), None);
    }
}
