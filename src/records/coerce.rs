//! Lenient value coercion
//!
//! Spreadsheet cells arrive as numbers, formatted strings ("AED 1,200"),
//! blanks or nulls. These helpers turn them into plain `f64` / `String`
//! values without ever failing.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Currency codes, currency symbols, whitespace and thousands separators
fn noise() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:aed|dhs?|usd|eur|gbp|inr)\.?|[$€£¥₹,\s]+")
            .expect("amount noise pattern is valid")
    })
}

/// Longest leading decimal number
fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("leading number pattern is valid")
    })
}

/// Parse a formatted amount string
///
/// Only currency tokens, symbols, whitespace and thousands separators are
/// dropped; any other letter ends the number. Anything that does not yield
/// a finite number becomes `0.0`.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned = noise().replace_all(raw.trim(), "");
    leading_number()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|x| x.is_finite())
        .unwrap_or(0.0)
}

/// Coerce a JSON value to a finite number
pub fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|x| x.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_amount(s),
        _ => 0.0,
    }
}

/// Coerce a JSON value to trimmed text; null and missing become empty
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// First alias present in the object with a non-null value
pub fn field<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|v| !v.is_null())
}

/// Text under the first matching alias, empty if none
pub fn text_field(object: &Map<String, Value>, aliases: &[&str]) -> String {
    field(object, aliases).map(text).unwrap_or_default()
}

/// Number under the first matching alias, zero if none
pub fn number_field(object: &Map<String, Value>, aliases: &[&str]) -> f64 {
    field(object, aliases).map(number).unwrap_or(0.0)
}
