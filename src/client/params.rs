//! Request parameters
//!
//! A string/number mapping, keys sorted, that can be sent either as a JSON
//! body or flattened into a query string.

use serde_json::{Map, Number, Value};

/// Parameters for one backend operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a text parameter
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Builder method: add an integer parameter
    pub fn number(mut self, key: impl Into<String>, value: impl Into<Number>) -> Self {
        self.0.insert(key.into(), Value::Number(value.into()));
        self
    }

    /// Builder method: add a decimal amount; non-finite amounts are sent as 0
    pub fn amount(mut self, key: impl Into<String>, value: f64) -> Self {
        let number = Number::from_f64(value).unwrap_or_else(|| Number::from(0));
        self.0.insert(key.into(), Value::Number(number));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All parameters as query-string pairs
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), query_value(v)))
            .collect()
    }

    /// Selected parameters as query-string pairs, skipping absent keys
    pub fn pairs_for(&self, keys: &[&str]) -> Vec<(String, String)> {
        keys.iter()
            .filter_map(|k| self.0.get(*k).map(|v| (k.to_string(), query_value(v))))
            .collect()
    }

    /// JSON object body
    pub fn to_body(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Percent-encode pairs and append them to a URL's existing query
pub fn append_query(url: &mut reqwest::Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }

    let extra = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&{}", existing, extra),
        _ => extra,
    };
    url.set_query(Some(&query));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_flatten_numbers_and_text() {
        let params = Params::new()
            .number("month", 3)
            .text("monthName", "March")
            .amount("Amount", 1250.5);

        let pairs = params.pairs();
        assert!(pairs.contains(&("month".to_string(), "3".to_string())));
        assert!(pairs.contains(&("monthName".to_string(), "March".to_string())));
        assert!(pairs.contains(&("Amount".to_string(), "1250.5".to_string())));
    }

    #[test]
    fn test_append_query_encodes_and_keeps_existing() {
        let mut url = reqwest::Url::parse("https://script.google.com/macros/s/abc/exec?v=2").unwrap();
        append_query(
            &mut url,
            &[("period".to_string(), "March 2026".to_string())],
        );
        assert_eq!(url.query(), Some("v=2&period=March%202026"));
    }

    #[test]
    fn test_pairs_for_skips_missing() {
        let params = Params::new().text("action", "getTable");
        let pairs = params.pairs_for(&["action", "key"]);
        assert_eq!(pairs, vec![("action".to_string(), "getTable".to_string())]);
    }

    #[test]
    fn test_non_finite_amount_is_zero() {
        let params = Params::new().amount("Amount", f64::NAN);
        assert_eq!(params.get("Amount"), Some(&Value::Number(Number::from(0))));
    }
}
