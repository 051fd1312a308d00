//! Response envelope handling
//!
//! The backend answers `{ "ok": bool, "data" | "rows" | ...: [...], "error"?: string }`.
//! Field naming varies between deployments, so list payloads are unwrapped
//! by trying several names in a fixed order.

use serde_json::Value;

use super::error::{ClientError, ClientResult};

const SNIPPET_CHARS: usize = 200;

/// First 200 characters of a body, for diagnostics
pub fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

/// Whether a body is an HTML document rather than an API payload
pub fn looks_like_html(body: &str) -> bool {
    let head: String = body.trim_start().chars().take(16).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

/// Validate a response and return its JSON payload
///
/// Empty and HTML bodies are rejected before any JSON parsing.
pub fn validate(status: u16, body: &str) -> ClientResult<Value> {
    if body.trim().is_empty() {
        return Err(ClientError::EmptyBody);
    }
    if looks_like_html(body) {
        return Err(ClientError::HtmlBody);
    }

    let payload: Value = serde_json::from_str(body).map_err(|_| ClientError::NonJson {
        snippet: snippet(body),
    })?;

    if !(200..300).contains(&status) {
        let message = error_field(&payload).unwrap_or_else(|| snippet(body));
        return Err(ClientError::Status { status, message });
    }

    if payload.get("ok") == Some(&Value::Bool(false)) {
        let message = error_field(&payload).unwrap_or_else(|| "API ok=false".to_string());
        return Err(ClientError::Rejected(message));
    }

    Ok(payload)
}

fn error_field(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

/// Unwrap a list payload: `data`, then `named`, then `rows`, else empty
pub fn unwrap_list(payload: &Value, named: &str) -> Vec<Value> {
    ["data", named, "rows"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_rejected_before_parsing() {
        let err = validate(200, "<!DOCTYPE html><html><body>Sign in</body></html>").unwrap_err();
        assert!(matches!(err, ClientError::HtmlBody));

        let err = validate(200, "  \n<HTML><head></head></HTML>").unwrap_err();
        assert!(matches!(err, ClientError::HtmlBody));
    }

    #[test]
    fn test_empty_body() {
        assert!(matches!(validate(200, "").unwrap_err(), ClientError::EmptyBody));
        assert!(matches!(validate(200, "   ").unwrap_err(), ClientError::EmptyBody));
    }

    #[test]
    fn test_non_json_reports_snippet() {
        let body = "x".repeat(500);
        match validate(200, &body).unwrap_err() {
            ClientError::NonJson { snippet } => assert_eq!(snippet.len(), 200),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_error_uses_error_field() {
        let err = validate(500, r#"{"ok":false,"error":"Sheet missing"}"#).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500 - Sheet missing");

        let err = validate(404, r#"{"message":"nope"}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"HTTP 404 - {"message":"nope"}"#);
    }

    #[test]
    fn test_ok_false() {
        let err = validate(200, r#"{"ok":false,"error":"Unknown action"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action");

        let err = validate(200, r#"{"ok":false}"#).unwrap_err();
        assert_eq!(err.to_string(), "API ok=false");
    }

    #[test]
    fn test_missing_ok_is_valid() {
        let payload = validate(200, r#"{"rows":[1,2]}"#).unwrap();
        assert_eq!(payload["rows"], json!([1, 2]));
    }

    #[test]
    fn test_unwrap_order() {
        let payload = json!({"data": [1], "studios": [2], "rows": [3]});
        assert_eq!(unwrap_list(&payload, "studios"), vec![json!(1)]);

        let payload = json!({"studios": [2], "rows": [3]});
        assert_eq!(unwrap_list(&payload, "studios"), vec![json!(2)]);

        let payload = json!({"data": "not a list", "rows": [3]});
        assert_eq!(unwrap_list(&payload, "studios"), vec![json!(3)]);

        assert!(unwrap_list(&json!({"ok": true}), "studios").is_empty());
    }
}
