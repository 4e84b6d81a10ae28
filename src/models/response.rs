//! Response normalization
//!
//! Every prompt request ends in a [`NormalizedResponse`]: the upstream body
//! passed through as text, an `{"error": ...}` object, or a `{"data": ...}`
//! object wrapping the decoded body.

use crate::core::constants::message;
use crate::models::attr::AttributeTree;
use serde::Serialize;
use serde_json::Value;

/// Raw value handed to the normalizer
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Already a string, passed through untouched
    Text(String),

    /// JSON text that must be decoded
    Encoded(String),

    /// A value that was decoded earlier
    #[allow(dead_code)]
    Decoded(Value),
}

/// Uniform result returned to the inbound caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResponse {
    PlainText(String),
    Error { error: String },
    Data { data: AttributeTree },
}

impl NormalizedResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    #[allow(dead_code)]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Normalize a payload into the response shape
///
/// With `error_check` set, a decoded object carrying an `error` field is
/// reported as an error instead of data.
pub fn normalize(payload: Payload, error_check: bool) -> NormalizedResponse {
    match payload {
        Payload::Text(text) | Payload::Decoded(Value::String(text)) => {
            NormalizedResponse::PlainText(text)
        }
        Payload::Encoded(text) => decode(&text, error_check),
        // A decoded object cannot be parsed a second time.
        Payload::Decoded(Value::Object(_) | Value::Array(_)) => {
            NormalizedResponse::error(message::INVALID_JSON)
        }
        Payload::Decoded(_) => NormalizedResponse::error(message::INVALID_FORMAT),
    }
}

fn decode(text: &str, error_check: bool) -> NormalizedResponse {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => return NormalizedResponse::error(message::INVALID_JSON),
    };

    if error_check {
        if let Some(error) = parsed.get("error").filter(|e| is_truthy(e)) {
            let error = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return NormalizedResponse::Error { error };
        }
    }

    NormalizedResponse::Data {
        data: AttributeTree::wrap(parsed),
    }
}

/// Empty strings, `false`, `0` and `null` do not count as an error field.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_passes_through() {
        let result = normalize(Payload::Text("hello".to_string()), false);
        assert_eq!(result, NormalizedResponse::PlainText("hello".to_string()));

        // even JSON-looking text is not parsed on the text path
        let result = normalize(Payload::Text(r#"{"answer":"42"}"#.to_string()), true);
        assert_eq!(
            result,
            NormalizedResponse::PlainText(r#"{"answer":"42"}"#.to_string())
        );
    }

    #[test]
    fn test_encoded_json_becomes_data() {
        let result = normalize(Payload::Encoded(r#"{"answer":"42"}"#.to_string()), false);

        match result {
            NormalizedResponse::Data { data } => {
                assert_eq!(data.get("answer").and_then(AttributeTree::as_str), Some("42"));
            }
            other => panic!("expected data, got {:?}", other),
        }
    }

    #[test]
    fn test_encoded_garbage_is_invalid_json() {
        let result = normalize(Payload::Encoded("<html>error</html>".to_string()), false);
        assert_eq!(result, NormalizedResponse::error("Invalid JSON response"));
    }

    #[test]
    fn test_error_field_only_checked_when_enabled() {
        let body = r#"{"error":"quota exceeded"}"#;

        let checked = normalize(Payload::Encoded(body.to_string()), true);
        assert_eq!(checked, NormalizedResponse::error("quota exceeded"));

        let unchecked = normalize(Payload::Encoded(body.to_string()), false);
        assert!(!unchecked.is_error());

        // a falsy error field is not an error
        let empty = normalize(Payload::Encoded(r#"{"error":""}"#.to_string()), true);
        assert!(!empty.is_error());

        let structured = normalize(Payload::Encoded(r#"{"error":{"code":5}}"#.to_string()), true);
        assert_eq!(structured, NormalizedResponse::error(r#"{"code":5}"#));
    }

    #[test]
    fn test_decoded_values() {
        assert_eq!(
            normalize(Payload::Decoded(json!("hi")), false),
            NormalizedResponse::PlainText("hi".to_string())
        );
        assert_eq!(
            normalize(Payload::Decoded(json!({ "error": "Invalid input" })), false),
            NormalizedResponse::error("Invalid JSON response")
        );
        assert_eq!(
            normalize(Payload::Decoded(json!(3)), false),
            NormalizedResponse::error("Invalid response format")
        );
        assert_eq!(
            normalize(Payload::Decoded(Value::Null), true),
            NormalizedResponse::error("Invalid response format")
        );
    }

    #[test]
    fn test_serialized_shapes() {
        let error = serde_json::to_value(NormalizedResponse::error("Invalid input")).unwrap();
        assert_eq!(error, json!({ "error": "Invalid input" }));

        let data = normalize(Payload::Encoded(r#"{"a":{"b":1}}"#.to_string()), false);
        assert_eq!(
            serde_json::to_value(data).unwrap(),
            json!({ "data": { "a": { "b": 1 } } })
        );
    }
}
