//! Response envelope decoding.
//!
//! Every Director response is a `{stat, data, error}` object. The service
//! also emits stray backslashes in front of characters that never need
//! escaping, so bodies are sanitized before they are parsed.

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// `stat` value of a successful response.
pub const STAT_OK: &str = "ok";

/// Characters a backslash may legitimately precede in a Director body.
const KEPT_ESCAPES: [char; 3] = ['/', 'u', '"'];

/// Decoded response envelope.
///
/// `stat` and `error` are kept as raw JSON so that any well-formed body is
/// decoded, whatever the service put in them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    /// `"ok"` on success, anything else on failure
    pub stat: Value,
    /// Payload, trusted only when `stat` is `"ok"`
    #[serde(default)]
    pub data: Value,
    /// Failure message, trusted only when `stat` is not `"ok"`
    #[serde(default)]
    pub error: Option<Value>,
}

impl Envelope {
    /// Returns true if the service reported success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.stat.as_str() == Some(STAT_OK)
    }

    /// Unwrap the payload, or turn the reported failure into an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceError`] carrying the service's message verbatim
    /// when `stat` is not `"ok"`. A non-string message is kept as its JSON text.
    pub fn into_result(self) -> Result<Value> {
        if self.is_ok() {
            return Ok(self.data);
        }

        let message = match self.error {
            Some(Value::String(message)) => message,
            None | Some(Value::Null) => "Unknown error".to_string(),
            Some(other) => other.to_string(),
        };
        warn!(stat = %self.stat, %message, "Director reported an error");
        Err(Error::ServiceError(message))
    }
}

/// Remove every backslash not immediately followed by `/`, `u` or `"`.
#[must_use]
pub fn sanitize(body: &str) -> Cow<'_, str> {
    if !body.contains('\\') {
        return Cow::Borrowed(body);
    }

    let mut cleaned = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && !chars.peek().is_some_and(|next| KEPT_ESCAPES.contains(next)) {
            continue;
        }
        cleaned.push(c);
    }
    Cow::Owned(cleaned)
}

/// Parse a sanitized body into its envelope.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] if the body is not a JSON envelope.
pub fn parse(body: &str) -> Result<Envelope> {
    let value: Value = serde_json::from_str(&sanitize(body))?;
    if !value.is_object() {
        return Err(Error::MalformedPayload(format!(
            "expected a response object, got {value}"
        )));
    }
    serde_json::from_value(value).map_err(Error::from)
}

/// Sanitize, parse and unwrap a response body.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] on a parse failure and
/// [`Error::ServiceError`] when the service reports a failure.
pub fn decode(body: &str) -> Result<Value> {
    let data = parse(body)?.into_result()?;
    debug!("Decoded Director response");
    Ok(data)
}

/// Take a named member out of a decoded payload.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] if the payload has no such member.
pub fn take_field(mut data: Value, field: &str) -> Result<Value> {
    data.get_mut(field)
        .map(Value::take)
        .ok_or_else(|| Error::MalformedPayload(format!("response data has no `{field}` member")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_keeps_legitimate_escapes() {
        let body = r#"{"a":"say \"hi\"","b":"http:\/\/x","c":"\u0041"}"#;
        assert_eq!(sanitize(body), body);
        assert!(matches!(sanitize("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_sanitize_strips_other_backslashes() {
        assert_eq!(sanitize(r"it\'s"), "it's");
        assert_eq!(sanitize(r"line\nbreak"), "linenbreak");
        assert_eq!(sanitize(r"C:\\dir"), "C:dir");
        assert_eq!(sanitize(r"\\/"), r"\/");
        assert_eq!(sanitize("trailing\\"), "trailing");
    }

    #[test]
    fn test_sanitize_repairs_invalid_json() {
        let body = r#"{"stat":"ok","data":{"caption":"Bob\'s \&amp; Alice"}}"#;
        assert!(serde_json::from_str::<Value>(body).is_err());

        let data = decode(body).unwrap();
        assert_eq!(data["caption"], "Bob's &amp; Alice");
    }

    #[test]
    fn test_decode_ok() {
        let data = decode(r#"{"stat":"ok","data":{"version":"4.2"}}"#).unwrap();
        assert_eq!(data, json!({"version": "4.2"}));
    }

    #[test]
    fn test_decode_service_error_is_verbatim() {
        let err = decode(r#"{"stat":"fail","error":"Gallery not found"}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError("Gallery not found".to_string()));
    }

    #[test]
    fn test_decode_service_error_without_message() {
        let err = decode(r#"{"stat":"fail"}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError("Unknown error".to_string()));
    }

    #[test]
    fn test_decode_non_string_error_and_stat() {
        let err = decode(r#"{"stat":"fail","error":404}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError("404".to_string()));

        let err = decode(r#"{"stat":0,"error":"Gallery not found"}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError("Gallery not found".to_string()));

        let err = decode(r#"{"stat":"fail","error":{"code":7}}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError(r#"{"code":7}"#.to_string()));

        let err = decode(r#"{"stat":null,"error":null}"#).unwrap_err();
        assert_eq!(err, Error::ServiceError("Unknown error".to_string()));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode("<html>"), Err(Error::MalformedPayload(_))));
        assert!(matches!(decode(""), Err(Error::MalformedPayload(_))));
        assert!(matches!(
            decode(r#"{"data":{}}"#),
            Err(Error::MalformedPayload(_))
        ));
        assert!(matches!(decode("[1,2]"), Err(Error::MalformedPayload(_))));
    }

    #[test]
    fn test_decode_scalar_and_list_payloads() {
        assert_eq!(decode(r#"{"stat":"ok","data":3}"#).unwrap(), json!(3));
        assert_eq!(
            decode(r#"{"stat":"ok","data":[1,2]}"#).unwrap(),
            json!([1, 2])
        );
        assert_eq!(decode(r#"{"stat":"ok"}"#).unwrap(), Value::Null);
    }

    #[test]
    fn test_take_field() {
        let data = json!({"albums": [{"id": 1}], "total": 1});
        assert_eq!(take_field(data, "albums").unwrap(), json!([{"id": 1}]));

        let err = take_field(json!({"other": 1}), "albums").unwrap_err();
        assert!(matches!(err, Error::MalformedPayload(_)));
    }
}
