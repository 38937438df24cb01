use bytes::Bytes;
use serde_json::{Map, Value};

use crate::api::CaptureError;

/// Key injected into every sample before it is logged.
pub const SERVER_TIMESTAMP_KEY: &str = "server_timestamp";

/// A fingerprint sample as sent by the collection page. Keys are kept in the
/// order the client sent them, unknown fields pass through untouched.
pub type Sample = Map<String, Value>;

/// Decodes a submission body into the list of raw batch elements.
///
/// Mirrors the truthiness check of the collection protocol: an empty body and
/// any "empty" JSON value (`null`, `false`, `0`, `""`, `[]`, `{}`) count as no
/// data at all. Truthy values that are not arrays cannot be iterated as a batch
/// of samples and are rejected as such.
pub fn decode_batch(bytes: Bytes) -> Result<Vec<Value>, CaptureError> {
    tracing::debug!(len = bytes.len(), "decoding submission");

    let payload = String::from_utf8(bytes.into()).map_err(|e| {
        tracing::warn!("failed to decode body: {}", e);
        CaptureError::RequestDecodingError(String::from("invalid body encoding"))
    })?;

    if payload.trim().is_empty() {
        return Err(CaptureError::NoData);
    }

    let value: Value = serde_json::from_str(&payload)?;
    if !is_truthy(&value) {
        return Err(CaptureError::NoData);
    }

    match value {
        Value::Array(samples) => Ok(samples),
        other => Err(CaptureError::NotABatch(kind_of(&other))),
    }
}

/// Stamps one batch element with the server timestamp and serializes it to a
/// single log line (without the trailing newline).
pub fn annotate(index: usize, value: Value, timestamp: String) -> Result<String, CaptureError> {
    let mut sample: Sample = match value {
        Value::Object(sample) => sample,
        other => {
            return Err(CaptureError::InvalidSample {
                index,
                kind: kind_of(&other),
            })
        }
    };

    // An existing key is overwritten in place, so the record never holds two.
    sample.insert(SERVER_TIMESTAMP_KEY.to_string(), Value::String(timestamp));

    Ok(serde_json::to_string(&sample)?)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::{json, Value};

    use super::{annotate, decode_batch, is_truthy};
    use crate::api::CaptureError;

    #[test]
    fn decodes_an_array_of_samples() {
        let samples = decode_batch(Bytes::from(r#"[{"a": 1}, {"b": 2}]"#)).unwrap();
        assert_eq!(samples, vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn empty_payloads_are_no_data() {
        for body in ["", "  \n", "null", "false", "0", "\"\"", "[]", "{}"] {
            let res = decode_batch(Bytes::from(body));
            assert!(
                matches!(res, Err(CaptureError::NoData)),
                "{body:?} gave {res:?}"
            );
        }
    }

    #[test]
    fn garbage_is_a_parsing_error() {
        let res = decode_batch(Bytes::from("{not json"));
        assert!(matches!(res, Err(CaptureError::RequestParsingError(_))));
    }

    #[test]
    fn truthy_non_arrays_are_not_a_batch() {
        let res = decode_batch(Bytes::from(r#"{"user_agent": "x"}"#));
        assert!(matches!(res, Err(CaptureError::NotABatch("object"))));

        let res = decode_batch(Bytes::from("\"abc\""));
        assert!(matches!(res, Err(CaptureError::NotABatch("string"))));

        let res = decode_batch(Bytes::from("42"));
        assert!(matches!(res, Err(CaptureError::NotABatch("number"))));
    }

    #[test]
    fn invalid_utf8_is_a_decoding_error() {
        let res = decode_batch(Bytes::from_static(&[0xff, 0xfe, 0x5b]));
        assert!(matches!(res, Err(CaptureError::RequestDecodingError(_))));
    }

    #[test]
    fn annotate_appends_timestamp_last() {
        let line = annotate(
            0,
            json!({"zeta": 1, "alpha": {"nested": [1, 2]}}),
            "2024-05-01T10:00:00Z".to_string(),
        )
        .unwrap();

        assert_eq!(
            line,
            r#"{"zeta":1,"alpha":{"nested":[1,2]},"server_timestamp":"2024-05-01T10:00:00Z"}"#
        );
    }

    #[test]
    fn annotate_overwrites_client_supplied_timestamp() {
        let line = annotate(
            0,
            json!({"server_timestamp": "forged", "a": true}),
            "2024-05-01T10:00:00Z".to_string(),
        )
        .unwrap();

        let record: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            record,
            json!({"server_timestamp": "2024-05-01T10:00:00Z", "a": true})
        );
    }

    #[test]
    fn annotate_rejects_non_objects() {
        let err = annotate(3, json!("plain"), String::new()).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::InvalidSample {
                index: 3,
                kind: "string"
            }
        ));
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!([{}])));
        assert!(is_truthy(&json!(0.5)));
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(null)));
    }
}
