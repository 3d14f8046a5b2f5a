// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use super::{Payload, Timestamp};

/// One intercepted HTTP response, as handed over by the capture layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEvent {
    /// Full request URL; the endpoint key is derived from it.
    pub url: String,
    /// Raw response body. Decoded lazily so a corrupt body can be reported
    /// without any extraction having run.
    pub body: Vec<u8>,
    pub received_at: Timestamp,
}

impl ResponseEvent {
    pub fn new(url: impl Into<String>, body: impl Into<Vec<u8>>, received_at: Timestamp) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            received_at,
        }
    }

    /// Build an event whose body is the serialized form of `body`.
    pub fn from_json(url: impl Into<String>, body: &Value, received_at: Timestamp) -> Self {
        Self::new(url, body.to_string(), received_at)
    }

    /// Decode the body into a mapping.
    ///
    /// Anything that is not a JSON object (invalid JSON, arrays, scalars) is
    /// rejected with a human-readable reason.
    pub fn decode(&self) -> Result<Payload, String> {
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_type_name(&other))),
            Err(e) => Err(e.to_string()),
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
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
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_accepts_objects_only() {
        let now = Timestamp::from_secs(1);

        let ok = ResponseEvent::from_json("/list_other", &json!({"records": []}), now);
        assert!(ok.decode().unwrap().contains_key("records"));

        let array = ResponseEvent::from_json("/list_other", &json!([1, 2]), now);
        assert_eq!(array.decode().unwrap_err(), "expected a JSON object, found array");

        let garbage = ResponseEvent::new("/list_other", b"{not json".to_vec(), now);
        assert!(garbage.decode().is_err());
    }
}
