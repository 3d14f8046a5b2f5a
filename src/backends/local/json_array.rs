// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::errors::ExtractionError;
use crate::model::{json_type_name, Batch, Payload};
use crate::traits::RecordKind;

/// Record kind whose items are the objects of one top-level payload array.
///
/// This covers every kind the capture service serves: each response names
/// its item list with a stable key (`soul_strikes`, `dress_records`, ...)
/// and the items are flat objects.
#[derive(Debug, Clone)]
pub struct JsonArrayKind {
    name: String,
    source_key: String,
    paginated: bool,
    identity_field: String,
    fields: Vec<String>,
}

impl JsonArrayKind {
    pub fn new(
        name: impl Into<String>,
        source_key: impl Into<String>,
        paginated: bool,
        identity_field: impl Into<String>,
        fields: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_key: source_key.into(),
            paginated,
            identity_field: identity_field.into(),
            fields,
        }
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }
}

impl RecordKind for JsonArrayKind {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_paginated(&self) -> bool {
        self.paginated
    }

    fn identity_field(&self) -> &str {
        &self.identity_field
    }

    fn field_schema(&self) -> &[String] {
        &self.fields
    }

    /// A missing or `null` key means "not this kind" and yields an empty batch.
    fn extract(&self, payload: &Payload) -> Result<Batch, ExtractionError> {
        let values = match payload.get(&self.source_key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(values)) => values,
            Some(other) => {
                return Err(ExtractionError::UnexpectedShape {
                    key: self.source_key.clone(),
                    expected: "an array",
                    found: json_type_name(other),
                })
            }
        };

        values
            .iter()
            .map(|value| match value {
                Value::Object(item) => Ok(item.clone()),
                other => Err(ExtractionError::UnexpectedShape {
                    key: self.source_key.clone(),
                    expected: "an array of objects",
                    found: json_type_name(other),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn soul_breaks() -> JsonArrayKind {
        JsonArrayKind::new(
            "soul_breaks",
            "soul_strikes",
            true,
            "id",
            vec!["id".to_string(), "name".to_string()],
        )
    }

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_extracts_items_in_order() {
        let kind = soul_breaks();
        let batch = kind
            .extract(&payload(json!({
                "soul_strikes": [{"id": 1, "name": "Blade"}, {"id": 2, "name": "Arrow"}],
                "other": true,
            })))
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0]["name"], json!("Blade"));
        assert_eq!(batch[1]["id"], json!(2));
    }

    #[test]
    fn test_absent_or_null_key_is_empty() {
        let kind = soul_breaks();
        assert!(kind.extract(&payload(json!({"dress_records": []}))).unwrap().is_empty());
        assert!(kind.extract(&payload(json!({"soul_strikes": null}))).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_shapes_are_errors() {
        let kind = soul_breaks();

        let err = kind
            .extract(&payload(json!({"soul_strikes": "nope"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Expected an array at 'soul_strikes', found string");

        let err = kind
            .extract(&payload(json!({"soul_strikes": [{"id": 1}, 7]})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected an array of objects at 'soul_strikes', found number"
        );
    }

    #[test]
    fn test_declarations() {
        let kind = soul_breaks();
        assert_eq!(kind.name(), "soul_breaks");
        assert_eq!(kind.source_key(), "soul_strikes");
        assert!(kind.is_paginated());
        assert_eq!(kind.identity_field(), "id");
        assert_eq!(kind.field_schema(), &["id".to_string(), "name".to_string()]);
    }
}
