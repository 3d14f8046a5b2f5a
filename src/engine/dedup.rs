// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::HashSet;

use crate::model::Item;

/// Keep the first item for each distinct identity value, in original order.
///
/// Items missing `identity_field` have a null identity, and nulls collapse
/// like any other value. Identities compare by JSON value, so `"1"` and `1`
/// are different items.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use the_stitcher::engine::dedupe;
///
/// let items: Vec<_> = [json!({"id": 1, "v": "a"}), json!({"id": 1, "v": "b"}), json!({"id": 2})]
///     .into_iter()
///     .map(|v| v.as_object().unwrap().clone())
///     .collect();
///
/// let unique = dedupe(items, "id");
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[0]["v"], json!("a"));
/// ```
pub fn dedupe(items: Vec<Item>, identity_field: &str) -> Vec<Item> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(identity_of(item, identity_field)))
        .collect()
}

/// Hashable rendering of an item's identity value.
pub fn identity_of(item: &Item, identity_field: &str) -> String {
    item.get(identity_field).unwrap_or(&Value::Null).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(values: Vec<Value>) -> Vec<Item> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                _ => panic!("items must be objects"),
            })
            .collect()
    }

    fn tags(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i["tag"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_first_occurrence_wins_in_order() {
        let input = items(vec![
            json!({"id": "a", "tag": "a1"}),
            json!({"id": "a", "tag": "a2"}),
            json!({"id": "b", "tag": "b1"}),
            json!({"id": "c", "tag": "c1"}),
            json!({"id": "b", "tag": "b2"}),
        ]);

        assert_eq!(tags(&dedupe(input, "id")), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_missing_and_null_identities_collapse() {
        let input = items(vec![
            json!({"tag": "missing"}),
            json!({"id": null, "tag": "null"}),
            json!({"id": 1, "tag": "one"}),
            json!({"tag": "missing again"}),
        ]);

        assert_eq!(tags(&dedupe(input, "id")), vec!["missing", "one"]);
    }

    #[test]
    fn test_identity_compares_by_json_value() {
        let input = items(vec![
            json!({"id": 1, "tag": "number"}),
            json!({"id": "1", "tag": "string"}),
            json!({"id": "null", "tag": "string null"}),
            json!({"tag": "real null"}),
        ]);

        assert_eq!(dedupe(input, "id").len(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe(Vec::new(), "id").is_empty());
    }
}
