//! Per-key object diff.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::options::DiffOptions;
use crate::wire;

use super::diff_values;

/// Emits deletion triples for keys only in `left`, recursive sub-diffs for
/// keys in both, and addition singles for keys only in `right`. An empty
/// result collapses to "no change".
pub(crate) fn diff_objects(
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    opts: &DiffOptions,
) -> Result<Option<Value>, Error> {
    let mut entries = Map::new();

    for (key, left_val) in left {
        match right.get(key) {
            None => {
                entries.insert(key.clone(), wire::deletion(left_val));
            }
            Some(right_val) => {
                if let Some(sub) = diff_values(left_val, right_val, opts)? {
                    entries.insert(key.clone(), sub);
                }
            }
        }
    }

    for (key, right_val) in right {
        if !left.contains_key(key) {
            entries.insert(key.clone(), wire::addition(right_val));
        }
    }

    if entries.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Object(entries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(left: &Value, right: &Value) -> Option<Value> {
        diff_values(left, right, &DiffOptions::default()).unwrap()
    }

    #[test]
    fn test_key_added() {
        assert_eq!(
            diff(&json!({"a": 1}), &json!({"a": 1, "b": 2})),
            Some(json!({"b": [2]}))
        );
    }

    #[test]
    fn test_key_removed() {
        assert_eq!(
            diff(&json!({"a": 1, "b": 2}), &json!({"a": 1})),
            Some(json!({"b": [2, 0, 0]}))
        );
    }

    #[test]
    fn test_key_changed() {
        assert_eq!(
            diff(&json!({"a": 1}), &json!({"a": 2})),
            Some(json!({"a": [1, 2]}))
        );
    }

    #[test]
    fn test_nested_change_stays_nested() {
        assert_eq!(
            diff(&json!({"a": {"x": 1}, "b": 2}), &json!({"a": {"x": 2}, "b": 2})),
            Some(json!({"a": {"x": [1, 2]}}))
        );
    }

    #[test]
    fn test_unchanged_keys_are_omitted() {
        let out = diff(
            &json!({"a": 1, "b": 2, "c": 3}),
            &json!({"a": 1, "b": 9, "c": 3}),
        )
        .unwrap();
        assert_eq!(out, json!({"b": [2, 9]}));
    }

    #[test]
    fn test_surviving_keys_come_before_added_keys() {
        let out = diff(
            &json!({"z": 1, "a": 2}),
            &json!({"z": 9, "a": 2, "new": 3}),
        )
        .unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "new"]);
    }
}
