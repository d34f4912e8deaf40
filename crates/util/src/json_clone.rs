use serde_json::{Map, Value};

/// Creates a deep clone of a JSON value.
///
/// All nested arrays and objects are copied into fresh containers, so the
/// result shares no structure with the input and outlives it freely.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use json_delta_util::json_clone::clone;
///
/// let original = json!({"foo": [1, 2, 3]});
/// let copied = clone(&original);
///
/// assert_eq!(original, copied);
/// ```
pub fn clone(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Number(n) => Value::Number(n.clone()),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(clone).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, val)| (key.clone(), clone(val)))
                .collect::<Map<String, Value>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clone_scalars() {
        for value in [json!(null), json!(true), json!(42), json!("hello")] {
            assert_eq!(clone(&value), value);
        }
    }

    #[test]
    fn test_clone_nested() {
        let value = json!({
            "array": [1, 2, {"nested": true}],
            "object": {"a": "b"},
            "scalar": 42
        });
        assert_eq!(clone(&value), value);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = json!({"arr": [1, 2, 3]});
        let mut copied = clone(&original);

        copied["arr"][0] = json!(99);
        assert_eq!(original["arr"][0], json!(1));
    }

    #[test]
    fn test_clone_preserves_key_order() {
        let value = json!({"z": 1, "a": 2, "m": 3});
        let copied = clone(&value);
        let keys: Vec<&String> = copied.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
