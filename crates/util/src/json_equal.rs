use serde_json::Value;

/// Absolute tolerance applied to number comparison when strict equality is
/// turned off.
pub const NUMBER_TOLERANCE: f64 = 1e-9;

/// Performs a structural equality check between two JSON values.
///
/// Values are compared recursively:
/// - Primitives (null, bool, string) compare by value; strings byte-wise.
/// - Numbers compare as doubles. With `strict` they compare with IEEE `==`
///   (NaN is unequal to itself); without it, two numbers are equal when
///   their absolute difference is below [`NUMBER_TOLERANCE`].
/// - Arrays compare element-by-element, in order.
/// - Objects compare key-by-key; key order is irrelevant.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use json_delta_util::json_equal::value_equal;
///
/// let a = json!({"foo": [1.0, 2.0]});
/// let b = json!({"foo": [1.0, 2.0000000001]});
///
/// assert!(!value_equal(&a, &b, true));
/// assert!(value_equal(&a, &b, false));
/// ```
pub fn value_equal(left: &Value, right: &Value, strict: bool) -> bool {
    // Same node, trivially equal.
    if std::ptr::eq(left, right) {
        return true;
    }

    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,

        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            if strict {
                a == b
            } else {
                (a - b).abs() < NUMBER_TOLERANCE
            }
        }

        (Value::String(a), Value::String(b)) => {
            a.len() == b.len() && a.as_bytes() == b.as_bytes()
        }

        (Value::Array(arr_a), Value::Array(arr_b)) => {
            if arr_a.len() != arr_b.len() {
                return false;
            }
            arr_a
                .iter()
                .zip(arr_b)
                .all(|(a, b)| value_equal(a, b, strict))
        }

        (Value::Object(obj_a), Value::Object(obj_b)) => {
            if obj_a.len() != obj_b.len() {
                return false;
            }
            obj_a.iter().all(|(key, val_a)| match obj_b.get(key) {
                Some(val_b) => value_equal(val_a, val_b, strict),
                None => false,
            })
        }

        // Different variants are never equal
        _ => false,
    }
}

/// Strict deep equality between two JSON values.
///
/// Shorthand for [`value_equal`] with `strict = true`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    value_equal(a, b, true)
}
