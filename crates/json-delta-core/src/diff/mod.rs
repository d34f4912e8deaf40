//! Recursive structural diff of two JSON values.

mod array;
mod object;

use serde_json::Value;

use json_delta_util::json_equal::value_equal;

use crate::depth;
use crate::error::Error;
use crate::options::DiffOptions;
use crate::wire;

/// Diffs two values, returning `None` when there is nothing to report.
pub(crate) fn diff_values(
    left: &Value,
    right: &Value,
    opts: &DiffOptions,
) -> Result<Option<Value>, Error> {
    let _guard = depth::enter_diff()?;

    if value_equal(left, right, opts.strict_equality) {
        return Ok(None);
    }
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => array::diff_arrays(a, b, opts),
        (Value::Object(a), Value::Object(b)) => object::diff_objects(a, b, opts),
        // Variant mismatches and scalar changes replace wholesale.
        _ => Ok(Some(wire::change(left, right))),
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
    fn test_equal_values_produce_no_diff() {
        assert_eq!(diff(&json!(1), &json!(1)), None);
        assert_eq!(diff(&json!({"a": [1, {"b": 2}]}), &json!({"a": [1, {"b": 2}]})), None);
    }

    #[test]
    fn test_scalar_change() {
        assert_eq!(diff(&json!(1), &json!(2)), Some(json!([1, 2])));
    }

    #[test]
    fn test_variant_mismatch_is_a_change() {
        assert_eq!(diff(&json!([1]), &json!({"a": 1})), Some(json!([[1], {"a": 1}])));
        assert_eq!(diff(&json!(null), &json!(0)), Some(json!([null, 0])));
    }

    #[test]
    fn test_tolerant_mode_suppresses_tiny_number_drift() {
        let opts = DiffOptions::tolerant();
        let out = diff_values(&json!(1.0), &json!(1.0 + 1e-12), &opts).unwrap();
        assert_eq!(out, None);
    }
}
