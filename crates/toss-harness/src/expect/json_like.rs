//! Structural subset matching of JSON documents.
//!
//! Every key present in the expected document must exist in the actual one
//! and match recursively. Extra actual keys are ignored. Arrays are compared
//! element-wise by index up to the expected length.

use serde_json::Value;

/// Check that `actual` contains `expected`; the error names the first
/// mismatching location.
pub fn json_like(actual: &Value, expected: &Value) -> Result<(), String> {
    compare(actual, expected, "$")
}

fn compare(actual: &Value, expected: &Value, path: &str) -> Result<(), String> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            for (key, expected_value) in expected {
                let child = format!("{path}.{key}");
                match actual.get(key) {
                    Some(actual_value) => compare(actual_value, expected_value, &child)?,
                    None => return Err(format!("{child} is missing")),
                }
            }
            Ok(())
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if actual.len() < expected.len() {
                return Err(format!(
                    "{path} has {} elements, expected at least {}",
                    actual.len(),
                    expected.len()
                ));
            }
            for (index, (expected_value, actual_value)) in expected.iter().zip(actual).enumerate() {
                compare(actual_value, expected_value, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        (Value::Object(_), _) => Err(format!("{path} expected an object, found {actual}")),
        (Value::Array(_), _) => Err(format!("{path} expected an array, found {actual}")),
        _ if expected == actual => Ok(()),
        _ => Err(format!("{path} expected {expected}, found {actual}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subset_object_matches() {
        assert!(json_like(&json!({"a": 1, "b": 2}), &json!({"a": 1})).is_ok());
    }

    #[test]
    fn test_missing_expected_key_fails() {
        let err = json_like(&json!({"a": 1, "b": 2}), &json!({"a": 1, "c": 3})).unwrap_err();
        assert_eq!(err, "$.c is missing");
    }

    #[test]
    fn test_not_symmetric() {
        assert!(json_like(&json!({"a": 1}), &json!({"a": 1, "b": 2})).is_err());
    }

    #[test]
    fn test_nested_objects_and_arrays() {
        let actual = json!({
            "user": {"id": 7, "name": "x", "roles": ["admin", "dev", "ops"]},
            "meta": {"page": 1}
        });
        assert!(json_like(&actual, &json!({"user": {"roles": ["admin", "dev"]}})).is_ok());
        assert!(json_like(&actual, &json!({"user": {"id": 7}, "meta": {}})).is_ok());

        let err = json_like(&actual, &json!({"user": {"roles": ["dev"]}})).unwrap_err();
        assert_eq!(err, r#"$.user.roles[0] expected "dev", found "admin""#);
    }

    #[test]
    fn test_array_of_objects_partial_elements() {
        let actual = json!([{"id": 1, "x": true}, {"id": 2, "x": false}]);
        assert!(json_like(&actual, &json!([{"id": 1}, {"id": 2}])).is_ok());
        assert!(json_like(&actual, &json!([{"id": 1}])).is_ok());

        let err = json_like(&actual, &json!([{}, {}, {}])).unwrap_err();
        assert_eq!(err, "$ has 2 elements, expected at least 3");
    }

    #[test]
    fn test_type_mismatch_fails() {
        let err = json_like(&json!({"a": "1"}), &json!({"a": {"b": 1}})).unwrap_err();
        assert_eq!(err, r#"$.a expected an object, found "1""#);
        assert!(json_like(&json!({"a": 1}), &json!({"a": [1]})).is_err());
        assert!(json_like(&json!({"a": 1}), &json!({"a": "1"})).is_err());
        assert!(json_like(&json!({"a": null}), &json!({"a": null})).is_ok());
    }
}
