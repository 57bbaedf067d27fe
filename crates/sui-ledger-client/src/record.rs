//! Checked extraction over raw "fields" bags
//!
//! Every lookup either returns a typed value or fails with
//! [`DecodeError::MissingField`] naming the full path — no optimistic
//! chained lookups that silently yield defaults on typos.

use serde_json::Value;

use clamm_core::DecodeError;

fn missing(path: &[&str]) -> DecodeError {
    DecodeError::MissingField {
        path: path.join("."),
    }
}

/// Walk a key path through nested objects.
pub fn field_path<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Value, DecodeError> {
    let mut current = value;
    for (depth, key) in path.iter().enumerate() {
        current = current.get(key).ok_or_else(|| missing(&path[..=depth]))?;
    }
    Ok(current)
}

/// Walk a key path, returning `None` when any segment is absent.
pub fn opt_field_path<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// A required string at the given path.
pub fn str_at<'a>(value: &'a Value, path: &[&str]) -> Result<&'a str, DecodeError> {
    field_path(value, path)?.as_str().ok_or_else(|| missing(path))
}

/// A required array at the given path.
pub fn array_at<'a>(value: &'a Value, path: &[&str]) -> Result<&'a Vec<Value>, DecodeError> {
    field_path(value, path)?
        .as_array()
        .ok_or_else(|| missing(path))
}

/// An optional boolean at the given path, absent reads as `false`.
pub fn bool_at(value: &Value, path: &[&str]) -> bool {
    opt_field_path(value, path)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_path_reports_full_path() {
        let record = json!({ "a": { "b": { "c": 1 } } });
        assert!(field_path(&record, &["a", "b", "c"]).is_ok());

        let err = field_path(&record, &["a", "x", "c"]).unwrap_err();
        match err {
            DecodeError::MissingField { path } => assert_eq!(path, "a.x"),
            other => panic!("expected MissingField, got {other}"),
        }
    }

    #[test]
    fn test_str_at_rejects_non_strings() {
        let record = json!({ "name": 42 });
        assert!(str_at(&record, &["name"]).is_err());
    }

    #[test]
    fn test_bool_at_defaults_false() {
        let record = json!({ "flag": true });
        assert!(bool_at(&record, &["flag"]));
        assert!(!bool_at(&record, &["absent"]));
    }
}
