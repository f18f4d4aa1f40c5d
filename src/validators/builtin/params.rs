//! Rule parameter coercions shared by the built-in validators.

use crate::core::error::RuleError;
use crate::core::value::Params;
use serde_json::Value as JsonValue;

/// Read a column list: a sequence of strings or a single string.
///
/// An absent or `null` parameter is an empty list.
pub fn column_list(params: &Params, name: &str) -> Result<Vec<String>, RuleError> {
    match params.get(name) {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::String(column)) => Ok(vec![column.clone()]),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| match item {
                JsonValue::String(column) => Ok(column.clone()),
                other => Err(RuleError::invalid_parameter(
                    name,
                    format!("expected column names, found {}", other),
                )),
            })
            .collect(),
        Some(other) => Err(RuleError::invalid_parameter(
            name,
            format!("expected a list of column names, found {}", other),
        )),
    }
}

/// Read an optional non-negative integer bound.
///
/// Integral floats such as `10.0` are accepted.
pub fn bound(params: &Params, name: &str) -> Result<Option<usize>, RuleError> {
    let value = match params.get(name) {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(value) => value,
    };

    let invalid = || {
        RuleError::invalid_parameter(
            name,
            format!("expected a non-negative integer, found {}", value),
        )
    };

    let number = match value {
        JsonValue::Number(number) => number,
        _ => return Err(invalid()),
    };
    if let Some(n) = number.as_u64() {
        return usize::try_from(n).map(Some).map_err(|_| invalid());
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => {
            Ok(Some(f as usize))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(key: &str, value: JsonValue) -> Params {
        let mut params = Params::new();
        params.insert(key.to_string(), value);
        params
    }

    #[test]
    fn test_column_list() {
        assert!(column_list(&Params::new(), "columns").unwrap().is_empty());
        assert_eq!(
            column_list(&params("columns", json!("a")), "columns").unwrap(),
            vec!["a"]
        );
        assert_eq!(
            column_list(&params("columns", json!(["a", "b"])), "columns").unwrap(),
            vec!["a", "b"]
        );
        assert!(column_list(&params("columns", json!([1])), "columns").is_err());
        assert!(column_list(&params("columns", json!({"a": 1})), "columns").is_err());
    }

    #[test]
    fn test_bound() {
        assert_eq!(bound(&Params::new(), "min_rows").unwrap(), None);
        assert_eq!(bound(&params("min_rows", JsonValue::Null), "min_rows").unwrap(), None);
        assert_eq!(bound(&params("min_rows", json!(3)), "min_rows").unwrap(), Some(3));
        assert_eq!(bound(&params("min_rows", json!(10.0)), "min_rows").unwrap(), Some(10));

        let error = bound(&params("min_rows", json!(-1)), "min_rows").unwrap_err();
        assert!(error.to_string().contains("min_rows"));
        assert!(bound(&params("min_rows", json!(1.5)), "min_rows").is_err());
        assert!(bound(&params("min_rows", json!("3")), "min_rows").is_err());
    }
}
