//! `not_na`: requested columns are not entirely missing.

use super::params::column_list;
use crate::core::error::RuleError;
use crate::core::plugin::{Subject, Validator};
use crate::core::result::ValidationResult;
use crate::core::value::{Params, Table};
use crate::validators::registry::ValidatorRegistry;
use serde_json::{json, Map, Value as JsonValue};

/// Register the not_na validator.
pub fn register(registry: &mut ValidatorRegistry) {
    registry.register(NotNa);
}

/// Fails when a requested column is absent or holds only missing cells.
///
/// Record-shaped JSON is viewed as a table first; any other value fails. A
/// column with zero rows is not considered all-missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNa;

fn na_statistics(table: &Table, columns: &[&String]) -> Map<String, JsonValue> {
    let total = table.row_count();
    columns
        .iter()
        .filter_map(|column| {
            let na = table.missing_count(column)?;
            let percentage = if total > 0 {
                na as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            Some((
                column.to_string(),
                json!({
                    "na_count": na,
                    "total_count": total,
                    "na_percentage": percentage,
                }),
            ))
        })
        .collect()
}

impl Validator for NotNa {
    fn name(&self) -> &str {
        "not_na"
    }

    fn validate(
        &self,
        subject: Subject<'_>,
        params: &Params,
    ) -> Result<ValidationResult, RuleError> {
        let requested = column_list(params, "columns")?;
        if requested.is_empty() {
            return Ok(ValidationResult::skipped(
                self.name(),
                "No columns specified to check for NA values",
            ));
        }

        let table = match subject {
            Subject::Loaded(value) => value.as_table(),
            Subject::RawFile(_) => None,
        };
        let Some(table) = table else {
            return Ok(ValidationResult::failed(
                self.name(),
                format!("Cannot check NA values for {}", subject.describe()),
            ));
        };

        let (present, missing): (Vec<&String>, Vec<&String>) = requested
            .iter()
            .partition(|column| table.column_index(column).is_some());
        let statistics = na_statistics(&table, &present);

        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
            return Ok(ValidationResult::failed(
                self.name(),
                format!("Columns not found: {}", names.join(", ")),
            )
            .with_detail("missing_columns", names)
            .with_detail("available_columns", table.columns().to_vec())
            .with_detail("na_statistics", statistics));
        }

        let total = table.row_count();
        let all_na: Vec<&str> = present
            .iter()
            .filter(|column| total > 0 && table.missing_count(column) == Some(total))
            .map(|c| c.as_str())
            .collect();

        if all_na.is_empty() {
            Ok(ValidationResult::passed(self.name(), "No columns contain all NA values")
                .with_detail("na_statistics", statistics))
        } else {
            Ok(ValidationResult::failed(
                self.name(),
                format!("Columns contain all NA values: {}", all_na.join(", ")),
            )
            .with_detail("all_na_columns", all_na)
            .with_detail("na_statistics", statistics))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::ValidationStatus;
    use crate::core::value::StructuredValue;

    fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    fn sample() -> StructuredValue {
        StructuredValue::Tabular(Table::new(
            vec!["id".into(), "score".into(), "note".into()],
            vec![
                cells(&[Some("1"), None, None]),
                cells(&[Some("2"), Some("0.5"), None]),
            ],
        ))
    }

    fn columns(value: JsonValue) -> Params {
        let mut params = Params::new();
        params.insert("columns".into(), value);
        params
    }

    #[test]
    fn test_partially_missing_passes() {
        let value = sample();
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["id", "score"])))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Passed);
        assert_eq!(
            result.detail("na_statistics"),
            Some(&json!({
                "id": {"na_count": 0, "total_count": 2, "na_percentage": 0.0},
                "score": {"na_count": 1, "total_count": 2, "na_percentage": 50.0},
            }))
        );
    }

    #[test]
    fn test_all_missing_fails() {
        let value = sample();
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["score", "note"])))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Failed);
        assert_eq!(result.detail("all_na_columns"), Some(&json!(["note"])));
    }

    #[test]
    fn test_absent_column_fails() {
        let value = sample();
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["id", "label"])))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Failed);
        assert_eq!(result.message.as_deref(), Some("Columns not found: label"));
        assert_eq!(result.detail("missing_columns"), Some(&json!(["label"])));
        assert_eq!(
            result.detail("available_columns"),
            Some(&json!(["id", "score", "note"]))
        );
        assert!(result.detail("na_statistics").unwrap().get("id").is_some());
    }

    #[test]
    fn test_zero_rows_is_not_all_missing() {
        let value = StructuredValue::Tabular(Table::new(vec!["a".into()], Vec::new()));
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!("a")))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Passed);
    }

    #[test]
    fn test_json_records_are_checked() {
        let value = StructuredValue::Hierarchical(json!([{"a": null}, {"a": null, "b": 1}]));
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["a", "b"])))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Failed);
        assert_eq!(result.detail("all_na_columns"), Some(&json!(["a"])));
    }

    #[test]
    fn test_skips_and_rejects_non_tabular() {
        let value = sample();
        let result = NotNa.validate(Subject::Loaded(&value), &Params::new()).unwrap();
        assert_eq!(result.status, ValidationStatus::Skipped);

        let value = StructuredValue::Hierarchical(json!([1, 2]));
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["a"])))
            .unwrap();
        assert_eq!(result.status, ValidationStatus::Failed);
        assert_eq!(result.message.as_deref(), Some("Cannot check NA values for array"));

        let value = StructuredValue::Scalar(json!(3));
        let result = NotNa
            .validate(Subject::Loaded(&value), &columns(json!(["a"])))
            .unwrap();
        assert_eq!(result.message.as_deref(), Some("Cannot check NA values for scalar"));
    }
}
