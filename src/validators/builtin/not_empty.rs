//! `not_empty`: the artifact holds something.

use crate::core::error::RuleError;
use crate::core::plugin::{Subject, Validator};
use crate::core::result::ValidationResult;
use crate::core::value::{Params, StructuredValue};
use crate::validators::registry::ValidatorRegistry;
use serde_json::json;

/// Register the not_empty validator.
pub fn register(registry: &mut ValidatorRegistry) {
    registry.register(NotEmpty);
}

/// Passes when the loaded value (or the raw file, if loading failed) is not
/// empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl NotEmpty {
    fn check_file(&self, path: &std::path::Path) -> ValidationResult {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => return ValidationResult::failed(self.name(), "File does not exist"),
        };

        if metadata.len() == 0 {
            ValidationResult::failed(self.name(), "File is empty (0 bytes)")
                .with_detail("size_bytes", 0)
        } else {
            ValidationResult::passed(self.name(), "File exists and is not empty")
                .with_detail("size_bytes", metadata.len())
        }
    }

    fn check_value(&self, value: &StructuredValue) -> ValidationResult {
        match value {
            StructuredValue::Tabular(table) => {
                let (rows, cols) = table.shape();
                let result = if table.is_empty() {
                    ValidationResult::failed(self.name(), "Table is empty")
                } else {
                    ValidationResult::passed(self.name(), "Table is not empty")
                };
                result.with_detail("shape", json!([rows, cols]))
            }
            StructuredValue::Hierarchical(_) => {
                let length = value.len().unwrap_or(0);
                let kind = value.kind();
                let result = if value.is_empty() {
                    ValidationResult::failed(self.name(), format!("JSON {} is empty", kind))
                } else {
                    ValidationResult::passed(self.name(), format!("JSON {} is not empty", kind))
                };
                result.with_detail("length", length)
            }
            StructuredValue::Scalar(_) => {
                ValidationResult::passed(self.name(), "Scalar value is not empty")
            }
            StructuredValue::Missing => ValidationResult::failed(self.name(), "Value is null"),
        }
    }
}

impl Validator for NotEmpty {
    fn name(&self) -> &str {
        "not_empty"
    }

    fn validate(
        &self,
        subject: Subject<'_>,
        _params: &Params,
    ) -> Result<ValidationResult, RuleError> {
        Ok(match subject {
            Subject::RawFile(path) => self.check_file(path),
            Subject::Loaded(value) => self.check_value(value),
        })
    }
}
