//! `has_columns`: required column names are present.

use super::params::column_list;
use crate::core::error::RuleError;
use crate::core::plugin::{Subject, Validator};
use crate::core::result::ValidationResult;
use crate::core::value::Params;
use crate::validators::registry::ValidatorRegistry;

/// Register the has_columns validator.
pub fn register(registry: &mut ValidatorRegistry) {
    registry.register(HasColumns);
}

/// Checks that every name in the `columns` parameter is a column of the
/// value. Objects count their keys as columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasColumns;

impl Validator for HasColumns {
    fn name(&self) -> &str {
        "has_columns"
    }

    fn validate(
        &self,
        subject: Subject<'_>,
        params: &Params,
    ) -> Result<ValidationResult, RuleError> {
        let required = column_list(params, "columns")?;
        if required.is_empty() {
            return Ok(ValidationResult::skipped(self.name(), "No columns specified to check"));
        }

        let actual = match subject {
            Subject::Loaded(value) => value.columns(),
            Subject::RawFile(_) => None,
        }
        .ok_or_else(|| RuleError::UnsupportedSubject {
            validator: self.name().to_string(),
            subject: subject.describe(),
        })?;

        let mut missing: Vec<&String> = required.iter().filter(|c| !actual.contains(*c)).collect();
        missing.sort();
        missing.dedup();

        let result = if missing.is_empty() {
            ValidationResult::passed(self.name(), "All required columns present")
        } else {
            let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
            ValidationResult::failed(
                self.name(),
                format!("Missing required columns: {}", names.join(", ")),
            )
            .with_detail("missing", names)
        };

        Ok(result
            .with_detail("required", required.clone())
            .with_detail("actual", actual))
    }
}
