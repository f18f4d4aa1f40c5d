//! `has_shape`: row and column counts fall within bounds.

use super::params::bound;
use crate::core::error::RuleError;
use crate::core::plugin::{Subject, Validator};
use crate::core::result::ValidationResult;
use crate::core::value::Params;
use crate::validators::registry::ValidatorRegistry;
use serde_json::json;

/// Register the has_shape validator.
pub fn register(registry: &mut ValidatorRegistry) {
    registry.register(HasShape);
}

/// Checks `(rows, cols)` against `min_rows`, `max_rows`, `min_cols` and
/// `max_cols`. Every violated bound is reported, not only the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasShape;

struct Constraints {
    min_rows: Option<usize>,
    max_rows: Option<usize>,
    min_cols: Option<usize>,
    max_cols: Option<usize>,
}

impl Constraints {
    fn from_params(params: &Params) -> Result<Self, RuleError> {
        Ok(Self {
            min_rows: bound(params, "min_rows")?,
            max_rows: bound(params, "max_rows")?,
            min_cols: bound(params, "min_cols")?,
            max_cols: bound(params, "max_cols")?,
        })
    }

    fn is_unconstrained(&self) -> bool {
        self.min_rows.is_none()
            && self.max_rows.is_none()
            && self.min_cols.is_none()
            && self.max_cols.is_none()
    }

    fn violations(&self, rows: usize, cols: usize) -> Vec<String> {
        let mut violations = Vec::new();
        if let Some(min) = self.min_rows.filter(|&min| rows < min) {
            violations.push(format!("rows ({}) < min_rows ({})", rows, min));
        }
        if let Some(max) = self.max_rows.filter(|&max| rows > max) {
            violations.push(format!("rows ({}) > max_rows ({})", rows, max));
        }
        if let Some(min) = self.min_cols.filter(|&min| cols < min) {
            violations.push(format!("cols ({}) < min_cols ({})", cols, min));
        }
        if let Some(max) = self.max_cols.filter(|&max| cols > max) {
            violations.push(format!("cols ({}) > max_cols ({})", cols, max));
        }
        violations
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "min_rows": self.min_rows,
            "max_rows": self.max_rows,
            "min_cols": self.min_cols,
            "max_cols": self.max_cols,
        })
    }
}

impl Validator for HasShape {
    fn name(&self) -> &str {
        "has_shape"
    }

    fn validate(
        &self,
        subject: Subject<'_>,
        params: &Params,
    ) -> Result<ValidationResult, RuleError> {
        let constraints = Constraints::from_params(params)?;
        if constraints.is_unconstrained() {
            return Ok(ValidationResult::skipped(self.name(), "No shape constraints specified"));
        }

        let (rows, cols) = match subject {
            Subject::Loaded(value) => value.shape(),
            Subject::RawFile(_) => None,
        }
        .ok_or_else(|| RuleError::UnsupportedSubject {
            validator: self.name().to_string(),
            subject: subject.describe(),
        })?;

        let violations = constraints.violations(rows, cols);
        let result = if violations.is_empty() {
            ValidationResult::passed(self.name(), "Shape constraints satisfied")
        } else {
            ValidationResult::failed(
                self.name(),
                format!("Shape constraints violated: {}", violations.join("; ")),
            )
        };

        Ok(result
            .with_detail("actual_shape", json!([rows, cols]))
            .with_detail("constraints", constraints.to_json()))
    }
}
