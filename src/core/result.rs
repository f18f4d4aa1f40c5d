//! Validation outcomes and status aggregation.

use crate::core::value::Details;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

impl ValidationStatus {
    /// Aggregate child statuses with the domination rule:
    /// FAILED > ERROR > {PASSED, SKIPPED}.
    ///
    /// The result does not depend on input order. No children, or only
    /// passed/skipped children, aggregate to `Passed`.
    pub fn dominate<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ValidationStatus>,
    {
        let mut aggregate = ValidationStatus::Passed;
        for status in statuses {
            match status {
                ValidationStatus::Failed => return ValidationStatus::Failed,
                ValidationStatus::Error => aggregate = ValidationStatus::Error,
                ValidationStatus::Passed | ValidationStatus::Skipped => {}
            }
        }
        aggregate
    }

    /// Uppercase label used in human output.
    pub fn label(&self) -> &'static str {
        match self {
            ValidationStatus::Passed => "PASSED",
            ValidationStatus::Failed => "FAILED",
            ValidationStatus::Skipped => "SKIPPED",
            ValidationStatus::Error => "ERROR",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, ValidationStatus::Passed)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one validation rule applied to one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Rule type name (e.g. `not_empty`), or a synthetic rule such as
    /// `file_exists` / `file_pattern`.
    pub rule: String,
    pub status: ValidationStatus,
    pub message: Option<String>,
    pub details: Option<Details>,
}

impl ValidationResult {
    /// Create a result without message or details.
    pub fn new(rule: impl Into<String>, status: ValidationStatus) -> Self {
        Self {
            rule: rule.into(),
            status,
            message: None,
            details: None,
        }
    }

    pub fn passed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, ValidationStatus::Passed).with_message(message)
    }

    pub fn failed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, ValidationStatus::Failed).with_message(message)
    }

    pub fn skipped(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, ValidationStatus::Skipped).with_message(message)
    }

    pub fn error(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule, ValidationStatus::Error).with_message(message)
    }

    /// Set the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the details mapping.
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a single detail entry.
    pub fn with_detail(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.details
            .get_or_insert_with(Details::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a detail entry.
    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }
}

/// Validation results for one (module, file rule) entry.
///
/// The status is always derived from the contained results; there is no
/// way to set it independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleValidationResult {
    pub stage: String,
    pub module: String,
    status: ValidationStatus,
    validations: Vec<ValidationResult>,
}

impl ModuleValidationResult {
    /// Build an entry, computing its status with the domination rule.
    pub fn new(
        stage: impl Into<String>,
        module: impl Into<String>,
        validations: Vec<ValidationResult>,
    ) -> Self {
        let status = ValidationStatus::dominate(validations.iter().map(|v| v.status));
        Self {
            stage: stage.into(),
            module: module.into(),
            status,
            validations,
        }
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn validations(&self) -> &[ValidationResult] {
        &self.validations
    }

    /// Results whose status is not `Passed`.
    pub fn non_passed(&self) -> impl Iterator<Item = &ValidationResult> {
        self.validations.iter().filter(|v| !v.status.is_passed())
    }
}
