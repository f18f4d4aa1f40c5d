//! The aggregated outcome of a validation run.

use crate::core::error::ArtifactError;
use crate::core::result::{ModuleValidationResult, ValidationStatus};
use crate::report::formatter::{format_report, ReportFormat};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Report over every entry produced by a run.
///
/// Counts are derived from the entries at construction. `total_modules`
/// counts (module, file rule) entries, not distinct module names; entries
/// whose status is `ERROR` count as neither passed nor failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    #[serde(rename = "validation_timestamp")]
    timestamp: String,
    benchmark: Option<String>,
    total_modules: usize,
    passed_modules: usize,
    failed_modules: usize,
    results: Vec<ModuleValidationResult>,
}

impl ValidationReport {
    /// Build a report stamped with the current UTC time.
    pub fn new(results: Vec<ModuleValidationResult>, benchmark: Option<String>) -> Self {
        let count =
            |status: ValidationStatus| results.iter().filter(|r| r.status() == status).count();
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            benchmark,
            total_modules: results.len(),
            passed_modules: count(ValidationStatus::Passed),
            failed_modules: count(ValidationStatus::Failed),
            results,
        }
    }

    /// Replace the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// RFC 3339 UTC timestamp of the run.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn benchmark(&self) -> Option<&str> {
        self.benchmark.as_deref()
    }

    pub fn total_modules(&self) -> usize {
        self.total_modules
    }

    pub fn passed_modules(&self) -> usize {
        self.passed_modules
    }

    pub fn failed_modules(&self) -> usize {
        self.failed_modules
    }

    pub fn results(&self) -> &[ModuleValidationResult] {
        &self.results
    }

    /// True when at least one entry failed.
    pub fn has_failures(&self) -> bool {
        self.failed_modules > 0
    }

    /// Entries whose status is `ERROR`.
    pub fn error_modules(&self) -> impl Iterator<Item = &ModuleValidationResult> {
        self.results
            .iter()
            .filter(|r| r.status() == ValidationStatus::Error)
    }

    /// Render the report in the given format.
    pub fn render(&self, format: ReportFormat) -> Result<String, ArtifactError> {
        format_report(self, format)
    }
}
