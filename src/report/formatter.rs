//! Report rendering: pretty JSON or a fixed human-readable layout.

use crate::core::error::ArtifactError;
use crate::core::result::ModuleValidationResult;
use crate::report::model::ValidationReport;
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const RULE_WIDTH: usize = 50;

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for ReportFormat {
    type Err = Infallible;

    /// `"json"` in any case selects JSON; anything else is human.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(ReportFormat::Json)
        } else {
            Ok(ReportFormat::Human)
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Human => write!(f, "human"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a report.
pub fn format_report(
    report: &ValidationReport,
    format: ReportFormat,
) -> Result<String, ArtifactError> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Human => Ok(render_human(report)),
    }
}

fn render_human(report: &ValidationReport) -> String {
    let mut lines = vec![format!("Validation Report - {}", report.timestamp())];
    if let Some(benchmark) = report.benchmark() {
        lines.push(format!("Benchmark: {}", benchmark));
    }
    lines.push(String::new());
    lines.push(format!("Total modules: {}", report.total_modules()));
    lines.push(format!("Passed: {}", report.passed_modules()));
    lines.push(format!("Failed: {}", report.failed_modules()));
    lines.push(String::new());

    let mut by_stage: BTreeMap<&str, Vec<&ModuleValidationResult>> = BTreeMap::new();
    for entry in report.results() {
        by_stage.entry(entry.stage.as_str()).or_default().push(entry);
    }

    for (stage, entries) in by_stage {
        lines.push(format!("Stage: {}", stage));
        lines.push("-".repeat(RULE_WIDTH));
        for entry in entries {
            let status = entry.status();
            let marker = if status.is_passed() { "✓" } else { "✗" };
            lines.push(format!("  {} Module: {} - {}", marker, entry.module, status.label()));
            if status.is_passed() {
                continue;
            }
            for validation in entry.non_passed() {
                match &validation.message {
                    Some(message) => lines.push(format!("    - {}: {}", validation.rule, message)),
                    None => lines.push(format!("    - {}", validation.rule)),
                }
            }
        }
        lines.push(String::new());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::{ValidationResult, ValidationStatus};
    use serde_json::json;

    fn sample() -> ValidationReport {
        ValidationReport::new(
            vec![
                ModuleValidationResult::new(
                    "method",
                    "m1",
                    vec![
                        ValidationResult::failed("has_columns", "Missing required columns: b")
                            .with_detail("missing", json!(["b"])),
                        ValidationResult::passed("not_empty", "Table is not empty"),
                    ],
                ),
                ModuleValidationResult::new(
                    "dataset",
                    "d1",
                    vec![ValidationResult::passed("not_empty", "Table is not empty")],
                ),
                ModuleValidationResult::new(
                    "method",
                    "m2",
                    vec![ValidationResult::new("foo", ValidationStatus::Error)],
                ),
            ],
            Some("demo".into()),
        )
        .with_timestamp("2024-01-01T00:00:00.000000Z")
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("human".parse::<ReportFormat>(), Ok(ReportFormat::Human));
        assert_eq!("yaml".parse::<ReportFormat>(), Ok(ReportFormat::Human));
    }

    #[test]
    fn test_human_layout() {
        let text = format_report(&sample(), ReportFormat::Human).unwrap();
        let dashes = "-".repeat(50);
        let expected = format!(
            "Validation Report - 2024-01-01T00:00:00.000000Z\n\
             Benchmark: demo\n\
             \n\
             Total modules: 3\n\
             Passed: 1\n\
             Failed: 1\n\
             \n\
             Stage: dataset\n\
             {dashes}\n  \
             ✓ Module: d1 - PASSED\n\
             \n\
             Stage: method\n\
             {dashes}\n  \
             ✗ Module: m1 - FAILED\n    \
             - has_columns: Missing required columns: b\n  \
             ✗ Module: m2 - ERROR\n    \
             - foo\n\
             \n",
            dashes = dashes
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_human_without_benchmark() {
        let report = ValidationReport::new(Vec::new(), None).with_timestamp("t");
        let text = report.render(ReportFormat::Human).unwrap();
        assert_eq!(text, "Validation Report - t\n\nTotal modules: 0\nPassed: 0\nFailed: 0\n\n");
    }

    #[test]
    fn test_json_fields() {
        let text = sample().render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["validation_timestamp"], "2024-01-01T00:00:00.000000Z");
        assert_eq!(value["benchmark"], "demo");
        assert_eq!(value["total_modules"], 3);
        assert_eq!(value["passed_modules"], 1);
        assert_eq!(value["failed_modules"], 1);

        let first = &value["results"][0];
        assert_eq!(first["stage"], "method");
        assert_eq!(first["module"], "m1");
        assert_eq!(first["status"], "failed");
        assert_eq!(first["validations"][0]["rule"], "has_columns");
        assert_eq!(first["validations"][0]["details"]["missing"], json!(["b"]));
        assert_eq!(value["results"][2]["validations"][0]["message"], serde_json::Value::Null);
    }
}
