//! In-memory representation of the validation DSL.
//!
//! ```yaml
//! version: "1.0"
//! stages:
//!   dataset:
//!     rules:
//!       - file_pattern: "{module}.csv"
//!         validations:
//!           - not_empty
//!           - type: has_columns
//!             columns: [id, value]
//! ```

use crate::core::value::Params;
use indexmap::IndexMap;
use serde::Serialize;

/// Version assumed when a validation file does not declare one.
pub const DEFAULT_VERSION: &str = "1.0";

/// Placeholder replaced by the module directory name in file patterns.
pub const MODULE_PLACEHOLDER: &str = "{module}";

/// Placeholder replaced by the stage name in file patterns.
pub const STAGE_PLACEHOLDER: &str = "{stage}";

/// A single validation: a rule type plus its parameters.
///
/// Serializes back to the DSL form with `type` first and the parameters
/// flattened next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(flatten)]
    pub params: Params,
}

impl ValidationRule {
    /// Create a rule with no parameters.
    pub fn new(rule_type: impl Into<String>) -> Self {
        Self {
            rule_type: rule_type.into(),
            params: Params::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// A glob pattern and the validations every matching file must pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRule {
    pub file_pattern: String,
    pub validations: Vec<ValidationRule>,
}

impl FileRule {
    pub fn new(file_pattern: impl Into<String>, validations: Vec<ValidationRule>) -> Self {
        Self {
            file_pattern: file_pattern.into(),
            validations,
        }
    }

    /// The pattern with `{module}` and `{stage}` replaced.
    ///
    /// Substituted names are glob-escaped so that a directory called
    /// `run[1]` matches itself and not `run1`.
    pub fn resolve_pattern(&self, module: &str, stage: &str) -> String {
        self.file_pattern
            .replace(MODULE_PLACEHOLDER, &glob::Pattern::escape(module))
            .replace(STAGE_PLACEHOLDER, &glob::Pattern::escape(stage))
    }

    /// The pattern with `{module}` and `{stage}` replaced verbatim, for
    /// messages.
    pub fn display_pattern(&self, module: &str, stage: &str) -> String {
        self.file_pattern
            .replace(MODULE_PLACEHOLDER, module)
            .replace(STAGE_PLACEHOLDER, stage)
    }
}

/// The file rules of one stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StageValidation {
    pub rules: Vec<FileRule>,
}

/// A parsed validation file.
///
/// Stages keep their declaration order. There is no mutating API: once
/// parsed, a configuration is only read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationConfig {
    version: String,
    stages: IndexMap<String, StageValidation>,
}

impl ValidationConfig {
    pub fn new(version: impl Into<String>, stages: IndexMap<String, StageValidation>) -> Self {
        Self {
            version: version.into(),
            stages,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// All stages in declaration order.
    pub fn stages(&self) -> &IndexMap<String, StageValidation> {
        &self.stages
    }

    /// Look up a stage by name.
    pub fn stage(&self, name: &str) -> Option<&StageValidation> {
        self.stages.get(name)
    }

    /// Stage names in declaration order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.keys().map(|s| s.as_str())
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.stages.contains_key(name)
    }

    /// Total number of file rules across all stages.
    pub fn rule_count(&self) -> usize {
        self.stages.values().map(|s| s.rules.len()).sum()
    }

    /// Serialize back to the YAML DSL.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_pattern() {
        let rule = FileRule::new("{stage}/{module}_*.csv", Vec::new());
        assert_eq!(rule.resolve_pattern("m1", "method"), "method/m1_*.csv");
        assert_eq!(rule.resolve_pattern("run[1]", "method"), "method/run[[]1[]]_*.csv");
        assert_eq!(rule.display_pattern("run[1]", "method"), "method/run[1]_*.csv");
    }

    #[test]
    fn test_rule_serializes_flat() {
        let rule = ValidationRule::new("has_columns").with_param("columns", json!(["a", "b"]));
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value, json!({"type": "has_columns", "columns": ["a", "b"]}));
    }

    #[test]
    fn test_stage_order_is_declaration_order() {
        let mut stages = IndexMap::new();
        stages.insert("method".to_string(), StageValidation::default());
        stages.insert("dataset".to_string(), StageValidation::default());
        let config = ValidationConfig::new("1.0", stages);
        let names: Vec<&str> = config.stage_names().collect();
        assert_eq!(names, vec!["method", "dataset"]);
        assert!(config.has_stage("dataset"));
        assert_eq!(config.rule_count(), 0);
    }
}
