//! Parser for `validation.yaml` files.

use crate::config::model::{
    FileRule, StageValidation, ValidationConfig, ValidationRule, DEFAULT_VERSION,
};
use crate::core::error::{ConfigError, ConfigResult};
use crate::core::value::Params;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

/// File names tried, in order, when discovering a validation file.
pub const CANDIDATE_FILES: [&str; 2] = ["validation.yaml", "validation.yml"];

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    version: Option<YamlValue>,
    #[serde(default)]
    stages: Option<IndexMap<String, Option<RawStage>>>,
}

#[derive(Deserialize)]
struct RawStage {
    #[serde(default)]
    rules: Option<Vec<RawFileRule>>,
}

#[derive(Deserialize)]
struct RawFileRule {
    file_pattern: String,
    #[serde(default)]
    validations: Option<Vec<YamlValue>>,
}

/// Parse a validation file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> ConfigResult<ValidationConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_str(&content).map_err(|e| e.with_origin(path))?;
    log::debug!(
        "Parsed {} ({} stages, {} file rules)",
        path.display(),
        config.stages().len(),
        config.rule_count()
    );
    Ok(config)
}

/// Parse a validation document held in memory.
pub fn parse_str(yaml: &str) -> ConfigResult<ValidationConfig> {
    let document: YamlValue = serde_yaml::from_str(yaml)
        .map_err(|e| ConfigError::parse(format!("Invalid YAML: {}", e)))?;
    parse_value(document)
}

/// Parse an already-decoded YAML document.
pub fn parse_value(document: YamlValue) -> ConfigResult<ValidationConfig> {
    match &document {
        YamlValue::Mapping(_) => {}
        YamlValue::Null => return Err(ConfigError::parse("document is empty")),
        other => {
            return Err(ConfigError::parse(format!(
                "top level must be a mapping, got {}",
                yaml_kind(other)
            )))
        }
    }

    let raw: RawConfig = serde_yaml::from_value(document)
        .map_err(|e| ConfigError::parse(e.to_string()))?;

    let version = parse_version(raw.version)?;

    let mut stages = IndexMap::new();
    for (stage_name, raw_stage) in raw.stages.unwrap_or_default() {
        let raw_rules = raw_stage.and_then(|s| s.rules).unwrap_or_default();
        let mut rules = Vec::with_capacity(raw_rules.len());

        for raw_rule in raw_rules {
            check_pattern(&stage_name, &raw_rule.file_pattern)?;

            let validations = raw_rule
                .validations
                .unwrap_or_default()
                .into_iter()
                .map(|entry| parse_validation(entry, &stage_name, &raw_rule.file_pattern))
                .collect::<ConfigResult<Vec<_>>>()?;

            rules.push(FileRule::new(raw_rule.file_pattern, validations));
        }

        stages.insert(stage_name, StageValidation { rules });
    }

    Ok(ValidationConfig::new(version, stages))
}

/// Find `validation.yaml` or `validation.yml` in a directory.
pub fn discover(directory: impl AsRef<Path>) -> ConfigResult<PathBuf> {
    let directory = directory.as_ref();

    CANDIDATE_FILES
        .iter()
        .map(|candidate| directory.join(candidate))
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::NotDiscovered {
            directory: directory.to_path_buf(),
            candidates: CANDIDATE_FILES.iter().map(|c| c.to_string()).collect(),
        })
}

fn parse_version(raw: Option<YamlValue>) -> ConfigResult<String> {
    match raw {
        None | Some(YamlValue::Null) => Ok(DEFAULT_VERSION.to_string()),
        Some(YamlValue::String(version)) => Ok(version),
        Some(YamlValue::Number(version)) => Ok(version.to_string()),
        Some(other) => Err(ConfigError::parse(format!(
            "'version' must be a string or number, got {}",
            yaml_kind(&other)
        ))),
    }
}

fn check_pattern(stage: &str, pattern: &str) -> ConfigResult<()> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::parse(format!(
            "stage '{}' has a rule with an empty file_pattern",
            stage
        )));
    }

    let resolved = FileRule::new(pattern, Vec::new()).resolve_pattern("module", stage);
    glob::Pattern::new(&resolved).map_err(|e| {
        ConfigError::parse(format!(
            "stage '{}': invalid file_pattern '{}': {}",
            stage, pattern, e
        ))
    })?;
    Ok(())
}

fn parse_validation(entry: YamlValue, stage: &str, pattern: &str) -> ConfigResult<ValidationRule> {
    match entry {
        YamlValue::String(rule_type) => {
            if rule_type.trim().is_empty() {
                return Err(ConfigError::parse(format!(
                    "stage '{}', pattern '{}': empty validation type",
                    stage, pattern
                )));
            }
            Ok(ValidationRule::new(rule_type))
        }
        YamlValue::Mapping(mapping) => {
            let mut rule_type: Option<YamlValue> = None;
            let mut params = Params::new();

            for (key, value) in mapping {
                let key = match key {
                    YamlValue::String(key) => key,
                    other => {
                        return Err(ConfigError::parse(format!(
                            "stage '{}', pattern '{}': parameter names must be strings, got {}",
                            stage,
                            pattern,
                            yaml_kind(&other)
                        )))
                    }
                };

                if key == "type" {
                    rule_type = Some(value);
                    continue;
                }

                let value = serde_json::to_value(&value).map_err(|e| {
                    ConfigError::parse(format!(
                        "stage '{}', pattern '{}': parameter '{}' is not representable: {}",
                        stage, pattern, key, e
                    ))
                })?;
                params.insert(key, value);
            }

            match rule_type {
                Some(YamlValue::String(rule_type)) if !rule_type.trim().is_empty() => {
                    Ok(ValidationRule { rule_type, params })
                }
                Some(_) => Err(ConfigError::parse(format!(
                    "stage '{}', pattern '{}': validation 'type' must be a non-empty string",
                    stage, pattern
                ))),
                None => Err(ConfigError::parse(format!(
                    "stage '{}', pattern '{}': validation rule missing 'type' (params: {})",
                    stage,
                    pattern,
                    params.keys().cloned().collect::<Vec<_>>().join(", ")
                ))),
            }
        }
        other => Err(ConfigError::parse(format!(
            "stage '{}', pattern '{}': a validation must be a mapping or a string, got {}",
            stage,
            pattern,
            yaml_kind(&other)
        ))),
    }
}

fn yaml_kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
version: 1.0
stages:
  dataset:
    rules:
      - file_pattern: "*.csv"
        validations:
          - type: not_empty
          - type: has_columns
            columns: [id, value]
      - file_pattern: "{module}.meta.json"
        validations:
          - not_empty
  method:
    rules:
      - file_pattern: "{module}_result.csv"
        validations:
          - type: has_shape
            min_rows: 1
            max_cols: 10
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_str(SAMPLE).unwrap();
        assert_eq!(config.version(), "1.0");
        assert_eq!(config.stage_names().collect::<Vec<_>>(), vec!["dataset", "method"]);

        let dataset = config.stage("dataset").unwrap();
        assert_eq!(dataset.rules.len(), 2);
        assert_eq!(dataset.rules[0].file_pattern, "*.csv");
        assert_eq!(dataset.rules[0].validations.len(), 2);
        assert_eq!(
            dataset.rules[0].validations[1].params.get("columns"),
            Some(&json!(["id", "value"]))
        );

        // bare string entry
        assert_eq!(dataset.rules[1].validations[0].rule_type, "not_empty");
        assert!(dataset.rules[1].validations[0].params.is_empty());

        let method = config.stage("method").unwrap();
        let shape = &method.rules[0].validations[0];
        let keys: Vec<&str> = shape.params.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["min_rows", "max_cols"]);
    }

    #[test]
    fn test_missing_type_is_parse_error() {
        let yaml = r#"
stages:
  dataset:
    rules:
      - file_pattern: "*.csv"
        validations:
          - columns: [a]
"#;
        let error = parse_str(yaml).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("missing 'type'"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let error = parse_str("stages: [unclosed").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));

        let error = parse_str("").unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));

        let error = parse_str("- just\n- a list\n").unwrap_err();
        assert!(error.to_string().contains("mapping"));
    }

    #[test]
    fn test_non_string_type_rejected() {
        let yaml = r#"
stages:
  s:
    rules:
      - file_pattern: "*"
        validations:
          - type: 5
"#;
        assert!(matches!(parse_str(yaml), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_pattern_rejected() {
        let yaml = "stages:\n  s:\n    rules:\n      - validations: [not_empty]\n";
        assert!(matches!(parse_str(yaml), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let yaml = "stages:\n  s:\n    rules:\n      - file_pattern: \"[*.csv\"\n";
        let error = parse_str(yaml).unwrap_err();
        assert!(error.to_string().contains("invalid file_pattern"));
    }

    #[test]
    fn test_defaults() {
        let config = parse_str("stages:\n  dataset:\n  method:\n    rules:\n").unwrap();
        assert_eq!(config.version(), DEFAULT_VERSION);
        assert!(config.stage("dataset").unwrap().rules.is_empty());
        assert!(config.stage("method").unwrap().rules.is_empty());

        let config = parse_str("version: \"2\"\n").unwrap();
        assert_eq!(config.version(), "2");
        assert!(config.stages().is_empty());
    }

    #[test]
    fn test_parse_file_not_found() {
        let dir = TempDir::new().unwrap();
        let error = parse_file(dir.path().join("validation.yaml")).unwrap_err();
        assert!(matches!(error, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_parse_file_error_mentions_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("validation.yaml");
        std::fs::write(
            &path,
            "stages: {s: {rules: [{file_pattern: x, validations: [{}]}]}}",
        )
        .unwrap();
        let error = parse_file(&path).unwrap_err();
        assert!(error.to_string().contains("validation.yaml"));
    }

    #[test]
    fn test_discover_prefers_yaml() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            discover(dir.path()),
            Err(ConfigError::NotDiscovered { .. })
        ));

        std::fs::write(dir.path().join("validation.yml"), "stages: {}").unwrap();
        assert_eq!(discover(dir.path()).unwrap(), dir.path().join("validation.yml"));

        std::fs::write(dir.path().join("validation.yaml"), "stages: {}").unwrap();
        assert_eq!(discover(dir.path()).unwrap(), dir.path().join("validation.yaml"));
    }

    #[test]
    fn test_round_trip_sample() {
        let config = parse_str(SAMPLE).unwrap();
        let yaml = config.to_yaml().unwrap();
        let reparsed = parse_str(&yaml).unwrap();
        assert_eq!(config, reparsed);
    }

    fn param_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            any::<i32>().prop_map(|n| json!(n)),
            any::<bool>().prop_map(|b| json!(b)),
            "[a-z]{0,8}".prop_map(|s| json!(s)),
            proptest::collection::vec("[a-z]{1,6}", 0..4).prop_map(|v| json!(v)),
        ]
    }

    fn rule_strategy() -> impl Strategy<Value = ValidationRule> {
        (
            "[a-z_]{1,12}",
            proptest::collection::vec(("[a-z_]{1,8}", param_value()), 0..4),
        )
            .prop_filter("'type' is reserved", |(_, params)| {
                params.iter().all(|(k, _)| k != "type")
            })
            .prop_map(|(rule_type, params)| {
                let mut rule = ValidationRule::new(rule_type);
                for (key, value) in params {
                    rule.params.insert(key, value);
                }
                rule
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_rules(
            rules in proptest::collection::vec(rule_strategy(), 0..6)
        ) {
            let mut stages = IndexMap::new();
            stages.insert(
                "stage".to_string(),
                StageValidation { rules: vec![FileRule::new("*.csv", rules)] },
            );
            let config = ValidationConfig::new("1.0", stages);

            let reparsed = parse_str(&config.to_yaml().unwrap()).unwrap();
            prop_assert_eq!(config, reparsed);
        }
    }
}
