//! Validation engine implementation.
//!
//! The engine walks `results_root/{stage}/{module}`, matches each stage's
//! file rules inside every module directory and runs the configured
//! validators on the matched files.

use crate::config::{self, FileRule, ValidationConfig, ValidationRule};
use crate::core::error::{ConfigResult, EngineError, EngineResult, LoadError};
use crate::core::plugin::{extension_of, Subject, Validator};
use crate::core::result::{ModuleValidationResult, ValidationResult};
use crate::core::value::{Params, StructuredValue};
use crate::engine::discovery::{self, ModuleDir};
use crate::loaders::LoaderRegistry;
use crate::report::ValidationReport;
use crate::validators::ValidatorRegistry;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rule type that still runs, on the raw file, when loading failed.
pub const LOAD_EXEMPT_RULE: &str = "not_empty";

/// Synthetic rule reported when a validated path does not exist.
pub const FILE_EXISTS_RULE: &str = "file_exists";

/// Synthetic rule reported when a file rule matches nothing in a module.
pub const FILE_PATTERN_RULE: &str = "file_pattern";

/// Engine options.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Validate the modules of a stage on the rayon pool.
    ///
    /// Results are returned in the same order as a sequential run.
    pub parallel: bool,
}

impl EngineOptions {
    /// Create default options (sequential).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parallel validation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// The validation engine.
///
/// Holds an optional configuration and shared, read-only registries.
pub struct ValidationEngine {
    config: Option<ValidationConfig>,
    config_path: Option<PathBuf>,
    loaders: Arc<LoaderRegistry>,
    validators: Arc<ValidatorRegistry>,
    options: EngineOptions,
}

impl ValidationEngine {
    /// Create an engine with the built-in loaders and validators.
    pub fn new() -> Self {
        Self::with_registries(
            Arc::new(LoaderRegistry::with_builtins()),
            Arc::new(ValidatorRegistry::with_builtins()),
        )
    }

    /// Create an engine over the given registries.
    pub fn with_registries(
        loaders: Arc<LoaderRegistry>,
        validators: Arc<ValidatorRegistry>,
    ) -> Self {
        Self {
            config: None,
            config_path: None,
            loaders,
            validators,
            options: EngineOptions::default(),
        }
    }

    /// Create an engine with built-in registries and a configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let mut engine = Self::new();
        engine.load_config(path)?;
        Ok(engine)
    }

    /// Set engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Load and replace the configuration from a file.
    ///
    /// On error the previous configuration is kept.
    pub fn load_config(&mut self, path: impl AsRef<Path>) -> ConfigResult<&ValidationConfig> {
        let path = path.as_ref();
        let config = config::parse_file(path)?;
        log::info!(
            "Loaded validation config {} ({} stages, {} rules)",
            path.display(),
            config.stages().len(),
            config.rule_count()
        );
        self.config_path = Some(path.to_path_buf());
        let config = self.config.insert(config);
        Ok(&*config)
    }

    /// Find a validation file in `directory` and load it.
    pub fn discover_config(&mut self, directory: impl AsRef<Path>) -> ConfigResult<PathBuf> {
        let path = config::discover(directory)?;
        self.load_config(&path)?;
        Ok(path)
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: ValidationConfig) {
        self.config = Some(config);
        self.config_path = None;
    }

    /// The loaded configuration, if any.
    pub fn config(&self) -> Option<&ValidationConfig> {
        self.config.as_ref()
    }

    /// Path the configuration was loaded from, if it came from a file.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Validate a single file against a list of rules.
    pub fn validate_file(
        &self,
        path: &Path,
        rules: &[ValidationRule],
        stage: &str,
        module: &str,
    ) -> ModuleValidationResult {
        ModuleValidationResult::new(stage, module, self.file_results(path, rules))
    }

    /// Validate every module of one stage.
    ///
    /// Returns one entry per (module, file rule) pair. A stage without a
    /// directory under `results_root` yields no entries.
    pub fn validate_stage(
        &self,
        stage: &str,
        results_root: impl AsRef<Path>,
    ) -> EngineResult<Vec<ModuleValidationResult>> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigNotLoaded)?;
        let stage_config = config.stage(stage).ok_or_else(|| unknown_stage(config, stage))?;

        let stage_dir = results_root.as_ref().join(stage);
        if !stage_dir.is_dir() {
            log::info!("Stage '{}' has no directory at {}, skipping", stage, stage_dir.display());
            return Ok(Vec::new());
        }

        let modules = discovery::module_dirs(&stage_dir);
        log::info!("Validating stage '{}' ({} modules)", stage, modules.len());

        let rules = &stage_config.rules;
        let validate = |module: &ModuleDir| self.validate_module(stage, module, rules);
        let per_module: Vec<Vec<ModuleValidationResult>> = if self.options.parallel {
            modules.par_iter().map(validate).collect()
        } else {
            modules.iter().map(validate).collect()
        };

        Ok(per_module.into_iter().flatten().collect())
    }

    /// Validate every configured stage, in declaration order.
    pub fn validate_all(
        &self,
        results_root: impl AsRef<Path>,
        benchmark: Option<&str>,
    ) -> EngineResult<ValidationReport> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigNotLoaded)?;
        let stages: Vec<&str> = config.stage_names().collect();
        self.run_stages(&stages, results_root.as_ref(), benchmark)
    }

    /// Validate a subset of stages.
    ///
    /// Stages still run in configuration order. Every name is checked before
    /// any validation starts.
    pub fn validate_stages<S: AsRef<str>>(
        &self,
        names: &[S],
        results_root: impl AsRef<Path>,
        benchmark: Option<&str>,
    ) -> EngineResult<ValidationReport> {
        let config = self.config.as_ref().ok_or(EngineError::ConfigNotLoaded)?;
        if let Some(unknown) = names.iter().find(|n| !config.has_stage(n.as_ref())) {
            return Err(unknown_stage(config, unknown.as_ref()));
        }

        let stages: Vec<&str> = config
            .stage_names()
            .filter(|stage| names.iter().any(|n| n.as_ref() == *stage))
            .collect();
        self.run_stages(&stages, results_root.as_ref(), benchmark)
    }

    fn run_stages(
        &self,
        stages: &[&str],
        results_root: &Path,
        benchmark: Option<&str>,
    ) -> EngineResult<ValidationReport> {
        let mut results = Vec::new();
        for stage in stages {
            results.extend(self.validate_stage(stage, results_root)?);
        }

        let report = ValidationReport::new(results, benchmark.map(str::to_string));
        log::info!(
            "Validated {} entries: {} passed, {} failed",
            report.total_modules(),
            report.passed_modules(),
            report.failed_modules()
        );
        Ok(report)
    }

    fn validate_module(
        &self,
        stage: &str,
        module: &ModuleDir,
        rules: &[FileRule],
    ) -> Vec<ModuleValidationResult> {
        rules
            .iter()
            .map(|file_rule| {
                let pattern = file_rule.resolve_pattern(&module.name, stage);
                let files = match discovery::matching_files(&module.path, &pattern) {
                    Ok(files) => files,
                    Err(e) => {
                        let result = ValidationResult::error(
                            FILE_PATTERN_RULE,
                            format!("Invalid file pattern '{}': {}", pattern, e),
                        );
                        return ModuleValidationResult::new(stage, &module.name, vec![result]);
                    }
                };

                if files.is_empty() {
                    log::warn!(
                        "No files matching '{}' in {}/{}",
                        file_rule.file_pattern,
                        stage,
                        module.name
                    );
                    let result = ValidationResult::failed(
                        FILE_PATTERN_RULE,
                        format!(
                            "No files matching pattern: {}",
                            file_rule.display_pattern(&module.name, stage)
                        ),
                    )
                    .with_detail("file_pattern", file_rule.file_pattern.as_str())
                    .with_detail("pattern", pattern)
                    .with_detail("directory", module.path.display().to_string());
                    return ModuleValidationResult::new(stage, &module.name, vec![result]);
                }

                let validations = files
                    .iter()
                    .flat_map(|file| self.file_results(file, &file_rule.validations))
                    .collect();
                ModuleValidationResult::new(stage, &module.name, validations)
            })
            .collect()
    }

    fn file_results(&self, path: &Path, rules: &[ValidationRule]) -> Vec<ValidationResult> {
        if !path.exists() {
            return vec![ValidationResult::failed(
                FILE_EXISTS_RULE,
                format!("File not found: {}", path.display()),
            )];
        }

        log::debug!("Validating {} against {} rules", path.display(), rules.len());
        let loaded = self.load(path);
        if let Err(e) = &loaded {
            log::warn!("{}", e);
        }

        rules.iter().map(|rule| self.apply_rule(rule, path, &loaded)).collect()
    }

    fn load(&self, path: &Path) -> Result<StructuredValue, LoadError> {
        let loader = self.loaders.get(path).ok_or_else(|| LoadError::Unsupported {
            extension: extension_of(path)
                .map(|e| format!(".{}", e))
                .unwrap_or_else(|| "(none)".to_string()),
        })?;

        panic::catch_unwind(AssertUnwindSafe(|| loader.load(path))).unwrap_or_else(|payload| {
            Err(LoadError::Panicked {
                loader: loader.name().to_string(),
                path: path.to_path_buf(),
                message: panic_message(payload.as_ref()),
            })
        })
    }

    fn apply_rule(
        &self,
        rule: &ValidationRule,
        path: &Path,
        loaded: &Result<StructuredValue, LoadError>,
    ) -> ValidationResult {
        let rule_type = rule.rule_type.as_str();
        let validator = match self.validators.get(rule_type) {
            Some(validator) => validator,
            None => {
                return ValidationResult::error(
                    rule_type,
                    format!("Unknown validator: {}", rule_type),
                )
            }
        };

        let subject = match loaded {
            Ok(value) => Subject::Loaded(value),
            Err(_) if rule_type == LOAD_EXEMPT_RULE => Subject::RawFile(path),
            Err(e) => {
                return ValidationResult::error(
                    rule_type,
                    format!("Cannot validate - file load error: {}", e),
                )
            }
        };

        let result = run_validator(validator.as_ref(), rule_type, subject, &rule.params);
        log::debug!("{} on {}: {}", rule_type, path.display(), result.status);
        result
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config_path", &self.config_path)
            .field("config_loaded", &self.config.is_some())
            .field("loaders", &self.loaders)
            .field("validators", &self.validators)
            .field("options", &self.options)
            .finish()
    }
}

/// Invoke a validator, turning rule errors and panics into `ERROR` results.
///
/// The result is reported under the configured rule type.
fn run_validator(
    validator: &dyn Validator,
    rule_type: &str,
    subject: Subject<'_>,
    params: &Params,
) -> ValidationResult {
    match panic::catch_unwind(AssertUnwindSafe(|| validator.validate(subject, params))) {
        Ok(Ok(mut result)) => {
            result.rule = rule_type.to_string();
            result
        }
        Ok(Err(e)) => ValidationResult::error(rule_type, format!("Error during validation: {}", e)),
        Err(payload) => ValidationResult::error(
            rule_type,
            format!("Validator panicked: {}", panic_message(payload.as_ref())),
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn unknown_stage(config: &ValidationConfig, stage: &str) -> EngineError {
    EngineError::UnknownStage {
        stage: stage.to_string(),
        available: config.stage_names().map(str::to_string).collect(),
    }
}
