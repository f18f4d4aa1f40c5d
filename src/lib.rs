//! # Artifact Validator - Rule-driven checks for benchmark outputs
//!
//! Artifact Validator checks the files a benchmark run leaves under
//! `results_root/{stage}/{module}/` against rules declared in a
//! `validation.yaml` file, and summarizes the outcome in a report.
//!
//! ## Features
//!
//! - **YAML Rules**: Per-stage glob patterns with an ordered list of checks
//! - **Pluggable Loaders**: Files are loaded by extension (`csv`, `tsv`, `json` built in)
//! - **Pluggable Validators**: `not_empty`, `has_columns`, `has_shape`, `not_na` built in
//! - **Fault Isolation**: A broken file or a failing check only affects its own result
//! - **Reports**: Pretty JSON or a fixed human-readable layout
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use artifact_validator::prelude::*;
//!
//! let engine = ValidationEngine::from_config_file("validation.yaml")?;
//! let report = engine.validate_all("out/", Some("my_benchmark"))?;
//! println!("{}", report.render(ReportFormat::Human)?);
//!
//! std::process::exit(if report.has_failures() { 1 } else { 0 });
//! ```
//!
//! ## Rule File
//!
//! ```yaml
//! version: "1.0"
//! stages:
//!   method:
//!     rules:
//!       - file_pattern: "{module}.csv"
//!         validations:
//!           - not_empty
//!           - type: has_columns
//!             columns: [id, score]
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Structured values, plugin traits, results and errors
//! - [`config`]: Rule file model and parser
//! - [`loaders`]: Loader registry and built-in loaders
//! - [`validators`]: Validator registry and built-in validators
//! - [`engine`]: Directory walking and rule evaluation
//! - [`report`]: Aggregated report and formatting
//!
//! ## Custom Validators
//!
//! ```rust,ignore
//! use artifact_validator::prelude::*;
//!
//! struct HasRows;
//!
//! impl Validator for HasRows {
//!     fn name(&self) -> &str {
//!         "has_rows"
//!     }
//!
//!     fn validate(
//!         &self,
//!         subject: Subject<'_>,
//!         _params: &Params,
//!     ) -> Result<ValidationResult, RuleError> {
//!         match subject {
//!             Subject::Loaded(StructuredValue::Tabular(t)) if t.row_count() > 0 => {
//!                 Ok(ValidationResult::passed(self.name(), "Table has rows"))
//!             }
//!             _ => Ok(ValidationResult::failed(self.name(), "No rows")),
//!         }
//!     }
//! }
//!
//! let mut validators = ValidatorRegistry::with_builtins();
//! validators.register(HasRows);
//! let engine = ValidationEngine::with_registries(
//!     Arc::new(LoaderRegistry::with_builtins()),
//!     Arc::new(validators),
//! );
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod engine;
pub mod loaders;
pub mod report;
pub mod validators;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use artifact_validator::prelude::*;
/// ```
pub mod prelude {
    // Values and results
    pub use crate::core::result::{ModuleValidationResult, ValidationResult, ValidationStatus};
    pub use crate::core::value::{Details, Params, StructuredValue, Table};

    // Plugin traits
    pub use crate::core::plugin::{DataLoader, Subject, Validator};

    // Errors
    pub use crate::core::error::{
        ArtifactError, ArtifactResult, ConfigError, EngineError, LoadError, RuleError,
    };

    // Configuration
    pub use crate::config::{FileRule, StageValidation, ValidationConfig, ValidationRule};

    // Registries
    pub use crate::loaders::builtin::{JsonLoader, TabularLoader};
    pub use crate::loaders::LoaderRegistry;
    pub use crate::validators::builtin::{HasColumns, HasShape, NotEmpty, NotNa};
    pub use crate::validators::ValidatorRegistry;

    // Engine and reports
    pub use crate::engine::{EngineOptions, ValidationEngine};
    pub use crate::report::{format_report, ReportFormat, ValidationReport};

    pub use std::sync::Arc;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
