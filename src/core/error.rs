//! Error types for the artifact validator.
//!
//! Uses thiserror for structured errors with context. Errors fall into two
//! groups:
//! - Fatal errors (bad or missing configuration, unknown stage) that abort a
//!   run before any validation happens
//! - Recoverable errors (load failures, rule failures) that the engine turns
//!   into an `ERROR` result for a single rule

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the artifact validator.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while locating or parsing a validation file.
///
/// All of these are fatal: no partially parsed configuration is ever used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Validation file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error(
        "No validation file found in {}. Looked for: {}",
        .directory.display(),
        .candidates.join(", ")
    )]
    NotDiscovered {
        directory: PathBuf,
        candidates: Vec<String>,
    },

    #[error("Failed to read validation file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid validation file{}: {message}", origin_suffix(.origin))]
    Parse {
        origin: Option<PathBuf>,
        message: String,
    },
}

fn origin_suffix(origin: &Option<PathBuf>) -> String {
    origin
        .as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    /// Build a parse error without a file origin.
    pub fn parse(message: impl Into<String>) -> Self {
        ConfigError::Parse {
            origin: None,
            message: message.into(),
        }
    }

    /// Attach the file the configuration was read from.
    pub fn with_origin(self, path: impl Into<PathBuf>) -> Self {
        match self {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                origin: Some(path.into()),
                message,
            },
            other => other,
        }
    }

    /// Whether this error means "no configuration exists" as opposed to
    /// "the configuration is broken".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::NotFound { .. } | ConfigError::NotDiscovered { .. }
        )
    }
}

/// Usage errors surfaced by the validation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No validation configuration loaded")]
    ConfigNotLoaded,

    #[error("Unknown stage: {stage} (configured: {})", .available.join(", "))]
    UnknownStage {
        stage: String,
        available: Vec<String>,
    },
}

/// Errors from turning a raw file into a structured value.
///
/// The engine captures these per file and never propagates them.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {format} file {}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("No loader available for file type: {extension}")]
    Unsupported { extension: String },

    #[error("Loader '{loader}' panicked on {}: {message}", .path.display())]
    Panicked {
        loader: String,
        path: PathBuf,
        message: String,
    },
}

/// Errors raised inside a validator's own logic.
///
/// Each one degrades to a single `ERROR` result for the rule that raised it.
#[derive(Error, Debug, Clone)]
pub enum RuleError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Validator '{validator}' cannot check {subject}")]
    UnsupportedSubject {
        validator: String,
        subject: String,
    },

    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    /// Shorthand for an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RuleError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for top-level operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_origin() {
        let error = ConfigError::parse("bad indentation").with_origin("/tmp/validation.yaml");
        let message = error.to_string();
        assert!(message.contains("/tmp/validation.yaml"));
        assert!(message.contains("bad indentation"));

        let bare = ConfigError::parse("bad indentation");
        assert_eq!(bare.to_string(), "Invalid validation file: bad indentation");
    }

    #[test]
    fn test_not_found_kinds() {
        assert!(ConfigError::NotFound { path: "x".into() }.is_not_found());
        assert!(ConfigError::NotDiscovered {
            directory: "d".into(),
            candidates: vec!["validation.yaml".into()],
        }
        .is_not_found());
        assert!(!ConfigError::parse("oops").is_not_found());
    }

    #[test]
    fn test_unknown_stage_lists_available() {
        let error = EngineError::UnknownStage {
            stage: "metric".into(),
            available: vec!["dataset".into(), "method".into()],
        };
        assert_eq!(
            error.to_string(),
            "Unknown stage: metric (configured: dataset, method)"
        );
    }

    #[test]
    fn test_top_level_conversions() {
        let error: ArtifactError = EngineError::ConfigNotLoaded.into();
        assert!(matches!(error, ArtifactError::Engine(EngineError::ConfigNotLoaded)));
        assert_eq!(error.to_string(), "Engine error: No validation configuration loaded");

        let error: ArtifactError = ConfigError::parse("x").into();
        assert!(matches!(error, ArtifactError::Config(_)));
    }
}
