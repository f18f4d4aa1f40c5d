//! Loader and validator traits.
//!
//! Both registries dispatch on these traits: loaders are looked up by file
//! extension, validators by rule type name. Implementations must be
//! `Send + Sync` so a registry can be shared read-only across engines and
//! across the rayon pool.

use crate::core::error::{LoadError, RuleError};
use crate::core::result::ValidationResult;
use crate::core::value::{Details, Params, StructuredValue};
use serde_json::json;
use std::path::Path;

/// Reads a raw file into a structured value.
pub trait DataLoader: Send + Sync {
    /// Unique name of this loader (e.g., "tabular").
    fn name(&self) -> &str;

    /// File extensions handled by this loader, without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Load a file.
    fn load(&self, path: &Path) -> Result<StructuredValue, LoadError>;

    /// Whether this loader handles the file's extension (case-insensitive).
    fn can_load(&self, path: &Path) -> bool {
        extension_of(path)
            .map(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|s| normalize_extension(s) == ext)
            })
            .unwrap_or(false)
    }

    /// Summarize a file without validating it: loader, kind, size and,
    /// when the value has them, shape and columns.
    fn describe(&self, path: &Path) -> Result<Details, LoadError> {
        let metadata = std::fs::metadata(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value = self.load(path)?;

        let mut details = Details::new();
        details.insert("loader".into(), json!(self.name()));
        details.insert("kind".into(), json!(value.kind()));
        details.insert("size_bytes".into(), json!(metadata.len()));
        if let Some((rows, columns)) = value.shape() {
            details.insert("shape".into(), json!([rows, columns]));
        }
        if let Some(columns) = value.columns() {
            details.insert("columns".into(), json!(columns));
        }
        if let Some(len) = value.len() {
            details.insert("length".into(), json!(len));
        }
        Ok(details)
    }
}

/// What a validator is asked to check.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// The value produced by the file's loader.
    Loaded(&'a StructuredValue),
    /// The raw file, used when loading failed and the rule is exempt from the
    /// load requirement.
    RawFile(&'a Path),
}

impl Subject<'_> {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Subject::Loaded(value) => value.kind().to_string(),
            Subject::RawFile(path) => format!("raw file {}", path.display()),
        }
    }
}

/// Checks a subject against rule parameters.
pub trait Validator: Send + Sync {
    /// Rule type name this validator answers to (e.g., "not_empty").
    fn name(&self) -> &str;

    /// Validate the subject.
    ///
    /// Returning `Err` signals a problem in the validator's own logic or in
    /// its parameters; the engine records it as an `ERROR` result.
    fn validate(
        &self,
        subject: Subject<'_>,
        params: &Params,
    ) -> Result<ValidationResult, RuleError>;
}

/// Lower-cased extension of a path without the leading dot.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Normalize a declared extension: strip a leading dot, lower-case.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_lowercase()
}
