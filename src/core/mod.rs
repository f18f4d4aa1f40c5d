//! Core types and traits for the artifact validator.
//!
//! This module contains the foundational types shared by every other part
//! of the crate:
//! - Structured values produced by loaders
//! - The loader and validator traits
//! - Validation results and status aggregation
//! - Error types

pub mod error;
pub mod plugin;
pub mod result;
pub mod value;

// Re-export commonly used types
pub use error::{ArtifactError, ConfigError, EngineError, LoadError, RuleError};
pub use plugin::{DataLoader, Subject, Validator};
pub use result::{ModuleValidationResult, ValidationResult, ValidationStatus};
pub use value::{Details, Params, StructuredValue, Table};
