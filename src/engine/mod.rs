//! Validation engine module.
//!
//! Walks the results tree and applies each stage's file rules.

pub mod discovery;
#[allow(clippy::module_inception)]
pub mod engine;

pub use engine::{
    EngineOptions, ValidationEngine, FILE_EXISTS_RULE, FILE_PATTERN_RULE, LOAD_EXEMPT_RULE,
};
