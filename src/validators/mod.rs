//! Validator module.
//!
//! Contains the validator registry and the built-in rule types.

pub mod builtin;
pub mod registry;

pub use registry::ValidatorRegistry;
