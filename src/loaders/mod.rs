//! Loader module.
//!
//! Contains the loader registry and built-in loader implementations.

pub mod builtin;
pub mod registry;

pub use registry::LoaderRegistry;
