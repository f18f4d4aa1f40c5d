//! Built-in loader implementations.

mod json;
mod tabular;

use crate::loaders::registry::LoaderRegistry;

/// Register all built-in loaders.
pub fn register_all(registry: &mut LoaderRegistry) {
    tabular::register(registry);
    json::register(registry);
}

// Re-export for direct access
pub use json::JsonLoader;
pub use tabular::{parse_delimited, TabularLoader};
