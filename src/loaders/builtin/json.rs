//! JSON loader.

use crate::core::error::LoadError;
use crate::core::plugin::DataLoader;
use crate::core::value::StructuredValue;
use crate::loaders::registry::LoaderRegistry;
use std::path::Path;

/// Register the JSON loader.
pub fn register(registry: &mut LoaderRegistry) {
    registry.register(JsonLoader);
}

/// Loads a JSON document.
///
/// Objects and arrays become [`StructuredValue::Hierarchical`], `null`
/// becomes [`StructuredValue::Missing`], anything else a scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl DataLoader for JsonLoader {
    fn name(&self) -> &str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn load(&self, path: &Path) -> Result<StructuredValue, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| LoadError::Malformed {
                path: path.to_path_buf(),
                format: "JSON",
                message: format!("Invalid JSON: {}", e),
            })?;

        Ok(StructuredValue::from_json(document))
    }
}
