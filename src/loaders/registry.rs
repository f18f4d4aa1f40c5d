//! Loader registry: maps file extensions to data loaders.

use crate::core::plugin::{extension_of, normalize_extension, DataLoader};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Registry for all available data loaders.
///
/// Loaders are stored by name; every extension a loader declares points at
/// that name. Registering a loader for an extension that is already mapped
/// takes the mapping over, so the last registration wins.
///
/// A registry is built once (usually via [`LoaderRegistry::with_builtins`])
/// and then shared read-only behind an `Arc`.
pub struct LoaderRegistry {
    /// Loaders indexed by name, in registration order.
    loaders: IndexMap<String, Arc<dyn DataLoader>>,
    /// Normalized extension -> loader name.
    extensions: HashMap<String, String>,
}

impl LoaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            loaders: IndexMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in loaders.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::loaders::builtin::register_all(&mut registry);
        registry
    }

    /// Register a loader under its own name.
    pub fn register<L>(&mut self, loader: L)
    where
        L: DataLoader + 'static,
    {
        let name = loader.name().to_string();
        self.register_as(name, loader);
    }

    /// Register a loader under an explicit name.
    pub fn register_as<L>(&mut self, name: impl Into<String>, loader: L)
    where
        L: DataLoader + 'static,
    {
        let name = name.into();
        for extension in loader.supported_extensions() {
            let extension = normalize_extension(extension);
            if let Some(previous) = self.extensions.insert(extension.clone(), name.clone()) {
                if previous != name {
                    log::debug!(
                        "Loader '{}' takes over .{} from '{}'",
                        name,
                        extension,
                        previous
                    );
                }
            }
        }
        self.loaders.insert(name, Arc::new(loader));
    }

    /// Get the loader for a file, by case-insensitive extension.
    pub fn get(&self, path: &Path) -> Option<Arc<dyn DataLoader>> {
        let extension = extension_of(path)?;
        self.get_by_extension(&extension)
    }

    /// Get the loader mapped to an extension (with or without leading dot).
    pub fn get_by_extension(&self, extension: &str) -> Option<Arc<dyn DataLoader>> {
        let name = self.extensions.get(&normalize_extension(extension))?;
        self.loaders.get(name).cloned()
    }

    /// Check if a loader is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// All registered loader names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.keys().map(|s| s.as_str())
    }

    /// All mapped extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.extensions.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Get the total number of registered loaders.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("loaders", &self.loaders.keys().collect::<Vec<_>>())
            .field("extensions", &self.extensions())
            .finish()
    }
}
