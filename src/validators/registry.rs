//! Validator registry for managing available rule types.

use crate::core::plugin::Validator;
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry for all available validators.
///
/// Validators are looked up by the rule `type` named in the configuration.
/// Registering under an existing name replaces the previous validator.
pub struct ValidatorRegistry {
    /// Validators indexed by rule type, in registration order.
    validators: IndexMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            validators: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::validators::builtin::register_all(&mut registry);
        registry
    }

    /// Register a validator under its own name.
    pub fn register<V>(&mut self, validator: V)
    where
        V: Validator + 'static,
    {
        let name = validator.name().to_string();
        self.register_as(name, validator);
    }

    /// Register a validator under an explicit rule type.
    pub fn register_as<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: Validator + 'static,
    {
        let name = name.into();
        if self.validators.insert(name.clone(), Arc::new(validator)).is_some() {
            log::debug!("Validator '{}' replaced", name);
        }
    }

    /// Get a validator by rule type.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Validator>> {
        self.validators.get(name).cloned()
    }

    /// Check if a rule type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// All registered rule types, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(|s| s.as_str())
    }

    /// Get the total number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
