//! Built-in validator implementations.

mod has_columns;
mod has_shape;
mod not_empty;
mod not_na;
pub mod params;

use crate::validators::registry::ValidatorRegistry;

/// Register all built-in validators.
pub fn register_all(registry: &mut ValidatorRegistry) {
    not_empty::register(registry);
    has_columns::register(registry);
    has_shape::register(registry);
    not_na::register(registry);
}

// Re-export for direct access
pub use has_columns::HasColumns;
pub use has_shape::HasShape;
pub use not_empty::NotEmpty;
pub use not_na::NotNa;
