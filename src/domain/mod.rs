//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod category;
pub mod entities;
pub mod error;
pub mod query;

pub use category::{categorize, classify, CategorizedResult, Category};
pub use entities::*;
pub use error::DomainError;
pub use query::build_overpass_query;

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Falls back to the input unchanged if a variable cannot be resolved.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
