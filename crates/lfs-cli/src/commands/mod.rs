//! Subcommands that ship with the dispatch layer itself.
//!
//! Everything else registers through the same [`Registry`] from its own
//! module.

pub mod version;

use crate::registry::Registry;

/// Register the built-in subcommands.
pub fn register_builtin(registry: &Registry, name: &str, version: &str) {
    version::register(registry, name, version);
}
