//! lfs-core — shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used by the git-lfs command
//! layer. It has no internal workspace dependencies.
//!
//! # Modules
//!
//! - [`environment`]: Environment snapshot and git path canonicalisation
//! - [`error`]: Error types and Result alias
//! - [`i18n`]: Message catalog used for user-facing strings
//! - [`traits`]: Collaborator traits (configuration, API client)
//! - [`util`]: Path utilities

#![doc = include_str!("../README.md")]

pub mod environment;
pub mod error;
pub mod i18n;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use environment::Environment;
pub use error::{Error, Result};
pub use i18n::Translator;
pub use traits::{ApiClient, ConfigProvider};
