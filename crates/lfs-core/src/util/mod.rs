//! Utility modules.
//!
//! # Modules
//!
//! - [`paths`]: Path canonicalisation helpers (tilde expansion, absolutising)

pub mod paths;
