//! Configuration for the git-lfs command layer.
//!
//! Provides the [`LfsConfig`] struct that loads from a TOML file and
//! `GIT_LFS_*` environment variables using the `confyg` crate, then applies
//! the canonicalised git environment.
//!
//! # Loading Priority
//!
//! 1. File named by `GIT_LFS_CONFIG`
//! 2. XDG default: `~/.config/git-lfs/config.toml`
//! 3. `GIT_LFS_*` environment overlay
//! 4. `GIT_DIR` from the canonical environment
//! 5. Built-in defaults

use std::path::PathBuf;

use confyg::{env, Confygery};
use lfs_core::traits::ConfigProvider;
use lfs_core::util::paths::expand_tilde;
use lfs_core::{Environment, Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GIT_LFS_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Shared configuration object, constructed once per invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LfsConfig {
    /// Repository git directory, normally taken from `GIT_DIR`.
    pub git_dir: Option<String>,

    /// Local object storage configuration.
    pub storage: StorageConfig,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Explicit local storage directory. Overrides `<git_dir>/lfs`.
    pub path: Option<String>,
}

// ============================================================================
// Config loading
// ============================================================================

impl LfsConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(environment: &Environment) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(environment) {
            if path.exists() {
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("GIT_LFS");
        env_opts.add_section("storage");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let mut config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        if let Some(git_dir) = environment.get("GIT_DIR").filter(|d| !d.is_empty()) {
            config.git_dir = Some(git_dir.to_string());
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Resolve the config file path from `GIT_LFS_CONFIG` or the XDG default.
    pub fn resolve_config_path(environment: &Environment) -> Option<PathBuf> {
        match environment.get(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => Self::default_config_path(),
        }
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("git-lfs").join("config.toml"))
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for LfsConfig {
    fn local_storage_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(expand_tilde(path));
        }
        if let Some(git_dir) = &self.git_dir {
            return Ok(PathBuf::from(git_dir).join("lfs"));
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(".git").join("lfs"))
            .map_err(|e| Error::config(format!("Could not determine storage directory: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
