//! lfs-cli — command registration and dispatch for git-lfs.
//!
//! # Key Abstractions
//!
//! - [`Registry`]: deferred subcommand builders, realized once at startup
//! - [`LfsCli`]: assembles the command tree and runs one command line
//! - [`HelpResolver`]: help and usage text from the manual page table
//! - [`completion`]: shell completion scripts for bash, zsh, fish, PowerShell
//! - [`HttpStatsHook`]: per-command HTTP statistics log, behind `GIT_LOG_STATS`

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod client;
pub mod command;
pub mod commands;
pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod help;
mod manpages;
pub mod registry;

#[cfg(test)]
mod test_utils;

pub use app::{EXIT_FAILURE, EXIT_SUCCESS, LfsCli};
pub use client::StatsClient;
pub use command::{BuildContext, CommandSpec, Invocation};
pub use completion::Shell;
pub use config::LfsConfig;
pub use diagnostics::HttpStatsHook;
pub use help::{HelpRenderer, HelpResolver, ManPages, UsageRenderer};
pub use registry::Registry;
